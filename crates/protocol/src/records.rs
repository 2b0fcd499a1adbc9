//! Dashboard records read by the admin pages.
//!
//! Pages select different field subsets of the same type, so every field
//! outside the identifying ones is optional.

use serde::{Deserialize, Serialize};

/// Paginated list wrapper used by `shipments`, `orders`, `vehicles` and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	pub items: Vec<T>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_count: Option<u64>,
}

impl<T> Default for Page<T> {
	fn default() -> Self {
		Self {
			items: Vec::new(),
			total_count: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
	pub active_shipments: i64,
	pub delivered_today: i64,
	pub pending_orders: i64,
	pub total_revenue: f64,
	pub total_vehicles: i64,
	pub active_vehicles: i64,
	pub total_clients: i64,
	pub total_warehouses: i64,
	pub total_inventory: i64,
	pub total_drivers: i64,
	pub available_drivers: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
	pub id: String,
	pub tracking_number: String,
	#[serde(default)]
	pub origin: Option<String>,
	#[serde(default)]
	pub destination: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub carrier: Option<String>,
	#[serde(default)]
	pub weight: Option<f64>,
	#[serde(default)]
	pub dimensions: Option<String>,
	#[serde(default)]
	pub estimated_delivery: Option<String>,
	#[serde(default)]
	pub actual_delivery: Option<String>,
	#[serde(default)]
	pub customer_name: Option<String>,
	#[serde(default)]
	pub customer_email: Option<String>,
	#[serde(default)]
	pub notes: Option<String>,
	#[serde(default)]
	pub created_at: Option<String>,
}

/// Input for `createShipment`. Only the tracking number is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentInput {
	pub tracking_number: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub origin: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub destination: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub carrier: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub weight: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dimensions: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub estimated_delivery: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer_email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedShipment {
	pub id: String,
	pub tracking_number: String,
	pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	pub id: String,
	pub order_number: String,
	#[serde(default)]
	pub customer_name: Option<String>,
	#[serde(default)]
	pub customer_email: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default, rename = "type")]
	pub order_type: Option<String>,
	#[serde(default)]
	pub total_amount: Option<f64>,
	#[serde(default)]
	pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
	pub id: String,
	pub vehicle_id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default, rename = "type")]
	pub vehicle_type: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub fuel_level: Option<f64>,
	#[serde(default)]
	pub mileage: Option<f64>,
	#[serde(default)]
	pub last_service: Option<String>,
	#[serde(default)]
	pub license_plate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
	pub id: String,
	pub employee_id: String,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub rating: Option<f64>,
	#[serde(default)]
	pub total_deliveries: Option<i64>,
	#[serde(default)]
	pub license_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub contact_person: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub rating: Option<f64>,
	#[serde(default)]
	pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub location: Option<String>,
	#[serde(default)]
	pub address: Option<String>,
	#[serde(default)]
	pub capacity: Option<i64>,
	#[serde(default)]
	pub used_capacity: Option<i64>,
	#[serde(default)]
	pub manager: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
}

impl Warehouse {
	/// Used share of capacity in percent, when both figures are known.
	pub fn utilization(&self) -> Option<f64> {
		match (self.capacity, self.used_capacity) {
			(Some(capacity), Some(used)) if capacity > 0 => Some(used as f64 * 100.0 / capacity as f64),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
	pub id: String,
	pub key: String,
	pub value: String,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
	pub id: String,
	#[serde(default)]
	pub company_name: Option<String>,
	#[serde(default)]
	pub contact_person: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub industry: Option<String>,
	#[serde(default)]
	pub total_shipments: Option<i64>,
	#[serde(default)]
	pub total_spent: Option<f64>,
	#[serde(default)]
	pub satisfaction_rating: Option<f64>,
	#[serde(default)]
	pub status: Option<String>,
}

/// Client feedback entry. Ratings run from 1 to 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
	pub id: String,
	#[serde(default)]
	pub client_name: Option<String>,
	#[serde(default)]
	pub rating: Option<i64>,
	#[serde(default)]
	pub comment: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub created_at: Option<String>,
}

/// One entry of the dashboard activity feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityItem {
	pub id: Option<String>,
	pub action: Option<String>,
	pub entity_type: Option<String>,
	pub created_at: Option<String>,
}

/// Dashboard performance rates, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Performance {
	pub on_time_delivery_rate: f64,
	pub fleet_utilization: f64,
	pub warehouse_utilization: f64,
	pub order_fulfillment_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueReport {
	pub total_revenue: f64,
	pub total_profit: f64,
	pub monthly_data: Vec<MonthlyRevenue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyRevenue {
	pub month: String,
	pub revenue: f64,
	pub orders: i64,
	pub profit: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryReport {
	pub total_deliveries: i64,
	pub average_on_time_rate: f64,
	/// Hours.
	pub average_delivery_time: f64,
	pub monthly_data: Vec<MonthlyDelivery>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyDelivery {
	pub month: String,
	pub total_deliveries: i64,
	pub on_time: i64,
	pub late: i64,
	pub on_time_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FleetReport {
	pub total_vehicles: i64,
	pub average_utilization: f64,
	pub total_maintenance_cost: f64,
	pub monthly_data: Vec<MonthlyFleet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyFleet {
	pub month: String,
	pub active_vehicles: i64,
	pub maintenance_cost: f64,
	pub utilization_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
	pub id: String,
	#[serde(default)]
	pub sku: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub warehouse_id: Option<String>,
	#[serde(default)]
	pub quantity: Option<i64>,
	#[serde(default)]
	pub min_quantity: Option<i64>,
	#[serde(default)]
	pub status: Option<String>,
}

impl InventoryItem {
	/// Units missing to reach the minimum quantity. Zero when stocked.
	pub fn deficit(&self) -> i64 {
		(self.min_quantity.unwrap_or(0) - self.quantity.unwrap_or(0)).max(0)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
	pub id: String,
	#[serde(default, rename = "type")]
	pub maintenance_type: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub scheduled_date: Option<String>,
	#[serde(default)]
	pub completed_date: Option<String>,
	#[serde(default)]
	pub cost: Option<f64>,
	#[serde(default)]
	pub mechanic: Option<String>,
}

/// Access role. `permissions` is a JSON document keyed by domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub permissions: Option<String>,
}

impl Role {
	/// Parsed permission document, when present and valid JSON.
	pub fn permission_document(&self) -> Option<serde_json::Value> {
		self.permissions.as_deref().and_then(|raw| serde_json::from_str(raw).ok())
	}
}

/// Input for `updateRole`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInput {
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub permissions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreference {
	pub id: String,
	pub event_type: String,
	#[serde(default)]
	pub email_enabled: bool,
	#[serde(default)]
	pub sms_enabled: bool,
	#[serde(default)]
	pub push_enabled: bool,
}

/// Input for `updateNotificationPreference`. Unset channels keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferenceInput {
	pub event_type: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email_enabled: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sms_enabled: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub push_enabled: Option<bool>,
}

//! Typed queries behind the admin dashboard pages.

use cargomax_protocol::{
	ActivityItem, Client, CreatedShipment, DashboardStats, DeliveryReport, Driver, Feedback, FleetReport, InventoryItem,
	MaintenanceRecord, NotificationPreference, NotificationPreferenceInput, Order, Page, Performance, RevenueReport, Role, RoleInput,
	Setting, Shipment, ShipmentInput, Vehicle, Vendor, Warehouse,
};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::client::QueryClient;
use crate::error::Result;
use crate::query::Query;

const DASHBOARD_STATS: &str = "{ dashboardStats { activeShipments deliveredToday pendingOrders totalRevenue totalVehicles activeVehicles totalClients totalWarehouses totalInventory totalDrivers availableDrivers } }";
const SHIPMENTS: &str = "query($page:Int,$perPage:Int,$status:String){shipments(page:$page,perPage:$perPage,status:$status){items{id trackingNumber origin destination status carrier weight customerName createdAt}}}";
const DELAYED_SHIPMENTS: &str =
	"{delayedShipments{id trackingNumber origin destination status carrier weight estimatedDelivery customerName notes createdAt}}";
const TRACK_SHIPMENT: &str = "query($trackingNumber:String!){trackShipment(trackingNumber:$trackingNumber){id trackingNumber origin destination status carrier weight dimensions estimatedDelivery actualDelivery customerName customerEmail notes createdAt}}";
const CREATE_SHIPMENT: &str = "mutation($input:ShipmentInput!){createShipment(input:$input){id trackingNumber status}}";
const ORDERS: &str = "query($page:Int,$perPage:Int){ orders(page:$page,perPage:$perPage) { items { id orderNumber customerName customerEmail status type totalAmount createdAt } } }";
const VEHICLES: &str = "query($page:Int,$perPage:Int){ vehicles(page:$page,perPage:$perPage) { items { id vehicleId name type status fuelLevel mileage lastService licensePlate } } }";
const DRIVERS: &str = "query($page:Int,$perPage:Int){ drivers(page:$page,perPage:$perPage) { items { id employeeId firstName lastName email phone status rating totalDeliveries licenseNumber } } }";
const VENDORS: &str = "query($page:Int,$perPage:Int){ vendors(page:$page,perPage:$perPage) { items { id name contactPerson email phone category rating status } } }";
const WAREHOUSES: &str = "query($page:Int,$perPage:Int){ warehouses(page:$page,perPage:$perPage) { items { id name location address capacity usedCapacity manager phone status } } }";
const CLIENTS: &str = "query($page:Int,$perPage:Int){ clients(page:$page,perPage:$perPage) { items { id companyName contactPerson email phone industry totalShipments totalSpent satisfactionRating status } } }";
const FEEDBACKS: &str = "query($page:Int,$perPage:Int){ feedbacks(page:$page,perPage:$perPage) { items { id clientName rating comment category createdAt } totalCount } }";
const DASHBOARD_ACTIVITY: &str =
	"query($page:Int,$perPage:Int){ dashboardActivity(page:$page,perPage:$perPage) { items { action entityType createdAt } } }";
const DASHBOARD_PERFORMANCE: &str =
	"{ dashboardPerformance { onTimeDeliveryRate fleetUtilization warehouseUtilization orderFulfillmentRate } }";
const REVENUE_REPORT: &str =
	"query($year:Int!){ revenueReport(year:$year) { totalRevenue totalProfit monthlyData { month revenue orders profit } } }";
const DELIVERY_REPORT: &str = "query($year:Int!){ deliveryReport(year:$year) { totalDeliveries averageOnTimeRate averageDeliveryTime monthlyData { month totalDeliveries onTime late onTimeRate } } }";
const FLEET_REPORT: &str = "query($year:Int!){ fleetReport(year:$year) { totalVehicles averageUtilization totalMaintenanceCost monthlyData { month activeVehicles maintenanceCost utilizationRate } } }";
const INVENTORY_ITEMS: &str = "query($wid: String!, $page:Int, $perPage:Int) { inventoryItems(warehouseId: $wid, page: $page, perPage: $perPage) { items { id sku name category warehouseId quantity minQuantity status } } }";
const LOW_STOCK_ITEMS: &str = "{ lowStockItems { id sku name category warehouseId quantity minQuantity status } }";
const RESTOCK_ITEM: &str =
	"mutation($id: String!, $quantity: Int!) { restockItem(id: $id, quantity: $quantity) { id quantity status } }";
const MAINTENANCE_RECORDS: &str = "query($page:Int,$perPage:Int,$vehicleId:String){ maintenanceRecords(page:$page,perPage:$perPage,vehicleId:$vehicleId) { items { id type description status scheduledDate completedDate cost mechanic } } }";
const ROLES: &str = "{ roles { id name permissions } }";
const UPDATE_ROLE: &str = "mutation($id: String!, $input: RoleInput!) { updateRole(id: $id, input: $input) { id name permissions } }";
const NOTIFICATION_PREFERENCES: &str = "{ notificationPreferences { id eventType emailEnabled smsEnabled pushEnabled } }";
const UPDATE_NOTIFICATION_PREFERENCE: &str = "mutation($input: NotificationPrefInput!) { updateNotificationPreference(input: $input) { id eventType emailEnabled smsEnabled pushEnabled } }";
const SETTINGS: &str = "{ settings { id key value category updatedAt } }";
const UPDATE_SETTING: &str = "mutation($key: String!, $value: String!) { updateSetting(key: $key, value: $value) { id key value } }";

/// Page window for list queries. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	pub page: u32,
	pub per_page: u32,
}

impl PageRequest {
	pub fn new(page: u32, per_page: u32) -> Self {
		Self { page, per_page }
	}

	fn apply(self, query: Query) -> Query {
		query.with_variable("page", self.page).with_variable("perPage", self.per_page)
	}
}

impl Default for PageRequest {
	fn default() -> Self {
		Self { page: 1, per_page: 50 }
	}
}

/// Dashboard data sources over a shared [`QueryClient`].
#[derive(Clone)]
pub struct Dashboard {
	client: QueryClient,
}

impl Dashboard {
	pub fn new(client: QueryClient) -> Self {
		Self { client }
	}

	pub async fn dashboard_stats(&self, cancel: &CancellationToken) -> Result<DashboardStats> {
		self.field(Query::new(DASHBOARD_STATS)?, "dashboardStats", cancel).await
	}

	/// Shipments on one page, optionally restricted to one status.
	pub async fn shipments(&self, page: PageRequest, status: Option<&str>, cancel: &CancellationToken) -> Result<Page<Shipment>> {
		let query = page.apply(Query::new(SHIPMENTS)?).with_variable("status", status.map(str::to_string));
		self.field(query, "shipments", cancel).await
	}

	pub async fn delayed_shipments(&self, cancel: &CancellationToken) -> Result<Vec<Shipment>> {
		self.field(Query::new(DELAYED_SHIPMENTS)?, "delayedShipments", cancel).await
	}

	/// Looks a shipment up by tracking number. Unknown numbers come back as `None`.
	pub async fn track_shipment(&self, tracking_number: &str, cancel: &CancellationToken) -> Result<Option<Shipment>> {
		let query = Query::new(TRACK_SHIPMENT)?.with_variable("trackingNumber", tracking_number);
		self.field(query, "trackShipment", cancel).await
	}

	pub async fn create_shipment(&self, input: &ShipmentInput, cancel: &CancellationToken) -> Result<CreatedShipment> {
		let query = Query::new(CREATE_SHIPMENT)?.with_serialized_variable("input", input)?;
		self.field(query, "createShipment", cancel).await
	}

	pub async fn orders(&self, page: PageRequest, cancel: &CancellationToken) -> Result<Page<Order>> {
		self.field(page.apply(Query::new(ORDERS)?), "orders", cancel).await
	}

	pub async fn vehicles(&self, page: PageRequest, cancel: &CancellationToken) -> Result<Page<Vehicle>> {
		self.field(page.apply(Query::new(VEHICLES)?), "vehicles", cancel).await
	}

	pub async fn drivers(&self, page: PageRequest, cancel: &CancellationToken) -> Result<Page<Driver>> {
		self.field(page.apply(Query::new(DRIVERS)?), "drivers", cancel).await
	}

	pub async fn vendors(&self, page: PageRequest, cancel: &CancellationToken) -> Result<Page<Vendor>> {
		self.field(page.apply(Query::new(VENDORS)?), "vendors", cancel).await
	}

	pub async fn warehouses(&self, page: PageRequest, cancel: &CancellationToken) -> Result<Page<Warehouse>> {
		self.field(page.apply(Query::new(WAREHOUSES)?), "warehouses", cancel).await
	}

	pub async fn settings(&self, cancel: &CancellationToken) -> Result<Vec<Setting>> {
		self.field(Query::new(SETTINGS)?, "settings", cancel).await
	}

	/// Stores `value` under `key` and returns the updated setting.
	pub async fn update_setting(&self, key: &str, value: &str, cancel: &CancellationToken) -> Result<Setting> {
		let query = Query::new(UPDATE_SETTING)?.with_variable("key", key).with_variable("value", value);
		self.field(query, "updateSetting", cancel).await
	}

	pub async fn clients(&self, page: PageRequest, cancel: &CancellationToken) -> Result<Page<Client>> {
		self.field(page.apply(Query::new(CLIENTS)?), "clients", cancel).await
	}

	pub async fn feedbacks(&self, page: PageRequest, cancel: &CancellationToken) -> Result<Page<Feedback>> {
		self.field(page.apply(Query::new(FEEDBACKS)?), "feedbacks", cancel).await
	}

	/// Most recent entries of the activity feed, newest first.
	pub async fn dashboard_activity(&self, page: PageRequest, cancel: &CancellationToken) -> Result<Page<ActivityItem>> {
		self.field(page.apply(Query::new(DASHBOARD_ACTIVITY)?), "dashboardActivity", cancel).await
	}

	pub async fn dashboard_performance(&self, cancel: &CancellationToken) -> Result<Performance> {
		self.field(Query::new(DASHBOARD_PERFORMANCE)?, "dashboardPerformance", cancel).await
	}

	pub async fn revenue_report(&self, year: i32, cancel: &CancellationToken) -> Result<RevenueReport> {
		let query = Query::new(REVENUE_REPORT)?.with_variable("year", year);
		self.field(query, "revenueReport", cancel).await
	}

	pub async fn delivery_report(&self, year: i32, cancel: &CancellationToken) -> Result<DeliveryReport> {
		let query = Query::new(DELIVERY_REPORT)?.with_variable("year", year);
		self.field(query, "deliveryReport", cancel).await
	}

	pub async fn fleet_report(&self, year: i32, cancel: &CancellationToken) -> Result<FleetReport> {
		let query = Query::new(FLEET_REPORT)?.with_variable("year", year);
		self.field(query, "fleetReport", cancel).await
	}

	/// Stock held by one warehouse.
	pub async fn inventory_items(&self, warehouse_id: &str, page: PageRequest, cancel: &CancellationToken) -> Result<Page<InventoryItem>> {
		let query = page.apply(Query::new(INVENTORY_ITEMS)?).with_variable("wid", warehouse_id);
		self.field(query, "inventoryItems", cancel).await
	}

	/// Items below their minimum quantity, across every warehouse.
	pub async fn low_stock_items(&self, cancel: &CancellationToken) -> Result<Vec<InventoryItem>> {
		self.field(Query::new(LOW_STOCK_ITEMS)?, "lowStockItems", cancel).await
	}

	/// Adds `quantity` units to an item and returns its new stock level.
	pub async fn restock_item(&self, id: &str, quantity: i64, cancel: &CancellationToken) -> Result<InventoryItem> {
		let query = Query::new(RESTOCK_ITEM)?.with_variable("id", id).with_variable("quantity", quantity);
		self.field(query, "restockItem", cancel).await
	}

	/// Maintenance log, optionally restricted to one vehicle.
	pub async fn maintenance_records(
		&self,
		page: PageRequest,
		vehicle_id: Option<&str>,
		cancel: &CancellationToken,
	) -> Result<Page<MaintenanceRecord>> {
		let query = page
			.apply(Query::new(MAINTENANCE_RECORDS)?)
			.with_variable("vehicleId", vehicle_id.map(str::to_string));
		self.field(query, "maintenanceRecords", cancel).await
	}

	pub async fn roles(&self, cancel: &CancellationToken) -> Result<Vec<Role>> {
		self.field(Query::new(ROLES)?, "roles", cancel).await
	}

	pub async fn update_role(&self, id: &str, input: &RoleInput, cancel: &CancellationToken) -> Result<Role> {
		let query = Query::new(UPDATE_ROLE)?.with_variable("id", id).with_serialized_variable("input", input)?;
		self.field(query, "updateRole", cancel).await
	}

	/// Notification channels of the signed-in user, one entry per event type.
	pub async fn notification_preferences(&self, cancel: &CancellationToken) -> Result<Vec<NotificationPreference>> {
		self.field(Query::new(NOTIFICATION_PREFERENCES)?, "notificationPreferences", cancel).await
	}

	pub async fn update_notification_preference(
		&self,
		input: &NotificationPreferenceInput,
		cancel: &CancellationToken,
	) -> Result<NotificationPreference> {
		let query = Query::new(UPDATE_NOTIFICATION_PREFERENCE)?.with_serialized_variable("input", input)?;
		self.field(query, "updateNotificationPreference", cancel).await
	}

	async fn field<T: DeserializeOwned>(&self, query: Query, field: &str, cancel: &CancellationToken) -> Result<T> {
		self.client.execute_field(&query, field, cancel).await
	}
}

use cargomax_runtime::{CancellationToken, PageRequest};
use serde::Serialize;
use serde_json::Value;

use crate::context::CommandContext;
use crate::error::{CliError, Result};

pub async fn stats(ctx: &CommandContext, cancel: &CancellationToken) -> Result<Value> {
	to_value(ctx.dashboard().dashboard_stats(cancel).await?)
}

pub async fn shipments(ctx: &CommandContext, status: Option<&str>, page: u32, per_page: u32, cancel: &CancellationToken) -> Result<Value> {
	let page = page_request(page, per_page)?;
	to_value(ctx.dashboard().shipments(page, status, cancel).await?)
}

pub async fn track(ctx: &CommandContext, tracking_number: &str, cancel: &CancellationToken) -> Result<Value> {
	let tracking_number = tracking_number.trim();
	if tracking_number.is_empty() {
		return Err(CliError::InvalidInput("tracking number is required".to_string()));
	}

	match ctx.dashboard().track_shipment(tracking_number, cancel).await? {
		Some(shipment) => to_value(shipment),
		None => Err(CliError::NotFound(format!("no shipment with tracking number {tracking_number}"))),
	}
}

pub async fn vehicles(ctx: &CommandContext, page: u32, per_page: u32, cancel: &CancellationToken) -> Result<Value> {
	to_value(ctx.dashboard().vehicles(page_request(page, per_page)?, cancel).await?)
}

pub async fn drivers(ctx: &CommandContext, page: u32, per_page: u32, cancel: &CancellationToken) -> Result<Value> {
	to_value(ctx.dashboard().drivers(page_request(page, per_page)?, cancel).await?)
}

fn page_request(page: u32, per_page: u32) -> Result<PageRequest> {
	if page == 0 || per_page == 0 {
		return Err(CliError::InvalidInput("--page and --per-page start at 1".to_string()));
	}
	Ok(PageRequest::new(page, per_page))
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
	Ok(serde_json::to_value(value)?)
}

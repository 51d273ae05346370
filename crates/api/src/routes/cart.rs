//! Cart quoting.
//!
//! The cart lives in the client during intake; the server re-prices it
//! against the current catalog and exclusion rules on every quote and again
//! when the order is created.

use axum::{Json, Router, extract::State, routing::post};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use arycar_core::{
    Cart, CartItem, ExclusionRules, Money, Service, ServiceId, VehicleSize, VehicleType,
    check_quantity,
};

use crate::db::ServiceRepository;
use crate::error::Result;
use crate::state::AppState;

use super::ApiJson;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/cart/quote", post(quote))
}

/// A requested cart line.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CartLine {
    pub service_id: ServiceId,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Serialize)]
pub struct Quote {
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
    pub items: Vec<CartItem>,
    pub total: Money,
    pub total_hours: Decimal,
}

impl From<Cart> for Quote {
    fn from(cart: Cart) -> Self {
        Self {
            vehicle_type: cart.vehicle_type(),
            size: cart.size(),
            total: cart.total(),
            total_hours: cart.total_hours(),
            items: cart.into_items(),
        }
    }
}

/// Check requested quantities, summing repeated services, before any
/// catalog lookup.
///
/// # Errors
///
/// Returns 400 when a line or a merged service quantity is out of range.
pub fn check_lines(lines: &[CartLine]) -> Result<()> {
    let mut merged: Vec<(ServiceId, u32)> = Vec::with_capacity(lines.len());
    for line in lines {
        check_quantity(line.quantity)?;
        match merged.iter_mut().find(|(id, _)| *id == line.service_id) {
            Some((_, total)) => *total = check_quantity(total.saturating_add(line.quantity))?,
            None => merged.push((line.service_id, line.quantity)),
        }
    }
    Ok(())
}

/// Rebuild a cart from requested lines.
///
/// # Errors
///
/// Returns the cart's validation error mapped to an HTTP error.
pub fn build_cart(
    vehicle_type: VehicleType,
    size: VehicleSize,
    lines: &[CartLine],
    catalog: &[Service],
    rules: &ExclusionRules,
) -> Result<Cart> {
    let pairs: Vec<(ServiceId, u32)> = lines.iter().map(|l| (l.service_id, l.quantity)).collect();
    Ok(Cart::from_lines(vehicle_type, size, &pairs, catalog, rules)?)
}

#[instrument(skip(state, req), fields(vehicle_type = %req.vehicle_type, size = %req.size))]
async fn quote(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<QuoteRequest>,
) -> Result<Json<Quote>> {
    check_lines(&req.lines)?;
    let repo = ServiceRepository::new(state.pool());
    let catalog = repo.list().await?;
    let rules = repo.exclusion_rules().await?;

    let cart = build_cart(req.vehicle_type, req.size, &req.lines, &catalog, &rules)?;
    Ok(Json(cart.into()))
}

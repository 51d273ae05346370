//! Customer detail.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::instrument;

use arycar_core::{Customer, CustomerId, Vehicle};

use crate::db::{CustomerRepository, VehicleRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::ApiPath;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/customers/{id}", get(show))
}

#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    pub customer: Customer,
    pub vehicles: Vec<Vehicle>,
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Json<CustomerDetail>> {
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;
    let vehicles = VehicleRepository::new(state.pool())
        .list_by_customer(id)
        .await?;
    Ok(Json(CustomerDetail { customer, vehicles }))
}

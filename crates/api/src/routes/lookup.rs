//! External lookups: plate registration and the FIPE catalog.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use arycar_core::{Plate, VehicleType};

use crate::error::{AppError, Result};
use crate::services::{FipeBrand, FipeModel, PlateLookup, is_brand_code};
use crate::state::AppState;

use super::ApiPath;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/lookup/plate/{plate}", get(plate))
        .route("/api/lookup/fipe/{vehicle_type}/brands", get(brands))
        .route(
            "/api/lookup/fipe/{vehicle_type}/brands/{code}/models",
            get(models),
        )
}

/// Look up a plate. 503 without a token, 404 when the API has no record,
/// 502 when the API cannot be reached.
#[instrument(skip(state))]
async fn plate(
    State(state): State<AppState>,
    ApiPath(raw): ApiPath<String>,
) -> Result<Json<PlateLookup>> {
    let plate = Plate::parse(&raw)?;
    let client = state
        .plate()
        .ok_or_else(|| AppError::NotConfigured("plate lookup is not configured".to_string()))?;

    client
        .lookup(&plate)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no registration found for plate {plate}")))
}

#[instrument(skip(state))]
async fn brands(
    State(state): State<AppState>,
    ApiPath(vehicle_type): ApiPath<VehicleType>,
) -> Json<Vec<FipeBrand>> {
    Json(state.fipe().brands(vehicle_type).await)
}

/// Models of a FIPE brand. The brand code must be numeric.
#[instrument(skip(state))]
async fn models(
    State(state): State<AppState>,
    ApiPath((vehicle_type, code)): ApiPath<(VehicleType, String)>,
) -> Result<Json<Vec<FipeModel>>> {
    if !is_brand_code(&code) {
        return Err(AppError::BadRequest(format!("invalid FIPE brand code: {code:?}")));
    }
    Ok(Json(state.fipe().models(vehicle_type, &code).await))
}

//! Intake: plate search, customer/vehicle registration and km check-in.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use arycar_core::{Customer, Km, Plate, RegistrationForm, Vehicle, VehicleId};

use crate::db::{CustomerRepository, RepositoryError, VehicleRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::{ApiJson, ApiPath};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/intake/search", post(search))
        .route("/api/intake/register", post(register))
        .route("/api/intake/vehicles/{id}/km", post(record_km))
}

// =============================================================================
// Search
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub plate: String,
}

/// Result of a plate search. A returning vehicle comes back with its owner
/// and the owner's other vehicles.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Found {
        found: bool,
        customer: Customer,
        vehicle: Vehicle,
        other_vehicles: Vec<Vehicle>,
    },
    NotFound {
        found: bool,
        plate: Plate,
    },
}

#[instrument(skip(state, req), fields(plate = %req.plate))]
async fn search(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let plate = Plate::parse(&req.plate)?;

    let Some(vehicle) = VehicleRepository::new(state.pool())
        .find_by_plate(&plate)
        .await?
    else {
        return Ok(Json(SearchResponse::NotFound {
            found: false,
            plate,
        }));
    };

    let customer = CustomerRepository::new(state.pool())
        .get_by_id(vehicle.customer_id)
        .await?
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "vehicle {} references missing customer {}",
                vehicle.id, vehicle.customer_id
            ))
        })?;

    let other_vehicles = VehicleRepository::new(state.pool())
        .list_by_customer(customer.id)
        .await?
        .into_iter()
        .filter(|v| v.id != vehicle.id)
        .collect();

    Ok(Json(SearchResponse::Found {
        found: true,
        customer,
        vehicle,
        other_vehicles,
    }))
}

// =============================================================================
// Registration
// =============================================================================

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub customer: Customer,
    pub vehicle: Vehicle,
    /// The CPF was already registered; the vehicle was added to that
    /// customer and the submitted customer fields were ignored.
    pub existing_customer: bool,
}

/// Register a customer and vehicle. A known CPF reuses the stored customer.
#[instrument(skip(state, form))]
async fn register(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<RegistrationForm>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let (new_customer, new_vehicle) = form.validate()?;

    let vehicles = VehicleRepository::new(state.pool());
    if vehicles.find_by_plate(&new_vehicle.plate).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "plate {} already registered",
            new_vehicle.plate
        )));
    }

    let customers = CustomerRepository::new(state.pool());
    let (customer, vehicle, existing_customer) =
        match customers.find_by_cpf(&new_customer.cpf).await? {
            Some(customer) => {
                let vehicle = vehicles.create(customer.id, &new_vehicle).await?;
                (customer, vehicle, true)
            }
            None => {
                let (customer, vehicle) = customers
                    .create_with_vehicle(&new_customer, &new_vehicle)
                    .await?;
                (customer, vehicle, false)
            }
        };

    info!(
        customer_id = %customer.id,
        vehicle_id = %vehicle.id,
        plate = %vehicle.plate,
        existing_customer,
        "Vehicle registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            customer,
            vehicle,
            existing_customer,
        }),
    ))
}

// =============================================================================
// Km check-in
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct KmRequest {
    #[serde(default)]
    pub km: String,
}

/// Record the odometer of a returning vehicle. The reading is required.
#[instrument(skip(state, req))]
async fn record_km(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<VehicleId>,
    ApiJson(req): ApiJson<KmRequest>,
) -> Result<Json<Vehicle>> {
    let km = Km::parse(&req.km)?;
    let vehicle = VehicleRepository::new(state.pool()).update_km(id, &km).await?;
    info!(vehicle_id = %id, km = km.as_str(), "Km recorded");
    Ok(Json(vehicle))
}

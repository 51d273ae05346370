//! Service catalog: CRUD, price table and per-vehicle availability.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use arycar_core::{
    Money, Service, ServiceId, ServiceInput, ServiceOption, VehicleSize, VehicleType,
    margin_percent, service_options,
};

use crate::db::ServiceRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::{ApiJson, ApiPath, ApiQuery};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/services", get(list).post(create))
        .route("/api/services/prices", get(prices))
        .route("/api/services/available", get(available))
        .route("/api/services/{id}", put(update).delete(delete))
}

// =============================================================================
// CRUD
// =============================================================================

#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Service>>> {
    Ok(Json(ServiceRepository::new(state.pool()).list().await?))
}

#[instrument(skip(state, input))]
async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<(StatusCode, Json<Service>)> {
    let input = input.validated()?;
    let service = ServiceRepository::new(state.pool()).create(&input).await?;
    info!(service_id = %service.id, name = %service.name, "Service created");
    Ok((StatusCode::CREATED, Json(service)))
}

#[instrument(skip(state, input))]
async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ServiceId>,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<Json<Service>> {
    let input = input.validated()?;
    let service = ServiceRepository::new(state.pool())
        .update(id, &input)
        .await?;
    info!(service_id = %id, "Service updated");
    Ok(Json(service))
}

#[instrument(skip(state))]
async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ServiceId>,
) -> Result<StatusCode> {
    ServiceRepository::new(state.pool()).delete(id).await?;
    info!(service_id = %id, "Service deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Price table
// =============================================================================

/// One cell of the price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRow {
    pub service_id: ServiceId,
    pub name: String,
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
    pub cost: Money,
    pub price: Money,
    /// `None` when the price is zero.
    pub margin_percent: Option<i64>,
}

/// Flatten the catalog into one row per service, vehicle type and size.
#[must_use]
pub fn price_rows(catalog: &[Service]) -> Vec<PriceRow> {
    catalog
        .iter()
        .flat_map(|service| {
            service.pricing.iter().flat_map(move |(vehicle_type, pricing)| {
                VehicleSize::ALL.into_iter().map(move |size| {
                    let (cost, price) = (pricing.cost(size), pricing.price(size));
                    PriceRow {
                        service_id: service.id,
                        name: service.name.clone(),
                        vehicle_type: *vehicle_type,
                        size,
                        cost,
                        price,
                        margin_percent: margin_percent(cost, price),
                    }
                })
            })
        })
        .collect()
}

#[instrument(skip(state))]
async fn prices(State(state): State<AppState>) -> Result<Json<Vec<PriceRow>>> {
    let catalog = ServiceRepository::new(state.pool()).list().await?;
    Ok(Json(price_rows(&catalog)))
}

// =============================================================================
// Availability
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
    /// Comma-separated service ids already chosen, e.g. `1,9`.
    #[serde(default)]
    pub selected: String,
}

/// Parse a comma-separated id list. Blank entries are skipped.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for an entry that is not a positive id.
pub fn parse_selected(raw: &str) -> Result<Vec<ServiceId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<ServiceId>()
                .map_err(|e| AppError::BadRequest(e.to_string()))
        })
        .collect()
}

#[instrument(skip(state))]
async fn available(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AvailableQuery>,
) -> Result<Json<Vec<ServiceOption>>> {
    let selected = parse_selected(&query.selected)?;

    let repo = ServiceRepository::new(state.pool());
    let catalog = repo.list().await?;
    let rules = repo.exclusion_rules().await?;

    Ok(Json(service_options(
        &catalog,
        query.vehicle_type,
        query.size,
        &selected,
        &rules,
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use arycar_core::SizePricing;
    use rust_decimal::Decimal;

    use super::*;

    fn service(id: i32, types: &[VehicleType]) -> Service {
        let pricing: BTreeMap<VehicleType, SizePricing> = types
            .iter()
            .map(|vt| {
                (
                    *vt,
                    SizePricing {
                        cost_p: Money::new(Decimal::from(20)),
                        cost_m: Money::new(Decimal::from(30)),
                        cost_g: Money::ZERO,
                        price_p: Money::new(Decimal::from(50)),
                        price_m: Money::new(Decimal::from(60)),
                        price_g: Money::ZERO,
                    },
                )
            })
            .collect();
        Service {
            id: ServiceId::new(id),
            name: format!("Serviço {id}"),
            pricing,
            hours: Decimal::ONE,
            needs_scheduling: false,
            products: String::new(),
            observation: String::new(),
            price_rule: String::new(),
            per_unit: false,
        }
    }

    #[test]
    fn test_price_rows_cover_every_size() {
        let catalog = vec![
            service(1, &[VehicleType::Carro, VehicleType::Moto]),
            service(2, &[VehicleType::Caminhao]),
        ];
        let rows = price_rows(&catalog);
        assert_eq!(rows.len(), 9);

        let p = &rows[0];
        assert_eq!((p.vehicle_type, p.size), (VehicleType::Carro, VehicleSize::P));
        assert_eq!(p.margin_percent, Some(60));

        let m = rows.iter().find(|r| r.size == VehicleSize::M).unwrap();
        assert_eq!(m.margin_percent, Some(50));

        let g = rows.iter().find(|r| r.size == VehicleSize::G).unwrap();
        assert_eq!(g.margin_percent, None);
    }

    #[test]
    fn test_parse_selected() {
        assert_eq!(
            parse_selected("1, 9,").unwrap(),
            vec![ServiceId::new(1), ServiceId::new(9)]
        );
        assert!(parse_selected("").unwrap().is_empty());
        assert!(parse_selected("1,x").is_err());
        assert!(parse_selected("0").is_err());
    }
}

//! Service orders: creation from a cart, the queue board and edits.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use tracing::{info, instrument};

use arycar_core::{
    CustomerId, NewOrder, OrderId, OrderStatus, OrderSummary, ServiceId, ServiceOption,
    StatusFilter, VehicleId, VehicleSize, VehicleType,
};

use crate::db::{CustomerRepository, OrderRepository, ServiceRepository, VehicleRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::cart::{CartLine, build_cart, check_lines};
use super::{ApiJson, ApiPath, ApiQuery};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(create).get(list))
        .route("/api/orders/{id}", get(show).delete(remove))
        .route("/api/orders/{id}/status", put(update_status))
        .route("/api/orders/{id}/services", post(add_service))
        .route("/api/orders/{id}/services/{service_id}", delete(remove_service))
        .route("/api/orders/{id}/addable", get(addable))
}

async fn load(state: &AppState, id: OrderId) -> Result<OrderSummary> {
    OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

// =============================================================================
// Create
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub vehicle_id: VehicleId,
    /// Overrides the vehicle's registered type for this order.
    pub vehicle_type: Option<VehicleType>,
    /// Overrides the vehicle's registered size for this order.
    pub size: Option<VehicleSize>,
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub pickup_delivery: bool,
}

/// Finalize a cart into a waiting order.
#[instrument(skip(state, req), fields(customer_id = %req.customer_id, vehicle_id = %req.vehicle_id))]
async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderSummary>)> {
    check_lines(&req.lines)?;
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(req.customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {}", req.customer_id)))?;
    let vehicle = VehicleRepository::new(state.pool())
        .get_by_id(req.vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("vehicle {}", req.vehicle_id)))?;

    let services = ServiceRepository::new(state.pool());
    let catalog = services.list().await?;
    let rules = services.exclusion_rules().await?;

    let cart = build_cart(
        req.vehicle_type.unwrap_or(vehicle.vehicle_type),
        req.size.unwrap_or(vehicle.size),
        &req.lines,
        &catalog,
        &rules,
    )?;
    let new_order = NewOrder::from_cart(cart, &customer, &vehicle, req.pickup_delivery)?;
    let order = OrderRepository::new(state.pool()).create(&new_order).await?;

    info!(
        order_id = %order.id,
        plate = %order.vehicle_plate,
        total = %order.total,
        "Order created"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

// =============================================================================
// Queue
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: String,
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<OrderSummary>>> {
    let filter: StatusFilter = query.status.parse().map_err(AppError::BadRequest)?;
    Ok(Json(OrderRepository::new(state.pool()).list(filter).await?))
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<OrderSummary>> {
    Ok(Json(load(&state, id).await?))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<StatusCode> {
    OrderRepository::new(state.pool()).delete(id).await?;
    info!(order_id = %id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Status
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// Move an order on the board. Any status can follow any other.
#[instrument(skip(state, req), fields(status = %req.status))]
async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> Result<Json<OrderSummary>> {
    let order = OrderRepository::new(state.pool())
        .update_status(id, req.status)
        .await?;
    info!(order_id = %id, status = %order.status, "Order status changed");
    Ok(Json(order))
}

// =============================================================================
// Line edits
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddServiceRequest {
    pub service_id: ServiceId,
}

#[instrument(skip(state, req), fields(service_id = %req.service_id))]
async fn add_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(req): ApiJson<AddServiceRequest>,
) -> Result<Json<OrderSummary>> {
    let mut order = load(&state, id).await?;

    let services = ServiceRepository::new(state.pool());
    let service = services
        .get(req.service_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("service {}", req.service_id)))?;
    let rules = services.exclusion_rules().await?;

    order.add_service(&service, &rules)?;
    let order = OrderRepository::new(state.pool()).save_items(&order).await?;

    info!(order_id = %id, service_id = %req.service_id, total = %order.total, "Service added to order");
    Ok(Json(order))
}

#[instrument(skip(state))]
async fn remove_service(
    State(state): State<AppState>,
    ApiPath((id, service_id)): ApiPath<(OrderId, ServiceId)>,
) -> Result<Json<OrderSummary>> {
    let mut order = load(&state, id).await?;

    if !order.remove_service(service_id) {
        return Err(AppError::NotFound(format!(
            "service {service_id} is not in order {id}"
        )));
    }
    let order = OrderRepository::new(state.pool()).save_items(&order).await?;

    info!(order_id = %id, service_id = %service_id, total = %order.total, "Service removed from order");
    Ok(Json(order))
}

#[instrument(skip(state))]
async fn addable(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<Vec<ServiceOption>>> {
    let order = load(&state, id).await?;

    let services = ServiceRepository::new(state.pool());
    let catalog = services.list().await?;
    let rules = services.exclusion_rules().await?;

    Ok(Json(order.addable(&catalog, &rules)))
}

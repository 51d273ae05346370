//! Staff management.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use tracing::{info, instrument};

use arycar_core::{Employee, EmployeeId, EmployeeInput};

use crate::db::EmployeeRepository;
use crate::error::Result;
use crate::state::AppState;

use super::{ApiJson, ApiPath};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/employees", get(list).post(create))
        .route("/api/employees/{id}", put(update).delete(delete))
}

#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Employee>>> {
    Ok(Json(EmployeeRepository::new(state.pool()).list().await?))
}

#[instrument(skip(state, input))]
async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EmployeeInput>,
) -> Result<(StatusCode, Json<Employee>)> {
    let input = input.validated()?;
    let employee = EmployeeRepository::new(state.pool()).create(&input).await?;
    info!(employee_id = %employee.id, "Employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

#[instrument(skip(state, input))]
async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EmployeeId>,
    ApiJson(input): ApiJson<EmployeeInput>,
) -> Result<Json<Employee>> {
    let input = input.validated()?;
    let employee = EmployeeRepository::new(state.pool())
        .update(id, &input)
        .await?;
    info!(employee_id = %id, "Employee updated");
    Ok(Json(employee))
}

#[instrument(skip(state))]
async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EmployeeId>,
) -> Result<StatusCode> {
    EmployeeRepository::new(state.pool()).delete(id).await?;
    info!(employee_id = %id, "Employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

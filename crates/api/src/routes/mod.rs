//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/health                          - DB connectivity
//! GET    /api/version                         - Service name and version
//!
//! # Intake
//! POST   /api/intake/search                   - Find a vehicle (and owner) by plate
//! POST   /api/intake/register                 - Register customer + vehicle
//! POST   /api/intake/vehicles/{id}/km         - Record km on check-in
//! GET    /api/customers/{id}                  - Customer with vehicles
//!
//! # Catalog
//! GET    /api/services                        - List services
//! POST   /api/services                        - Create service
//! PUT    /api/services/{id}                   - Replace service
//! DELETE /api/services/{id}                   - Delete service
//! GET    /api/services/prices                 - Price table with margins
//! GET    /api/services/available              - Services for a vehicle, with exclusions
//!
//! # Cart and orders
//! POST   /api/cart/quote                      - Price a cart
//! POST   /api/orders                          - Finalize a cart into an OS
//! GET    /api/orders                          - Queue (?status=)
//! GET    /api/orders/{id}                     - Order detail
//! DELETE /api/orders/{id}                     - Delete order
//! PUT    /api/orders/{id}/status              - Move order
//! POST   /api/orders/{id}/services            - Add a service
//! DELETE /api/orders/{id}/services/{sid}      - Remove a service
//! GET    /api/orders/{id}/addable             - Services that can still be added
//!
//! # Staff, checklists, lookups, settings
//! GET    /api/employees                       - List employees
//! POST   /api/employees                       - Create employee
//! PUT    /api/employees/{id}                  - Update employee
//! DELETE /api/employees/{id}                  - Delete employee
//! GET    /api/checklists/items                - Inspection item catalog
//! POST   /api/checklists                      - Save entry/exit checklist
//! GET    /api/checklists?plate=               - Checklists of a vehicle
//! GET    /api/lookup/plate/{plate}            - Plate registration lookup
//! GET    /api/lookup/fipe/{type}/brands       - FIPE brands
//! GET    /api/lookup/fipe/{type}/brands/{code}/models - FIPE models
//! GET    /api/settings                        - Global settings
//! PUT    /api/settings                        - Update global settings
//! ```

pub mod cart;
pub mod checklists;
pub mod customers;
pub mod employees;
pub mod health;
pub mod intake;
pub mod lookup;
pub mod orders;
pub mod services;
pub mod settings;

use axum::Router;
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;
use crate::state::AppState;

/// JSON body extractor whose rejections are reported as [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections are reported as [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor whose rejections are reported as [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(intake::router())
        .merge(customers::router())
        .merge(services::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(employees::router())
        .merge(checklists::router())
        .merge(lookup::router())
        .merge(settings::router())
}

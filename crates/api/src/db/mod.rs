//! Database operations for the AryCar `PostgreSQL` store.
//!
//! ## Tables (schema `arycar`)
//!
//! - `customer` / `vehicle` - registered customers and their vehicles
//! - `service` / `service_price` - catalog and per-type price tables
//! - `exclusion_group` - mutually exclusive services
//! - `service_order` - service orders with a JSONB cart snapshot
//! - `employee` - shop staff
//! - `checklist` - entry/exit inspection sheets (JSONB items)
//! - `settings` - global key/value settings (JSONB)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p arycar-cli -- migrate
//! ```
//!
//! Queries are checked at runtime (`query_as` + `FromRow`), so building the
//! crate does not need a live database.

pub mod checklists;
pub mod customers;
pub mod employees;
pub mod orders;
pub mod services;
pub mod settings;
pub mod vehicles;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use checklists::ChecklistRepository;
pub use customers::CustomerRepository;
pub use employees::EmployeeRepository;
pub use orders::OrderRepository;
pub use services::ServiceRepository;
pub use settings::SettingsRepository;
pub use vehicles::VehicleRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate CPF or plate).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-constraint violation to [`RepositoryError::Conflict`]
    /// with `message`; other errors pass through as database errors.
    pub(crate) fn unique_or(err: sqlx::Error, message: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict(message.into())
            }
            _ => Self::Database(err),
        }
    }
}

/// Decode a JSONB column into a typed value, reporting corruption.
pub(crate) fn from_jsonb<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> Result<T, RepositoryError> {
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid {what} in database: {e}")))
}

/// Encode a value for a JSONB column.
pub(crate) fn to_jsonb<T: serde::Serialize>(value: &T, what: &str) -> Result<serde_json::Value, RepositoryError> {
    serde_json::to_value(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("cannot encode {what}: {e}")))
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

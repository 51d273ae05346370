//! Health and version endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Service name reported by `/api/version`.
pub const SERVICE_NAME: &str = "arycar-api";

/// API version reported by `/api/version`.
pub const API_VERSION: &str = "1.0.0";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/version", get(version))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum HealthResponse {
    Up {
        status: &'static str,
        db: &'static str,
        timestamp: DateTime<Utc>,
    },
    Down {
        status: &'static str,
        db: &'static str,
        message: String,
    },
}

/// Database connectivity check.
///
/// Returns 500 with the driver message when the database is unreachable.
async fn health(State(state): State<AppState>) -> Response {
    match sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
        .fetch_one(state.pool())
        .await
    {
        Ok(timestamp) => Json(HealthResponse::Up {
            status: "ok",
            db: "connected",
            timestamp,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse::Down {
                    status: "error",
                    db: "disconnected",
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    service: &'static str,
    version: &'static str,
    message: &'static str,
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: SERVICE_NAME,
        version: API_VERSION,
        message: "Backend base pronto para integrar endpoints do AryCar.",
    })
}

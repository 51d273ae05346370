//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::{FipeClient, LookupError, PlateClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the connection
/// pool and the lookup clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    plate: Option<PlateClient>,
    fipe: FipeClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the plate lookup client cannot be built from the
    /// configured token.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, LookupError> {
        if !config.plate_api.is_configured() {
            tracing::info!("PLATE_API_TOKEN not set; plate lookups disabled");
        }

        let plate = PlateClient::from_config(&config.plate_api)?;
        let fipe = FipeClient::new(&config.fipe_api_url);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                plate,
                fipe,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The plate lookup client, when a token is configured.
    #[must_use]
    pub fn plate(&self) -> Option<&PlateClient> {
        self.inner.plate.as_ref()
    }

    #[must_use]
    pub fn fipe(&self) -> &FipeClient {
        &self.inner.fipe
    }
}

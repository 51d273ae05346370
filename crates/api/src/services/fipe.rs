//! FIPE catalog client (brands and models per vehicle type).
//!
//! The catalog is advisory: intake can always type brand and model by hand,
//! so every failure degrades to an empty list. Brand lists change rarely and
//! are cached for an hour.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use arycar_core::VehicleType;

use super::LookupError;

/// A FIPE brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FipeBrand {
    pub codigo: String,
    pub nome: String,
}

/// A FIPE model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FipeModel {
    pub codigo: i64,
    pub nome: String,
}

#[derive(Debug, Default, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    modelos: Vec<FipeModel>,
}

/// Client for the FIPE catalog.
#[derive(Clone)]
pub struct FipeClient {
    inner: Arc<FipeClientInner>,
}

struct FipeClientInner {
    client: reqwest::Client,
    base_url: String,
    brands: Cache<VehicleType, Vec<FipeBrand>>,
}

/// Whether `code` looks like a FIPE brand code: 1 to 10 ASCII digits.
#[must_use]
pub fn is_brand_code(code: &str) -> bool {
    (1..=10).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_digit())
}

impl FipeClient {
    /// Create a client for `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let brands = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(3600))
            .build();

        Self {
            inner: Arc::new(FipeClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.to_owned(),
                brands,
            }),
        }
    }

    /// Brands for a vehicle type. Empty on any failure.
    #[instrument(skip(self))]
    pub async fn brands(&self, vehicle_type: VehicleType) -> Vec<FipeBrand> {
        if let Some(cached) = self.inner.brands.get(&vehicle_type).await {
            debug!("FIPE brands cache hit");
            return cached;
        }

        let url = format!("{}/{}/marcas", self.inner.base_url, vehicle_type.fipe_segment());
        match self.fetch::<Vec<FipeBrand>>(&url).await {
            Ok(brands) => {
                self.inner.brands.insert(vehicle_type, brands.clone()).await;
                brands
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch FIPE brands");
                Vec::new()
            }
        }
    }

    /// Models of a brand. Empty on any failure, including a code that is not
    /// a FIPE brand code.
    #[instrument(skip(self))]
    pub async fn models(&self, vehicle_type: VehicleType, brand_code: &str) -> Vec<FipeModel> {
        if !is_brand_code(brand_code) {
            warn!("Refusing FIPE models lookup for a non-numeric brand code");
            return Vec::new();
        }
        let url = format!(
            "{}/{}/marcas/{}/modelos",
            self.inner.base_url,
            vehicle_type.fipe_segment(),
            brand_code
        );
        match self.fetch::<ModelsResponse>(&url).await {
            Ok(response) => response.modelos,
            Err(e) => {
                warn!(error = %e, "Failed to fetch FIPE models");
                Vec::new()
            }
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LookupError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))
    }
}

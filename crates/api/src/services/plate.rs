//! Plate lookup client (placas.app.br).
//!
//! The API answers `POST {url}/{plate}` with the registration record of the
//! vehicle. Intake uses it to pre-fill brand, model, color, year, vehicle
//! type and size.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use arycar_core::{Plate, VehicleSize, VehicleType};

use crate::config::PlateApiConfig;

use super::LookupError;

/// Raw registration record as returned by the plate API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlateRecord {
    pub numero: String,
    pub marca: String,
    pub modelo: String,
    pub ano_fabricacao: String,
    pub ano_modelo: String,
    pub cor: String,
    pub sub_segmento: String,
    pub segmento: String,
    pub tipo_veiculo: String,
}

/// A plate record translated into intake fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlateLookup {
    pub plate: Plate,
    pub brand: String,
    pub model: String,
    pub color: String,
    /// Model year, falling back to the manufacturing year.
    pub year: String,
    pub vehicle_type: VehicleType,
    pub size: VehicleSize,
}

impl PlateLookup {
    /// Translate a raw record for `plate`.
    #[must_use]
    pub fn from_record(plate: Plate, record: PlateRecord) -> Self {
        let year = if record.ano_modelo.trim().is_empty() {
            record.ano_fabricacao
        } else {
            record.ano_modelo
        };
        Self {
            plate,
            vehicle_type: VehicleType::from_lookup(&record.tipo_veiculo, &record.segmento),
            size: VehicleSize::from_sub_segment(&record.sub_segmento),
            brand: record.marca.trim().to_owned(),
            model: record.modelo.trim().to_owned(),
            color: record.cor.trim().to_owned(),
            year: year.trim().to_owned(),
        }
    }
}

/// Client for the plate lookup API.
#[derive(Clone)]
pub struct PlateClient {
    inner: Arc<PlateClientInner>,
}

struct PlateClientInner {
    client: reqwest::Client,
    url: String,
}

impl PlateClient {
    /// Create a client, or `None` when no token is configured.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn from_config(config: &PlateApiConfig) -> Result<Option<Self>, LookupError> {
        let Some(token) = &config.token else {
            return Ok(None);
        };

        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", token.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| LookupError::Parse(format!("Invalid API token format: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Some(Self {
            inner: Arc::new(PlateClientInner {
                client,
                url: config.url.clone(),
            }),
        }))
    }

    /// Look up a plate.
    ///
    /// Returns `Ok(None)` when the API answers with a non-success status
    /// (unknown plate, quota exhausted).
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or the body is not a
    /// registration record.
    #[instrument(skip(self), fields(plate = %plate))]
    pub async fn lookup(&self, plate: &Plate) -> Result<Option<PlateLookup>, LookupError> {
        let url = format!("{}/{}", self.inner.url, plate.as_str());
        let response = self.inner.client.post(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(status = status.as_u16(), "Plate API returned an error");
            return Ok(None);
        }

        let record: PlateRecord = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(Some(PlateLookup::from_record(plate.clone(), record)))
    }
}

//! Clients for external lookup services.
//!
//! - [`plate`] - vehicle registration lookup by plate (needs a token)
//! - [`fipe`] - FIPE brand/model catalog (public)

pub mod fipe;
pub mod plate;

use thiserror::Error;

pub use fipe::{FipeBrand, FipeClient, FipeModel, is_brand_code};
pub use plate::{PlateClient, PlateLookup};

/// Errors that can occur when calling a lookup API.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

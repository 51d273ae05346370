//! Global shop settings.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use arycar_core::Phone;

use crate::db::SettingsRepository;
use crate::db::settings::WHATSAPP_NUMBER;
use crate::error::Result;
use crate::state::AppState;

use super::ApiJson;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(show).put(update))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Digits only (area code + number); empty when not set.
    #[serde(default)]
    pub whatsapp_number: String,
    /// `wa.me` link for the number, `None` when no number is set.
    #[serde(default, skip_deserializing)]
    pub whatsapp_link: Option<String>,
}

impl Settings {
    fn from_number(number: &Phone) -> Self {
        Self {
            whatsapp_number: number.as_str().to_owned(),
            whatsapp_link: (!number.is_empty()).then(|| format!("https://wa.me/55{}", number.as_str())),
        }
    }
}

#[instrument(skip(state))]
async fn show(State(state): State<AppState>) -> Result<Json<Settings>> {
    let stored = SettingsRepository::new(state.pool())
        .get_string(WHATSAPP_NUMBER)
        .await?;
    Ok(Json(Settings::from_number(&Phone::parse(&stored))))
}

#[instrument(skip(state, req))]
async fn update(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<Settings>,
) -> Result<Json<Settings>> {
    let number = Phone::parse(&req.whatsapp_number);
    SettingsRepository::new(state.pool())
        .set(WHATSAPP_NUMBER, &serde_json::Value::from(number.as_str()))
        .await?;
    info!("WhatsApp number updated");
    Ok(Json(Settings::from_number(&number)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_link() {
        let settings = Settings::from_number(&Phone::parse("(11) 98765-4321"));
        assert_eq!(settings.whatsapp_number, "11987654321");
        assert_eq!(
            settings.whatsapp_link.as_deref(),
            Some("https://wa.me/5511987654321")
        );

        assert_eq!(Settings::from_number(&Phone::parse("")).whatsapp_link, None);
    }
}

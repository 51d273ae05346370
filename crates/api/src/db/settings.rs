//! Global settings stored as JSONB key/value pairs.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::RepositoryError;

/// Setting key for the shop's WhatsApp number.
pub const WHATSAPP_NUMBER: &str = "whatsapp_number";

/// Repository for global settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a setting value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        let value = sqlx::query_scalar("SELECT value FROM arycar.settings WHERE key = $1")
            .bind(key)
            .fetch_optional(self.pool)
            .await?;
        Ok(value)
    }

    /// Set a setting value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO arycar.settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Get a string setting, treating missing and non-string values as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_string(&self, key: &str) -> Result<String, RepositoryError> {
        Ok(self
            .get(key)
            .await?
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default())
    }
}

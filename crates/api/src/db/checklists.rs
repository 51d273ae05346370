//! Inspection checklist repository.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use arycar_core::{Checklist, ChecklistId, ChecklistKind, ItemState, Plate, SavedChecklist};

use super::{RepositoryError, from_jsonb, to_jsonb};

#[derive(sqlx::FromRow)]
struct ChecklistRow {
    id: ChecklistId,
    vehicle_plate: Plate,
    kind: ChecklistKind,
    items: serde_json::Value,
    general_obs: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChecklistRow> for SavedChecklist {
    type Error = RepositoryError;

    fn try_from(r: ChecklistRow) -> Result<Self, Self::Error> {
        let items: BTreeMap<String, ItemState> = from_jsonb(r.items, "checklist items")?;
        Ok(Self {
            id: r.id,
            checklist: Checklist {
                kind: r.kind,
                vehicle_plate: r.vehicle_plate,
                items,
                general_obs: r.general_obs,
            },
            created_at: r.created_at,
        })
    }
}

/// Repository for entry/exit checklists.
pub struct ChecklistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ChecklistRepository<'a> {
    /// Create a new checklist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a filled-in checklist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, checklist: &Checklist) -> Result<SavedChecklist, RepositoryError> {
        let items = to_jsonb(&checklist.items, "checklist items")?;
        sqlx::query_as::<_, ChecklistRow>(
            r"
            INSERT INTO arycar.checklist (vehicle_plate, kind, items, general_obs)
            VALUES ($1, $2, $3, $4)
            RETURNING id, vehicle_plate, kind, items, general_obs, created_at
            ",
        )
        .bind(&checklist.vehicle_plate)
        .bind(checklist.kind)
        .bind(items)
        .bind(&checklist.general_obs)
        .fetch_one(self.pool)
        .await?
        .try_into()
    }

    /// List a vehicle's checklists, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if stored items cannot be
    /// decoded.
    pub async fn list_by_plate(&self, plate: &Plate) -> Result<Vec<SavedChecklist>, RepositoryError> {
        let rows = sqlx::query_as::<_, ChecklistRow>(
            r"
            SELECT id, vehicle_plate, kind, items, general_obs, created_at
            FROM arycar.checklist
            WHERE vehicle_plate = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(plate)
        .fetch_all(self.pool)
        .await?;
        rows.into_iter().map(SavedChecklist::try_from).collect()
    }
}

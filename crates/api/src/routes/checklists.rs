//! Entry/exit inspection checklists.

use std::collections::BTreeMap;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;
use tracing::{info, instrument};

use arycar_core::{
    CHECKLIST_ITEMS, Checklist, ChecklistItemDef, ChecklistKind, ItemState, Plate, SavedChecklist,
};

use crate::db::ChecklistRepository;
use crate::error::Result;
use crate::state::AppState;

use super::{ApiJson, ApiQuery};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/checklists", get(list).post(create))
        .route("/api/checklists/items", get(items))
}

async fn items() -> Json<&'static [ChecklistItemDef]> {
    Json(&CHECKLIST_ITEMS)
}

#[derive(Debug, Deserialize)]
pub struct ChecklistRequest {
    pub kind: ChecklistKind,
    pub vehicle_plate: String,
    /// Only marked or annotated items need to be sent.
    #[serde(default)]
    pub items: BTreeMap<String, ItemState>,
    #[serde(default)]
    pub general_obs: String,
}

#[instrument(skip(state, req), fields(plate = %req.vehicle_plate, kind = ?req.kind))]
async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChecklistRequest>,
) -> Result<(StatusCode, Json<SavedChecklist>)> {
    let plate = Plate::parse(&req.vehicle_plate)?;
    let checklist = Checklist::from_submission(req.kind, plate, req.items, &req.general_obs)?;

    let saved = ChecklistRepository::new(state.pool())
        .create(&checklist)
        .await?;

    info!(
        checklist_id = %saved.id,
        marked = checklist.checked_keys().len(),
        "Checklist saved"
    );
    Ok((StatusCode::CREATED, Json(saved)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub plate: String,
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<SavedChecklist>>> {
    let plate = Plate::parse(&query.plate)?;
    Ok(Json(
        ChecklistRepository::new(state.pool())
            .list_by_plate(&plate)
            .await?,
    ))
}

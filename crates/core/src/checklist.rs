//! Vehicle inspection checklists taken at entry and exit.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChecklistId, ChecklistKind, Plate};

/// Section of the inspection sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecklistCategory {
    Exterior,
    Interior,
    /// Loose items that must stay in the vehicle.
    Itens,
}

/// One line of the inspection sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItemDef {
    pub key: &'static str,
    pub label: &'static str,
    pub category: ChecklistCategory,
}

const fn item(key: &'static str, label: &'static str, category: ChecklistCategory) -> ChecklistItemDef {
    ChecklistItemDef {
        key,
        label,
        category,
    }
}

/// The inspection sheet, in display order.
pub const CHECKLIST_ITEMS: [ChecklistItemDef; 24] = {
    use ChecklistCategory::{Exterior, Interior, Itens};
    [
        item("paint_scratches", "Riscos na pintura", Exterior),
        item("dents", "Amassados", Exterior),
        item("mirrors", "Retrovisores (estado)", Exterior),
        item("windshield", "Para-brisa (trincas/chips)", Exterior),
        item("headlights", "Faróis (funcionamento)", Exterior),
        item("taillights", "Lanternas (funcionamento)", Exterior),
        item("tires", "Pneus (estado geral)", Exterior),
        item("hubcaps", "Calotas/Rodas", Exterior),
        item("antenna", "Antena", Exterior),
        item("wipers", "Palhetas do limpador", Exterior),
        item("seats", "Bancos (rasgos/manchas)", Interior),
        item("dashboard", "Painel (estado)", Interior),
        item("steering", "Volante (estado)", Interior),
        item("ac", "Ar condicionado", Interior),
        item("radio", "Rádio/Multimídia", Interior),
        item("carpets", "Tapetes", Interior),
        item("ceiling", "Teto interno", Interior),
        item("seatbelts", "Cintos de segurança", Interior),
        item("spare_tire", "Estepe", Itens),
        item("jack", "Macaco", Itens),
        item("wrench", "Chave de roda", Itens),
        item("triangle", "Triângulo", Itens),
        item("documents", "Documentos no veículo", Itens),
        item("fuel_level", "Nível de combustível", Itens),
    ]
};

/// Look up an item definition by key.
#[must_use]
pub fn find_item(key: &str) -> Option<&'static ChecklistItemDef> {
    CHECKLIST_ITEMS.iter().find(|i| i.key == key)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("unknown checklist item: {0}")]
    UnknownItem(String),
}

/// State of one item: marked (damage found on entry, confirmed on exit)
/// and an optional note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub note: String,
}

/// A filled-in checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub kind: ChecklistKind,
    pub vehicle_plate: Plate,
    /// Every catalog item, keyed by item key.
    pub items: BTreeMap<String, ItemState>,
    pub general_obs: String,
}

impl Checklist {
    /// A blank sheet: every item unchecked with an empty note.
    #[must_use]
    pub fn new(kind: ChecklistKind, vehicle_plate: Plate) -> Self {
        let items = CHECKLIST_ITEMS
            .iter()
            .map(|def| (def.key.to_owned(), ItemState::default()))
            .collect();
        Self {
            kind,
            vehicle_plate,
            items,
            general_obs: String::new(),
        }
    }

    /// Build a sheet from submitted item states. Items not submitted stay
    /// blank.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::UnknownItem`] for a key outside the catalog.
    pub fn from_submission(
        kind: ChecklistKind,
        vehicle_plate: Plate,
        submitted: BTreeMap<String, ItemState>,
        general_obs: &str,
    ) -> Result<Self, ChecklistError> {
        let mut sheet = Self::new(kind, vehicle_plate);
        for (key, state) in submitted {
            let slot = sheet
                .items
                .get_mut(&key)
                .ok_or_else(|| ChecklistError::UnknownItem(key.clone()))?;
            *slot = ItemState {
                checked: state.checked,
                note: state.note.trim().to_owned(),
            };
        }
        general_obs.trim().clone_into(&mut sheet.general_obs);
        Ok(sheet)
    }

    /// Flip an item's mark.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::UnknownItem`] for a key outside the catalog.
    pub fn toggle(&mut self, key: &str) -> Result<(), ChecklistError> {
        let state = self.slot(key)?;
        state.checked = !state.checked;
        Ok(())
    }

    /// Replace an item's note.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::UnknownItem`] for a key outside the catalog.
    pub fn set_note(&mut self, key: &str, note: &str) -> Result<(), ChecklistError> {
        note.clone_into(&mut self.slot(key)?.note);
        Ok(())
    }

    /// Keys of the marked items, in catalog order.
    #[must_use]
    pub fn checked_keys(&self) -> Vec<&'static str> {
        CHECKLIST_ITEMS
            .iter()
            .filter(|def| self.items.get(def.key).is_some_and(|s| s.checked))
            .map(|def| def.key)
            .collect()
    }

    fn slot(&mut self, key: &str) -> Result<&mut ItemState, ChecklistError> {
        self.items
            .get_mut(key)
            .ok_or_else(|| ChecklistError::UnknownItem(key.to_owned()))
    }
}

/// A stored checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedChecklist {
    pub id: ChecklistId,
    #[serde(flatten)]
    pub checklist: Checklist,
    pub created_at: DateTime<Utc>,
}

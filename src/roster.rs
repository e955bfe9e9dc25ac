//! The character roster.
//!
//! The roster is an ordered list of summaries owned in memory by the
//! store, loaded once at startup and flushed as a single JSON array on
//! every mutation. Whole-list overwrites keep the in-memory list and the
//! stored list from ever disagreeing on count.

use crate::character::{CharacterId, CharacterSummary};
use crate::sheet::{SheetError, SheetStore};
use crate::storage::{KeyValueStore, StorageError};
use std::sync::Arc;
use thiserror::Error;

/// Storage key for the whole roster list.
pub const ROSTER_KEY: &str = "characters";

/// Errors from roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),
}

/// Owner of the ordered character list.
pub struct RosterStore {
    store: Arc<dyn KeyValueStore>,
    characters: Vec<CharacterSummary>,
}

impl RosterStore {
    /// Load the roster from storage; a missing key is an empty roster.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, RosterError> {
        let characters = match store.get(ROSTER_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        log::debug!("roster loaded: {} characters", characters.len());
        Ok(Self { store, characters })
    }

    /// Summaries in insertion order.
    pub fn list(&self) -> &[CharacterSummary] {
        &self.characters
    }

    pub fn get(&self, id: CharacterId) -> Option<&CharacterSummary> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Display name for `id`: the saved sheet's name when one exists,
    /// otherwise the summary's creation name. `None` for unknown ids.
    pub async fn display_name(
        &self,
        sheets: &SheetStore,
        id: CharacterId,
    ) -> Result<Option<String>, RosterError> {
        let Some(summary) = self.get(id) else {
            return Ok(None);
        };
        let name = match sheets.load(id).await? {
            Some(sheet) => sheet.name,
            None => summary.name.clone(),
        };
        Ok(Some(name))
    }

    /// Add a character and persist the updated list. Name and image are
    /// required; validation happens before any persistence attempt.
    pub async fn add(
        &mut self,
        name: &str,
        image_ref: &str,
    ) -> Result<CharacterSummary, RosterError> {
        let name = name.trim();
        let image_ref = image_ref.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyField { field: "name" });
        }
        if image_ref.is_empty() {
            return Err(RosterError::EmptyField { field: "image_ref" });
        }

        let summary = CharacterSummary::new(name, image_ref);
        self.characters.push(summary.clone());
        if let Err(e) = self.flush().await {
            // Roll the in-memory list back so it matches storage.
            self.characters.pop();
            log::warn!("roster add rolled back: {e}");
            return Err(e);
        }
        Ok(summary)
    }

    /// Remove a character and its sheet. Unknown ids are a silent no-op.
    pub async fn remove(
        &mut self,
        sheets: &SheetStore,
        id: CharacterId,
    ) -> Result<(), RosterError> {
        let Some(pos) = self.characters.iter().position(|c| c.id == id) else {
            return Ok(());
        };

        let removed = self.characters.remove(pos);
        if let Err(e) = self.flush().await {
            self.characters.insert(pos, removed);
            log::warn!("roster remove rolled back: {e}");
            return Err(e);
        }

        // Orphan reclamation: the sheet store is otherwise independent.
        sheets.delete(id).await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), RosterError> {
        let raw = serde_json::to_string(&self.characters)?;
        self.store.set(ROSTER_KEY, &raw).await?;
        Ok(())
    }
}

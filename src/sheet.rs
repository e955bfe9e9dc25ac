//! Character sheet persistence.
//!
//! Each sheet is stored as a full JSON overwrite under its own key.
//! Saves for the same character are serialized through a per-id lock so
//! a double-tapped save queues behind the first write instead of racing
//! it; saves for different characters proceed independently.

use crate::character::{CharacterId, CharacterSheet};
use crate::storage::{KeyValueStore, StorageError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Storage key for one character's sheet.
pub fn sheet_key(id: CharacterId) -> String {
    format!("character_{id}")
}

/// Errors from sheet store operations.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence for detailed character sheets.
pub struct SheetStore {
    store: Arc<dyn KeyValueStore>,
    save_locks: Mutex<HashMap<CharacterId, Arc<Mutex<()>>>>,
}

impl SheetStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            save_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Load the sheet for `id`, `Ok(None)` when it has never been saved.
    /// Loaded sheets are normalized so all six abilities are present.
    pub async fn load(&self, id: CharacterId) -> Result<Option<CharacterSheet>, SheetError> {
        match self.store.get(&sheet_key(id)).await? {
            Some(raw) => {
                let mut sheet: CharacterSheet = serde_json::from_str(&raw)?;
                sheet.normalize();
                Ok(Some(sheet))
            }
            None => Ok(None),
        }
    }

    /// Persist `sheet` as a full overwrite under its id. Saves for the
    /// same id queue behind each other.
    pub async fn save(&self, sheet: &CharacterSheet) -> Result<(), SheetError> {
        let lock = self.lock_for(sheet.id).await;
        let _guard = lock.lock().await;

        let raw = serde_json::to_string(sheet)?;
        self.store.set(&sheet_key(sheet.id), &raw).await?;
        log::debug!("saved sheet {}", sheet.id);
        Ok(())
    }

    /// Remove the sheet for `id`; absent sheets are a no-op.
    pub async fn delete(&self, id: CharacterId) -> Result<(), SheetError> {
        let lock = self.lock_for(id).await;
        let _guard = lock.lock().await;

        self.store.delete(&sheet_key(id)).await?;
        drop(_guard);
        self.save_locks.lock().await.remove(&id);
        log::debug!("deleted sheet {id}");
        Ok(())
    }

    async fn lock_for(&self, id: CharacterId) -> Arc<Mutex<()>> {
        self.save_locks
            .lock()
            .await
            .entry(id)
            .or_default()
            .clone()
    }
}

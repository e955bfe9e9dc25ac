//! Core of a personal tabletop-RPG character tracker.
//!
//! This crate provides:
//! - A persisted roster of character summaries
//! - Per-character editable sheets with an explicit edit/save/cancel
//!   lifecycle
//! - A dice roller for d4 through d20
//!
//! UI shells (navigation, image picking, login screens) sit on top of
//! this crate and talk to it through the store and session types; all
//! durable state goes through the [`storage::KeyValueStore`] adapter.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use rpg_tracker::{EditSession, MemoryStore, RosterStore, SheetField, SheetStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let mut roster = RosterStore::load(store.clone()).await?;
//!     let sheets = SheetStore::new(store);
//!
//!     let thorn = roster.add("Thorn", "img://1").await?;
//!
//!     let mut session = EditSession::open(&thorn, &sheets).await.session;
//!     session.begin_edit()?;
//!     session.set_field(SheetField::Life, "25")?;
//!     session.save(&sheets).await?;
//!     Ok(())
//! }
//! ```

pub mod character;
pub mod dice;
pub mod roster;
pub mod session;
pub mod sheet;
pub mod storage;
pub mod testing;

// Primary public API
pub use character::{Ability, CharacterId, CharacterSheet, CharacterSummary, Skill, StatValue};
pub use dice::{DiceError, DiceRoller, Die};
pub use roster::{RosterError, RosterStore};
pub use session::{
    EditSession, OpenOutcome, SessionError, SessionState, SheetField, SkillField,
};
pub use sheet::{SheetError, SheetStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

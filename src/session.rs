//! Edit session state machine for one character's detail view.
//!
//! A session starts in `Viewing`, populated from the sheet store (or
//! synthesized defaults for a never-saved character). `begin_edit` takes
//! a rollback snapshot; edits mutate only the working copy; `save`
//! persists and returns to `Viewing`; `cancel` restores the snapshot
//! without touching storage. A failed save keeps the session editable
//! with the working copy intact so the caller can retry.

use crate::character::{Ability, CharacterSheet, CharacterSummary, Skill, StatValue};
use crate::sheet::{SheetError, SheetStore};
use thiserror::Error;

/// Errors from edit session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is not in editing state")]
    NotEditing,

    #[error("session is already in editing state")]
    AlreadyEditing,

    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Viewing,
    Editing,
}

/// An editable field on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetField {
    Name,
    Life,
    ArmorClass,
    Mana,
    Items,
    Speed,
    Initiative,
    Attribute(Ability),
}

/// One half of a skill row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillField {
    Name,
    Value,
}

/// Placeholder name for a freshly added skill row.
const NEW_SKILL_NAME: &str = "New skill";

/// Outcome of opening a detail view: the session plus a non-fatal notice
/// when the stored sheet could not be read and defaults were used.
pub struct OpenOutcome {
    pub session: EditSession,
    pub load_error: Option<SheetError>,
}

/// Per-sheet read-modify-save/cancel coordinator.
pub struct EditSession {
    sheet: CharacterSheet,
    // Rollback snapshot; present exactly while editing.
    snapshot: Option<CharacterSheet>,
}

impl EditSession {
    /// Open a session for `summary`, loading the saved sheet or falling
    /// back to defaults. A load failure also falls back to defaults and
    /// is surfaced as a non-fatal notice.
    pub async fn open(summary: &CharacterSummary, sheets: &SheetStore) -> OpenOutcome {
        let (sheet, load_error) = match sheets.load(summary.id).await {
            Ok(Some(sheet)) => (sheet, None),
            Ok(None) => (CharacterSheet::from_summary(summary), None),
            Err(e) => {
                log::warn!("sheet load failed for {}, using defaults: {e}", summary.id);
                (CharacterSheet::from_summary(summary), Some(e))
            }
        };
        OpenOutcome {
            session: Self {
                sheet,
                snapshot: None,
            },
            load_error,
        }
    }

    /// The currently displayed sheet (the working copy while editing).
    pub fn sheet(&self) -> &CharacterSheet {
        &self.sheet
    }

    pub fn state(&self) -> SessionState {
        if self.snapshot.is_some() {
            SessionState::Editing
        } else {
            SessionState::Viewing
        }
    }

    pub fn is_editing(&self) -> bool {
        self.state() == SessionState::Editing
    }

    /// Viewing -> Editing, capturing the rollback snapshot.
    pub fn begin_edit(&mut self) -> Result<(), SessionError> {
        if self.snapshot.is_some() {
            return Err(SessionError::AlreadyEditing);
        }
        self.snapshot = Some(self.sheet.clone());
        Ok(())
    }

    /// Change one field of the working copy. Numeric-ish fields are
    /// parsed permissively: unparseable input is kept as raw text.
    pub fn set_field(&mut self, field: SheetField, raw: &str) -> Result<(), SessionError> {
        self.require_editing()?;
        match field {
            SheetField::Name => self.sheet.name = raw.to_string(),
            SheetField::Items => self.sheet.items = raw.to_string(),
            SheetField::Speed => self.sheet.speed = raw.to_string(),
            SheetField::Life => self.sheet.life = StatValue::parse(raw),
            SheetField::ArmorClass => self.sheet.armor_class = StatValue::parse(raw),
            SheetField::Mana => self.sheet.mana = StatValue::parse(raw),
            SheetField::Initiative => self.sheet.initiative = StatValue::parse(raw),
            SheetField::Attribute(ability) => {
                self.sheet.attributes.insert(ability, StatValue::parse(raw));
            }
        }
        Ok(())
    }

    /// Append a placeholder skill row.
    pub fn add_skill(&mut self) -> Result<(), SessionError> {
        self.require_editing()?;
        self.sheet.skills.push(Skill::new(NEW_SKILL_NAME, ""));
        Ok(())
    }

    /// Delete the skill at `index`; out-of-range is a no-op.
    pub fn remove_skill(&mut self, index: usize) -> Result<(), SessionError> {
        self.require_editing()?;
        if index < self.sheet.skills.len() {
            self.sheet.skills.remove(index);
        }
        Ok(())
    }

    /// Replace one field of the skill at `index`; out-of-range is a
    /// no-op.
    pub fn change_skill(
        &mut self,
        index: usize,
        field: SkillField,
        raw: &str,
    ) -> Result<(), SessionError> {
        self.require_editing()?;
        if let Some(skill) = self.sheet.skills.get_mut(index) {
            match field {
                SkillField::Name => skill.name = raw.to_string(),
                SkillField::Value => skill.value = raw.to_string(),
            }
        }
        Ok(())
    }

    /// Persist the working copy; Editing -> Viewing on success. On a
    /// persistence failure the session stays in Editing with the working
    /// copy intact and the error is returned for retry.
    pub async fn save(&mut self, sheets: &SheetStore) -> Result<(), SessionError> {
        self.require_editing()?;
        sheets.save(&self.sheet).await?;
        self.snapshot = None;
        Ok(())
    }

    /// Discard the working copy and restore the rollback snapshot;
    /// Editing -> Viewing, no persistence call.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        let snapshot = self.snapshot.take().ok_or(SessionError::NotEditing)?;
        self.sheet = snapshot;
        Ok(())
    }

    fn require_editing(&self) -> Result<(), SessionError> {
        if self.snapshot.is_some() {
            Ok(())
        } else {
            Err(SessionError::NotEditing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::DEFAULT_ABILITY_SCORE;
    use crate::roster::RosterStore;
    use crate::storage::MemoryStore;
    use crate::testing::FlakyStore;
    use std::sync::Arc;

    async fn open_fresh() -> (CharacterSummary, SheetStore, EditSession) {
        let backing = Arc::new(MemoryStore::new());
        let sheets = SheetStore::new(backing);
        let summary = CharacterSummary::new("Thorn", "img://1");
        let outcome = EditSession::open(&summary, &sheets).await;
        assert!(outcome.load_error.is_none());
        (summary, sheets, outcome.session)
    }

    #[tokio::test]
    async fn test_open_never_saved_uses_defaults() {
        let (_, _, session) = open_fresh().await;

        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.sheet().life, StatValue::Num(0));
        for ability in Ability::all() {
            assert_eq!(
                session.sheet().attribute(ability),
                Some(DEFAULT_ABILITY_SCORE)
            );
        }
    }

    #[tokio::test]
    async fn test_mutations_require_editing() {
        let (_, _, mut session) = open_fresh().await;

        assert!(matches!(
            session.set_field(SheetField::Life, "25"),
            Err(SessionError::NotEditing)
        ));
        assert!(matches!(session.add_skill(), Err(SessionError::NotEditing)));
        assert!(matches!(session.cancel(), Err(SessionError::NotEditing)));

        session.begin_edit().unwrap();
        assert!(matches!(
            session.begin_edit(),
            Err(SessionError::AlreadyEditing)
        ));
    }

    #[tokio::test]
    async fn test_cancel_restores_snapshot() {
        let (_, _, mut session) = open_fresh().await;
        let before = session.sheet().clone();

        session.begin_edit().unwrap();
        session.set_field(SheetField::Life, "25").unwrap();
        session.set_field(SheetField::Name, "Renamed").unwrap();
        session
            .set_field(SheetField::Attribute(Ability::Strength), "18")
            .unwrap();
        session.add_skill().unwrap();

        session.cancel().unwrap();
        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.sheet(), &before);
    }

    #[tokio::test]
    async fn test_cancel_never_persists() {
        let backing = Arc::new(MemoryStore::new());
        let sheets = SheetStore::new(backing.clone());
        let summary = CharacterSummary::new("Thorn", "img://1");
        let mut session = EditSession::open(&summary, &sheets).await.session;

        session.begin_edit().unwrap();
        session.set_field(SheetField::Life, "25").unwrap();
        session.cancel().unwrap();

        assert!(sheets.load(summary.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_persists_and_returns_to_viewing() {
        let (summary, sheets, mut session) = open_fresh().await;

        session.begin_edit().unwrap();
        session.set_field(SheetField::Life, "25").unwrap();
        session.save(&sheets).await.unwrap();
        assert_eq!(session.state(), SessionState::Viewing);

        // Reopening the detail view sees the saved value.
        let reopened = EditSession::open(&summary, &sheets).await.session;
        assert_eq!(reopened.sheet().life, StatValue::Num(25));
    }

    #[tokio::test]
    async fn test_failed_save_stays_editing_and_retries() {
        let backing = Arc::new(FlakyStore::new());
        let sheets = SheetStore::new(backing.clone());
        let summary = CharacterSummary::new("Thorn", "img://1");
        let mut session = EditSession::open(&summary, &sheets).await.session;

        session.begin_edit().unwrap();
        session.set_field(SheetField::Life, "25").unwrap();

        backing.fail_next_sets(1);
        let err = session.save(&sheets).await.unwrap_err();
        assert!(matches!(err, SessionError::Sheet(_)));

        // Still editing, working copy intact, retry succeeds.
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.sheet().life, StatValue::Num(25));
        session.save(&sheets).await.unwrap();
        assert_eq!(session.state(), SessionState::Viewing);
    }

    #[tokio::test]
    async fn test_open_load_failure_falls_back_to_defaults() {
        let backing = Arc::new(FlakyStore::new());
        let sheets = SheetStore::new(backing.clone());
        let summary = CharacterSummary::new("Thorn", "img://1");

        backing.fail_next_gets(1);
        let outcome = EditSession::open(&summary, &sheets).await;
        assert!(outcome.load_error.is_some());
        assert_eq!(outcome.session.sheet().life, StatValue::Num(0));
    }

    #[tokio::test]
    async fn test_skill_editing() {
        let (_, _, mut session) = open_fresh().await;
        session.begin_edit().unwrap();

        session.add_skill().unwrap();
        session.add_skill().unwrap();
        assert_eq!(session.sheet().skills.len(), 2);
        assert_eq!(session.sheet().skills[0].name, "New skill");

        session.change_skill(0, SkillField::Name, "Stealth").unwrap();
        session.change_skill(0, SkillField::Value, "4").unwrap();
        assert_eq!(session.sheet().skills[0], Skill::new("Stealth", "4"));

        // Out-of-range edits and removals are no-ops.
        session.change_skill(9, SkillField::Name, "x").unwrap();
        session.remove_skill(9).unwrap();
        assert_eq!(session.sheet().skills.len(), 2);

        session.remove_skill(1).unwrap();
        assert_eq!(session.sheet().skills.len(), 1);
        assert_eq!(session.sheet().skills[0].name, "Stealth");
    }

    #[tokio::test]
    async fn test_permissive_numeric_fields() {
        let (_, _, mut session) = open_fresh().await;
        session.begin_edit().unwrap();

        session.set_field(SheetField::Initiative, "+2").unwrap();
        assert_eq!(session.sheet().initiative, StatValue::Text("+2".into()));

        session.set_field(SheetField::Initiative, "2").unwrap();
        assert_eq!(session.sheet().initiative, StatValue::Num(2));
    }

    // End-to-end: add a character, edit life, save, reload the detail
    // view and see the edit.
    #[tokio::test]
    async fn test_add_edit_save_reload_scenario() {
        let backing = Arc::new(MemoryStore::new());
        let mut roster = RosterStore::load(backing.clone()).await.unwrap();
        let sheets = SheetStore::new(backing.clone());

        let summary = roster.add("Thorn", "img://1").await.unwrap();
        assert_eq!(roster.list().len(), 1);

        let mut session = EditSession::open(&summary, &sheets).await.session;
        for ability in Ability::all() {
            assert_eq!(session.sheet().attribute(ability), Some(10));
        }
        assert_eq!(session.sheet().life, StatValue::Num(0));

        session.begin_edit().unwrap();
        session.set_field(SheetField::Life, "25").unwrap();
        session.save(&sheets).await.unwrap();

        let reopened = EditSession::open(&summary, &sheets).await.session;
        assert_eq!(reopened.sheet().life, StatValue::Num(25));
    }
}

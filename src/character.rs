//! Character data model.
//!
//! Contains the roster-facing summary, the full editable sheet, the six
//! ability scores, and the tagged stat value used for fields that are
//! edited as free text but are semantically numeric.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Default score for an ability that has never been edited.
pub const DEFAULT_ABILITY_SCORE: i64 = 10;

/// Default movement speed for a fresh sheet.
pub const DEFAULT_SPEED: &str = "30m";

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Stat Values
// ============================================================================

/// A stat edited as free text but semantically numeric.
///
/// Input that parses as an integer is stored numerically and is the
/// authoritative value for numeric reads; anything else is kept verbatim
/// so placeholders like "2d4+1" or "-" survive a save/load round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Num(i64),
    Text(String),
}

impl StatValue {
    /// Parse raw field input. Trimmed integers become `Num`, everything
    /// else is preserved as `Text`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => StatValue::Num(n),
            Err(_) => StatValue::Text(raw.to_string()),
        }
    }

    /// Numeric view, `None` for free-form text.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            StatValue::Num(n) => Some(*n),
            StatValue::Text(_) => None,
        }
    }
}

impl Default for StatValue {
    fn default() -> Self {
        StatValue::Num(0)
    }
}

impl From<i64> for StatValue {
    fn from(n: i64) -> Self {
        StatValue::Num(n)
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Num(n) => write!(f, "{n}"),
            StatValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ============================================================================
// Summary & Sheet
// ============================================================================

/// Roster entry shown on the home screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub name: String,
    pub image_ref: String,
}

impl CharacterSummary {
    pub fn new(name: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// A named skill row on the sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub value: String,
}

impl Skill {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Full editable record for one character.
///
/// `id` always matches a live `CharacterSummary`; the roster store
/// deletes the sheet when the summary goes away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub id: CharacterId,
    pub name: String,
    pub life: StatValue,
    pub armor_class: StatValue,
    pub mana: StatValue,
    pub items: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub attributes: BTreeMap<Ability, StatValue>,
    #[serde(default = "default_speed")]
    pub speed: String,
    #[serde(default)]
    pub initiative: StatValue,
}

fn default_speed() -> String {
    DEFAULT_SPEED.to_string()
}

impl CharacterSheet {
    /// Synthesize the default sheet for a character that has never been
    /// saved: zeroed stats, all six abilities at 10.
    pub fn from_summary(summary: &CharacterSummary) -> Self {
        let mut sheet = Self {
            id: summary.id,
            name: summary.name.clone(),
            life: StatValue::default(),
            armor_class: StatValue::default(),
            mana: StatValue::default(),
            items: String::new(),
            skills: Vec::new(),
            attributes: BTreeMap::new(),
            speed: DEFAULT_SPEED.to_string(),
            initiative: StatValue::default(),
        };
        sheet.normalize();
        sheet
    }

    /// Ensure the attribute map carries exactly the six canonical
    /// abilities, filling absentees with the default score. Run after
    /// deserialization so older saves stay loadable.
    pub fn normalize(&mut self) {
        for ability in Ability::all() {
            self.attributes
                .entry(ability)
                .or_insert(StatValue::Num(DEFAULT_ABILITY_SCORE));
        }
    }

    /// Attribute score, numeric view.
    pub fn attribute(&self, ability: Ability) -> Option<i64> {
        self.attributes.get(&ability).and_then(StatValue::as_number)
    }
}

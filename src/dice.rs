//! Dice rolling.
//!
//! A roller holds a die size, a dice count, and the most recent results.
//! Rolling replaces the previous result set; the UI's spin animation is
//! cosmetic and lives outside this crate.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for dice configuration.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),

    #[error("Dice count must be at least 1")]
    InvalidCount,
}

/// The die sizes offered by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl Die {
    pub fn sides(&self) -> u32 {
        match self {
            Die::D4 => 4,
            Die::D6 => 6,
            Die::D8 => 8,
            Die::D10 => 10,
            Die::D12 => 12,
            Die::D20 => 20,
        }
    }

    pub fn from_sides(sides: u32) -> Option<Die> {
        match sides {
            4 => Some(Die::D4),
            6 => Some(Die::D6),
            8 => Some(Die::D8),
            10 => Some(Die::D10),
            12 => Some(Die::D12),
            20 => Some(Die::D20),
            _ => None,
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Dice roller configuration and last results.
#[derive(Debug, Clone)]
pub struct DiceRoller {
    die: Die,
    count: u32,
    results: Vec<u32>,
}

impl DiceRoller {
    /// A d4 roller with count 1 and no results.
    pub fn new() -> Self {
        Self {
            die: Die::D4,
            count: 1,
            results: Vec::new(),
        }
    }

    pub fn die(&self) -> Die {
        self.die
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Results of the most recent roll, empty before the first roll and
    /// after `clear`.
    pub fn results(&self) -> &[u32] {
        &self.results
    }

    pub fn set_die(&mut self, die: Die) {
        self.die = die;
    }

    /// Select the die by side count; sizes outside the offered set are
    /// rejected.
    pub fn set_die_size(&mut self, sides: u32) -> Result<(), DiceError> {
        self.die = Die::from_sides(sides).ok_or(DiceError::InvalidDieSize(sides))?;
        Ok(())
    }

    pub fn set_count(&mut self, count: u32) -> Result<(), DiceError> {
        if count == 0 {
            return Err(DiceError::InvalidCount);
        }
        self.count = count;
        Ok(())
    }

    pub fn increment_count(&mut self) {
        self.count += 1;
    }

    /// Decrement with a floor of 1; decrementing at 1 is a no-op.
    pub fn decrement_count(&mut self) {
        if self.count > 1 {
            self.count -= 1;
        }
    }

    /// Roll `count` dice, replacing any previous results.
    pub fn roll(&mut self) -> &[u32] {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_with_rng<R: Rng>(&mut self, rng: &mut R) -> &[u32] {
        let sides = self.die.sides();
        self.results = (0..self.count).map(|_| rng.gen_range(1..=sides)).collect();
        &self.results
    }

    /// Sum of the most recent roll.
    pub fn total(&self) -> u32 {
        self.results.iter().sum()
    }

    /// Drop the current result set.
    pub fn clear(&mut self) {
        self.results.clear();
    }
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::new()
    }
}

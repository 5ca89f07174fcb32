use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::card::{Card, CardSide};
use crate::model::ids::CardUid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionConfigError {
    #[error(
        "max cycles must be between {min} and {max}, got {got}",
        min = MaxCycles::MIN,
        max = MaxCycles::MAX
    )]
    MaxCyclesOutOfRange { got: u32 },

    #[error("unknown card order: {0}")]
    UnknownCardOrder(String),
}

//
// ─── CONFIGURATION ─────────────────────────────────────────────────────────────
//

/// Order applied once when the first cycle's queue is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardOrder {
    #[default]
    Original,
    Random,
}

impl FromStr for CardOrder {
    type Err = SessionConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "random" => Ok(Self::Random),
            _ => Err(SessionConfigError::UnknownCardOrder(s.to_owned())),
        }
    }
}

/// Hard ceiling on retry passes, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MaxCycles(u32);

impl MaxCycles {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 6;

    /// # Errors
    ///
    /// Returns `SessionConfigError::MaxCyclesOutOfRange` outside `1..=6`.
    pub fn new(value: u32) -> Result<Self, SessionConfigError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SessionConfigError::MaxCyclesOutOfRange { got: value })
        }
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for MaxCycles {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u32> for MaxCycles {
    type Error = SessionConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MaxCycles> for u32 {
    fn from(value: MaxCycles) -> Self {
        value.0
    }
}

/// Options chosen once before a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub start_side: CardSide,
    pub max_cycles: MaxCycles,
    pub card_order: CardOrder,
}

impl SessionConfig {
    #[must_use]
    pub fn new(start_side: CardSide, max_cycles: MaxCycles, card_order: CardOrder) -> Self {
        Self {
            start_side,
            max_cycles,
            card_order,
        }
    }

    /// The face shown when the learner commits a judgment.
    #[must_use]
    pub fn scoring_side(&self) -> CardSide {
        self.start_side.opposite()
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Snapshot of a study session between two transitions.
///
/// Transitions live in [`crate::engine`]; each one returns a fresh snapshot and
/// leaves its input untouched, so two snapshots can be compared with `==`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) cycle: u32,
    pub(crate) max_cycles: u32,
    pub(crate) cycle_queue: Vec<Card>,
    pub(crate) current_card_index: usize,
    pub(crate) incorrect_card_ids: BTreeSet<CardUid>,
    pub(crate) cycle1_answers: BTreeMap<CardUid, bool>,
}

impl SessionState {
    /// Current pass number, starting at 1.
    #[must_use]
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    #[must_use]
    pub fn max_cycles(&self) -> u32 {
        self.max_cycles
    }

    /// Cards of the current cycle, fixed once the cycle starts.
    #[must_use]
    pub fn cycle_queue(&self) -> &[Card] {
        &self.cycle_queue
    }

    /// Position in the cycle queue; equals its length once the cycle is exhausted.
    #[must_use]
    pub fn current_card_index(&self) -> usize {
        self.current_card_index
    }

    /// Cards that still need practice.
    #[must_use]
    pub fn incorrect_card_ids(&self) -> &BTreeSet<CardUid> {
        &self.incorrect_card_ids
    }

    /// First judgment given to each card during cycle 1.
    #[must_use]
    pub fn cycle1_answers(&self) -> &BTreeMap<CardUid, bool> {
        &self.cycle1_answers
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.cycle_queue.get(self.current_card_index)
    }

    #[must_use]
    pub fn is_cycle_exhausted(&self) -> bool {
        self.current_card_index >= self.cycle_queue.len()
    }

    #[must_use]
    pub fn remaining_in_cycle(&self) -> usize {
        self.cycle_queue.len().saturating_sub(self.current_card_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_cycles_bounds() {
        assert!(MaxCycles::new(0).is_err());
        assert_eq!(MaxCycles::new(1).unwrap().get(), 1);
        assert_eq!(MaxCycles::new(6).unwrap().get(), 6);
        assert_eq!(
            MaxCycles::new(7).unwrap_err(),
            SessionConfigError::MaxCyclesOutOfRange { got: 7 }
        );
    }

    #[test]
    fn scoring_side_is_opposite_of_start_side() {
        let config = SessionConfig::new(CardSide::Back, MaxCycles::default(), CardOrder::Original);
        assert_eq!(config.scoring_side(), CardSide::Front);
        assert_eq!(SessionConfig::default().scoring_side(), CardSide::Back);
    }

    #[test]
    fn card_order_parses() {
        assert_eq!("random".parse::<CardOrder>().unwrap(), CardOrder::Random);
        assert_eq!(" Original ".parse::<CardOrder>().unwrap(), CardOrder::Original);
        assert!("shuffled".parse::<CardOrder>().is_err());
    }
}

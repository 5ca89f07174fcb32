use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CardId, CardUid};

//
// ─── CARD SIDE ─────────────────────────────────────────────────────────────────
//

/// One face of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSide {
    #[default]
    Front,
    Back,
}

impl CardSide {
    /// The face on the other side of the card.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            CardSide::Front => CardSide::Back,
            CardSide::Back => CardSide::Front,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CardSide::Front => "front",
            CardSide::Back => "back",
        }
    }
}

impl FromStr for CardSide {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            _ => Err(CardError::UnknownSide(s.to_owned())),
        }
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("card front cannot be empty")]
    EmptyFront,

    #[error("card back cannot be empty")]
    EmptyBack,

    #[error("unknown card side: {0}")]
    UnknownSide(String),
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A front/back text pair with a stable, globally unique identifier.
///
/// Cards are immutable once built. Two cards are the same card when their
/// `uid`s match, whatever their text.
#[derive(Debug, Clone)]
pub struct Card {
    id: CardId,
    uid: CardUid,
    front: String,
    back: String,
}

impl Card {
    /// Creates a card, trimming both faces.
    ///
    /// # Errors
    ///
    /// Returns `CardError::EmptyFront` or `CardError::EmptyBack` when a face is blank.
    pub fn new(
        id: CardId,
        uid: CardUid,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Result<Self, CardError> {
        let front = front.into();
        let back = back.into();
        if front.trim().is_empty() {
            return Err(CardError::EmptyFront);
        }
        if back.trim().is_empty() {
            return Err(CardError::EmptyBack);
        }

        Ok(Self {
            id,
            uid,
            front: front.trim().to_owned(),
            back: back.trim().to_owned(),
        })
    }

    pub(crate) fn with_uid(mut self, uid: CardUid) -> Self {
        self.uid = uid;
        self
    }

    #[must_use]
    pub fn id(&self) -> &CardId {
        &self.id
    }

    #[must_use]
    pub fn uid(&self) -> &CardUid {
        &self.uid
    }

    #[must_use]
    pub fn front(&self) -> &str {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &str {
        &self.back
    }

    /// Text shown on the given face.
    #[must_use]
    pub fn face(&self, side: CardSide) -> &str {
        match side {
            CardSide::Front => &self.front,
            CardSide::Back => &self.back,
        }
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uid.hash(state);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

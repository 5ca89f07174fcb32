use std::collections::HashSet;

use thiserror::Error;

use crate::model::card::Card;
use crate::model::ids::{CardId, CardUid, DeckId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck title cannot be empty")]
    EmptyTitle,

    #[error("duplicate card id in deck: {0}")]
    DuplicateCardId(CardId),

    #[error("duplicate card uid in deck: {0}")]
    DuplicateCardUid(CardUid),
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// An ordered collection of flashcards.
///
/// Card order is meaningful: it is the order of the first study cycle (unless
/// shuffled) and of every retry cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    id: DeckId,
    title: String,
    description: Option<String>,
    prompt: Option<String>,
    cards: Vec<Card>,
}

impl Deck {
    /// Creates a new Deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyTitle` if title is empty or whitespace-only,
    /// and `DeckError::DuplicateCardId` / `DeckError::DuplicateCardUid` when
    /// two cards share an identifier.
    pub fn new(
        id: DeckId,
        title: impl Into<String>,
        description: Option<String>,
        prompt: Option<String>,
        cards: Vec<Card>,
    ) -> Result<Self, DeckError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DeckError::EmptyTitle);
        }

        let mut ids = HashSet::with_capacity(cards.len());
        let mut uids = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !ids.insert(card.id()) {
                return Err(DeckError::DuplicateCardId(card.id().clone()));
            }
            if !uids.insert(card.uid()) {
                return Err(DeckError::DuplicateCardUid(card.uid().clone()));
            }
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description: non_blank(description),
            prompt: non_blank(prompt),
            cards,
        })
    }

    /// Returns the same deck stored under a different id.
    ///
    /// Card uids derived from the old id (`<old>:<card>`) are re-derived from
    /// the new one; explicit uids are kept as they are.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::DuplicateCardUid` when a re-derived uid clashes
    /// with an explicit uid of another card in the deck.
    pub fn with_id(self, id: DeckId) -> Result<Self, DeckError> {
        let old = self.id;
        let cards = self
            .cards
            .into_iter()
            .map(|card| {
                if *card.uid() == CardUid::derive(&old, card.id()) {
                    let uid = CardUid::derive(&id, card.id());
                    card.with_uid(uid)
                } else {
                    card
                }
            })
            .collect();
        Self::new(id, self.title, self.description, self.prompt, cards)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &DeckId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The request text a generated deck was built from, if any.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> DeckSummary {
        DeckSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            card_count: self.cards.len(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Listing shape of a deck, without its cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSummary {
    pub id: DeckId,
    pub title: String,
    pub description: Option<String>,
    pub card_count: usize,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

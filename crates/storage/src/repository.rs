use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use study_core::model::{
    Card, CardError, CardId, CardUid, Deck, DeckError, DeckId, DeckSummary, ParseIdError,
};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Reasons a stored deck record cannot become a domain `Deck`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("invalid id: {0}")]
    Id(#[from] ParseIdError),

    #[error("invalid card {card}: {source}")]
    Card {
        card: String,
        #[source]
        source: CardError,
    },

    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Persisted shape of a card inside a deck file.
///
/// `uid` is optional on disk; a missing one defaults to `<deck-id>:<card-id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// Persisted shape of a deck: `{ id, title, description?, prompt?, cards[] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub cards: Vec<CardRecord>,
}

impl DeckRecord {
    #[must_use]
    pub fn from_deck(deck: &Deck) -> Self {
        Self {
            id: deck.id().to_string(),
            title: deck.title().to_owned(),
            description: deck.description().map(str::to_owned),
            prompt: deck.prompt().map(str::to_owned),
            cards: deck
                .cards()
                .iter()
                .map(|card| CardRecord {
                    id: card.id().to_string(),
                    front: card.front().to_owned(),
                    back: card.back().to_owned(),
                    uid: Some(card.uid().to_string()),
                })
                .collect(),
        }
    }

    /// Convert the record back into a domain `Deck`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if an id is malformed, a card face is blank, or
    /// the deck fails validation (empty title, duplicate ids).
    pub fn into_deck(self) -> Result<Deck, RecordError> {
        let deck_id = DeckId::new(self.id)?;
        let mut cards = Vec::with_capacity(self.cards.len());
        for record in self.cards {
            let card_id = CardId::new(record.id)?;
            let uid = match record.uid {
                Some(uid) => CardUid::new(uid)?,
                None => CardUid::derive(&deck_id, &card_id),
            };
            let label = card_id.to_string();
            let card = Card::new(card_id, uid, record.front, record.back)
                .map_err(|source| RecordError::Card { card: label, source })?;
            cards.push(card);
        }

        Ok(Deck::new(
            deck_id,
            self.title,
            self.description,
            self.prompt,
            cards,
        )?)
    }
}

/// Yields `base`, then `base-2`, `base-3`, … for collision-safe inserts.
pub(crate) fn candidate_ids(base: &DeckId) -> impl Iterator<Item = DeckId> + '_ {
    std::iter::once(base.clone()).chain(
        (2_u32..).filter_map(move |n| DeckId::new(format!("{base}-{n}")).ok()),
    )
}

/// Moves `deck` to the candidate `id`, or `None` when the move would make a
/// re-derived card uid clash with an explicit one.
pub(crate) fn rehome(deck: &Deck, id: &DeckId) -> Option<Deck> {
    match deck.clone().with_id(id.clone()) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            log::debug!("skipping deck id {id}: {e}");
            None
        }
    }
}

/// Repository contract for decks and their cards.
///
/// Decks are read as snapshots; a study session never writes through here.
#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// List every readable deck, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be listed.
    async fn list_decks(&self) -> Result<Vec<DeckSummary>, StorageError>;

    /// Fetch a deck with its cards in stored order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_deck(&self, id: &DeckId) -> Result<Deck, StorageError>;

    /// Persist or replace a deck under its own id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deck cannot be stored.
    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError>;

    /// Store a new deck without overwriting an existing one.
    ///
    /// When the deck's id is taken, the first free id among `id-2`, `id-3`, …
    /// is used instead. Returns the id the deck was stored under.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deck cannot be stored.
    async fn insert_new_deck(&self, deck: &Deck) -> Result<DeckId, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    decks: Arc<Mutex<BTreeMap<DeckId, Deck>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            decks: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

#[async_trait]
impl DeckRepository for InMemoryRepository {
    async fn list_decks(&self) -> Result<Vec<DeckSummary>, StorageError> {
        let guard = self
            .decks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().map(Deck::summary).collect())
    }

    async fn get_deck(&self, id: &DeckId) -> Result<Deck, StorageError> {
        let guard = self
            .decks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let mut guard = self
            .decks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(deck.id().clone(), deck.clone());
        Ok(())
    }

    async fn insert_new_deck(&self, deck: &Deck) -> Result<DeckId, StorageError> {
        let mut guard = self
            .decks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let (id, resolved) = candidate_ids(deck.id())
            .filter(|id| !guard.contains_key(id))
            .find_map(|id| rehome(deck, &id).map(|resolved| (id, resolved)))
            .ok_or(StorageError::Conflict)?;
        guard.insert(id.clone(), resolved);
        Ok(id)
    }
}

/// Aggregates the deck repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub decks: Arc<dyn DeckRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            decks: Arc::new(InMemoryRepository::new()),
        }
    }

    /// Build a `Storage` reading and writing `<deck-id>.json` files in `dir`.
    #[must_use]
    pub fn json(dir: impl Into<PathBuf>) -> Self {
        Self {
            decks: Arc::new(crate::json::JsonDeckRepository::new(dir)),
        }
    }
}

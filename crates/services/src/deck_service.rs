use std::sync::Arc;

use storage::repository::{DeckRecord, DeckRepository};
use study_core::model::{Deck, DeckId, DeckSummary};

use crate::error::DeckServiceError;

/// Orchestrates deck listing, loading and persistence.
#[derive(Clone)]
pub struct DeckService {
    decks: Arc<dyn DeckRepository>,
}

impl DeckService {
    #[must_use]
    pub fn new(decks: Arc<dyn DeckRepository>) -> Self {
        Self { decks }
    }

    /// List decks ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub async fn list_decks(&self) -> Result<Vec<DeckSummary>, DeckServiceError> {
        Ok(self.decks.list_decks().await?)
    }

    /// Fetch a deck by id.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` (`NotFound` included) if the deck
    /// cannot be loaded.
    pub async fn get_deck(&self, deck_id: &DeckId) -> Result<Deck, DeckServiceError> {
        Ok(self.decks.get_deck(deck_id).await?)
    }

    /// Validate a deck record and store it without overwriting anything.
    ///
    /// Returns the id the deck was stored under, which carries a numeric
    /// suffix when the requested id was already taken.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Record` for validation failures.
    /// Returns `DeckServiceError::Storage` if persistence fails.
    pub async fn create_deck(&self, record: DeckRecord) -> Result<DeckId, DeckServiceError> {
        let deck = record.into_deck()?;
        let requested = deck.id().clone();
        let deck_id = self.decks.insert_new_deck(&deck).await?;
        if deck_id != requested {
            log::info!("deck id {requested} is taken; stored as {deck_id}");
        }
        Ok(deck_id)
    }

    /// Persist edits to an existing deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if the deck does not exist or
    /// persistence fails.
    pub async fn update_deck(&self, deck: &Deck) -> Result<(), DeckServiceError> {
        // make sure we are editing, not creating
        self.decks.get_deck(deck.id()).await?;
        self.decks.upsert_deck(deck).await?;
        Ok(())
    }
}

//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::{RecordError, StorageError};
use study_core::model::CardUid;

/// Errors emitted by `DeckService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeckServiceError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("this deck has no cards to study")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("answer given for card {got}, but the current card is {expected}")]
    UnexpectedCard { expected: CardUid, got: CardUid },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

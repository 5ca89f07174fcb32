#![forbid(unsafe_code)]

//! Deck storage: the repository contract plus in-memory, JSON-directory and
//! `SQLite` adapters.

pub mod json;
pub mod repository;
pub mod sqlite;

pub use repository::{CardRecord, DeckRecord, DeckRepository, RecordError, Storage, StorageError};

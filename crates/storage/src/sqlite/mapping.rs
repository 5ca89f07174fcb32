use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use study_core::model::{DeckId, DeckSummary};

use crate::repository::{CardRecord, DeckRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps driver errors, surfacing constraint clashes (e.g. a card uid already
/// used by another deck) as `Conflict`.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

pub(crate) fn position_to_i64(index: usize) -> Result<i64, StorageError> {
    i64::try_from(index).map_err(|_| StorageError::Serialization("position overflow".into()))
}

pub(crate) fn map_card_row(row: &SqliteRow) -> Result<CardRecord, StorageError> {
    Ok(CardRecord {
        id: row.try_get("id").map_err(ser)?,
        front: row.try_get("front").map_err(ser)?,
        back: row.try_get("back").map_err(ser)?,
        uid: Some(row.try_get("uid").map_err(ser)?),
    })
}

pub(crate) fn map_deck_row(
    row: &SqliteRow,
    cards: Vec<CardRecord>,
) -> Result<DeckRecord, StorageError> {
    Ok(DeckRecord {
        id: row.try_get("id").map_err(ser)?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        prompt: row.try_get("prompt").map_err(ser)?,
        cards,
    })
}

pub(crate) fn map_summary_row(row: &SqliteRow) -> Result<DeckSummary, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let card_count: i64 = row.try_get("card_count").map_err(ser)?;
    Ok(DeckSummary {
        id: DeckId::new(id).map_err(ser)?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        card_count: usize::try_from(card_count)
            .map_err(|_| StorageError::Serialization(format!("invalid card_count: {card_count}")))?,
    })
}

use sqlx::SqliteConnection;
use study_core::model::{Deck, DeckId, DeckSummary};

use super::SqliteRepository;
use super::mapping::{db_err, map_card_row, map_deck_row, map_summary_row, position_to_i64};
use crate::repository::{DeckRepository, StorageError, candidate_ids, rehome};

async fn insert_cards(conn: &mut SqliteConnection, deck: &Deck) -> Result<(), StorageError> {
    for (index, card) in deck.cards().iter().enumerate() {
        sqlx::query(
            r"
            INSERT INTO cards (deck_id, id, uid, position, front, back)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(deck.id().as_str())
        .bind(card.id().as_str())
        .bind(card.uid().as_str())
        .bind(position_to_i64(index)?)
        .bind(card.front())
        .bind(card.back())
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl DeckRepository for SqliteRepository {
    async fn list_decks(&self) -> Result<Vec<DeckSummary>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT d.id, d.title, d.description, COUNT(c.id) AS card_count
            FROM decks d
            LEFT JOIN cards c ON c.deck_id = d.id
            GROUP BY d.id, d.title, d.description
            ORDER BY d.id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            match map_summary_row(&row) {
                Ok(summary) => summaries.push(summary),
                Err(e) => log::warn!("skipping unreadable deck row: {e}"),
            }
        }
        Ok(summaries)
    }

    async fn get_deck(&self, id: &DeckId) -> Result<Deck, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, prompt
            FROM decks WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(StorageError::NotFound)?;

        let card_rows = sqlx::query(
            r"
            SELECT id, uid, front, back
            FROM cards
            WHERE deck_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut cards = Vec::with_capacity(card_rows.len());
        for card_row in &card_rows {
            cards.push(map_card_row(card_row)?);
        }

        Ok(map_deck_row(&row, cards)?.into_deck()?)
    }

    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r"
            INSERT INTO decks (id, title, description, prompt)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                prompt = excluded.prompt
            ",
        )
        .bind(deck.id().as_str())
        .bind(deck.title())
        .bind(deck.description())
        .bind(deck.prompt())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        // card order lives in `position`, so the list is replaced wholesale
        sqlx::query("DELETE FROM cards WHERE deck_id = ?1")
            .bind(deck.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        insert_cards(&mut *tx, deck).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn insert_new_deck(&self, deck: &Deck) -> Result<DeckId, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let mut resolved = None;
        for id in candidate_ids(deck.id()) {
            let Some(rehomed) = rehome(deck, &id) else {
                continue;
            };
            let res = sqlx::query(
                r"
                INSERT INTO decks (id, title, description, prompt)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO NOTHING
                ",
            )
            .bind(id.as_str())
            .bind(deck.title())
            .bind(deck.description())
            .bind(deck.prompt())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            if res.rows_affected() == 1 {
                resolved = Some((id, rehomed));
                break;
            }
        }
        let (id, rehomed) = resolved.ok_or(StorageError::Conflict)?;

        insert_cards(&mut *tx, &rehomed).await?;
        tx.commit().await.map_err(db_err)?;
        log::info!("stored new deck {id}");
        Ok(id)
    }
}

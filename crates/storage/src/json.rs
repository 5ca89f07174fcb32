//! Deck repository backed by a directory of `<deck-id>.json` files.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use study_core::model::{Deck, DeckId, DeckSummary};

use crate::repository::{DeckRecord, DeckRepository, StorageError, candidate_ids, rehome};

fn io_err(e: io::Error) -> StorageError {
    StorageError::Io(e.to_string())
}

/// Reads and writes one JSON file per deck.
///
/// A deck's `id` must match its file stem. Writes go through a temporary file
/// in the same directory followed by a rename, so readers never see a partial
/// deck.
#[derive(Debug, Clone)]
pub struct JsonDeckRepository {
    dir: PathBuf,
}

impl JsonDeckRepository {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &DeckId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    async fn read_deck(path: &Path) -> Result<Deck, StorageError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound,
            _ => io_err(e),
        })?;
        let record: DeckRecord = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if record.id != stem {
            return Err(StorageError::Serialization(format!(
                "deck id '{}' does not match filename stem '{stem}'",
                record.id
            )));
        }

        Ok(record.into_deck()?)
    }

    async fn write_deck(&self, deck: &Deck, overwrite: bool) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(&DeckRecord::from_deck(deck))
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let dir = self.dir.clone();
        let target = self.path_for(deck.id());

        tokio::task::spawn_blocking(move || persist_atomically(&dir, &target, &json, overwrite))
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => StorageError::Conflict,
                _ => io_err(e),
            })
    }

    async fn deck_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            let is_hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if is_json && !is_hidden {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn persist_atomically(dir: &Path, target: &Path, json: &[u8], overwrite: bool) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".deck-")
        .suffix(".json")
        .tempfile_in(dir)?;
    tmp.write_all(json)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;

    if overwrite {
        tmp.persist(target).map_err(|e| e.error)?;
    } else {
        tmp.persist_noclobber(target).map_err(|e| e.error)?;
    }
    Ok(())
}

#[async_trait]
impl DeckRepository for JsonDeckRepository {
    async fn list_decks(&self) -> Result<Vec<DeckSummary>, StorageError> {
        let mut summaries = Vec::new();
        for path in self.deck_files().await? {
            match Self::read_deck(&path).await {
                Ok(deck) => summaries.push(deck.summary()),
                Err(e) => log::warn!("skipping deck file {}: {e}", path.display()),
            }
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn get_deck(&self, id: &DeckId) -> Result<Deck, StorageError> {
        Self::read_deck(&self.path_for(id)).await
    }

    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        self.write_deck(deck, true).await?;
        log::debug!("wrote deck {} to {}", deck.id(), self.dir.display());
        Ok(())
    }

    async fn insert_new_deck(&self, deck: &Deck) -> Result<DeckId, StorageError> {
        for id in candidate_ids(deck.id()) {
            if tokio::fs::try_exists(self.path_for(&id)).await.map_err(io_err)? {
                continue;
            }
            let Some(resolved) = rehome(deck, &id) else {
                continue;
            };
            match self.write_deck(&resolved, false).await {
                Ok(()) => {
                    log::info!("stored new deck {id} in {}", self.dir.display());
                    return Ok(id);
                }
                // lost a race with another writer; try the next suffix
                Err(StorageError::Conflict) => {}
                Err(e) => return Err(e),
            }
        }
        Err(StorageError::Conflict)
    }
}

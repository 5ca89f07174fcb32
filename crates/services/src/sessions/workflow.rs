use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use storage::repository::DeckRepository;
use study_core::model::{DeckId, SessionConfig};

use super::service::{AnswerResult, StudySession};
use crate::error::SessionError;

/// Orchestrates session start from storage and logs the session's transitions.
///
/// Sessions are never written back: the deck is read once as a snapshot.
#[derive(Clone)]
pub struct SessionLoopService {
    decks: Arc<dyn DeckRepository>,
    shuffle_seed: Option<u64>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(decks: Arc<dyn DeckRepository>) -> Self {
        Self {
            decks,
            shuffle_seed: None,
        }
    }

    /// Use a fixed seed for random card order, making shuffles reproducible.
    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: Option<u64>) -> Self {
        self.shuffle_seed = seed;
        self
    }

    /// Start a new session for the given deck.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the deck cannot be loaded and
    /// `SessionError::Empty` if it has no cards.
    pub async fn start_session(
        &self,
        deck_id: &DeckId,
        config: SessionConfig,
    ) -> Result<StudySession, SessionError> {
        let deck = self.decks.get_deck(deck_id).await?;
        let session = match self.shuffle_seed {
            Some(seed) => {
                StudySession::with_rng(&deck, config, &mut StdRng::seed_from_u64(seed))
            }
            None => StudySession::new(&deck, config),
        };
        let session = session.inspect_err(|e| log::warn!("cannot study deck {deck_id}: {e}"))?;

        log::info!(
            "started session on deck {deck_id}: {} cards, start side {}, max cycles {}, order {:?}",
            deck.cards().len(),
            config.start_side.as_str(),
            config.max_cycles.get(),
            config.card_order,
        );
        Ok(session)
    }

    /// Answer the current card, logging cycle changes and the session end.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session already ended.
    pub fn answer_current(
        &self,
        session: &mut StudySession,
        was_correct: bool,
    ) -> Result<AnswerResult, SessionError> {
        let result = session.answer_current(was_correct)?;
        log::debug!(
            "card {} judged {} in cycle {}",
            result.card_uid,
            if result.was_correct { "correct" } else { "incorrect" },
            result.answered_in_cycle,
        );

        if result.decision.should_advance {
            log::info!(
                "starting cycle {} with {} cards to retry",
                result.cycle,
                session.state().cycle_queue().len(),
            );
        }
        if result.is_complete {
            let report = session.report();
            log::info!(
                "session on deck {} ended after {} cycles ({:?}): first try {}%, overall {}%",
                report.deck_id,
                report.cycles_run,
                report.end_reason,
                report.scores.right_on_first_try.percent,
                report.scores.overall.percent,
            );
        }
        Ok(result)
    }
}

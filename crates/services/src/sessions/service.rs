use rand::Rng;
use serde::Serialize;

use study_core::engine::{
    self, CycleDecision, EndReason, apply_answer, init_session_with_queue, should_advance_cycle,
    start_next_cycle,
};
use study_core::model::{Card, CardSide, CardUid, Deck, DeckId, SessionConfig, SessionState};
use study_core::scoring::{card_outcomes, compute_breakdown, compute_scores};

use super::plan::first_cycle_queue;
use super::progress::SessionProgress;
use super::view::{CardResult, SessionReport};
use crate::error::SessionError;

//
// ─── ANSWER RESULT ─────────────────────────────────────────────────────────────
//

/// Captures the outcome of judging a single card within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerResult {
    pub card_uid: CardUid,
    pub was_correct: bool,
    /// Decision evaluated right after the answer. When it says advance, the
    /// session has already moved on to the next cycle.
    pub decision: CycleDecision,
    /// Cycle the card was answered in.
    pub answered_in_cycle: u32,
    /// Cycle the session is in after the answer.
    pub cycle: u32,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Stateful study session over one deck.
///
/// Owns the deck's cards in their original order, the configuration chosen at
/// start, and the current engine snapshot. Unlike the engine it guards its
/// contract: answering a card other than the current one, or answering after
/// the session ended, is an error.
pub struct StudySession {
    deck_id: DeckId,
    cards: Vec<Card>,
    config: SessionConfig,
    state: SessionState,
}

impl StudySession {
    /// Start a session over `deck`, shuffling with the thread-local RNG when
    /// the configuration asks for a random order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the deck has no cards.
    pub fn new(deck: &Deck, config: SessionConfig) -> Result<Self, SessionError> {
        Self::with_rng(deck, config, &mut rand::rng())
    }

    /// Same as [`StudySession::new`] with a caller-provided RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the deck has no cards.
    pub fn with_rng<R: Rng + ?Sized>(
        deck: &Deck,
        config: SessionConfig,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if deck.is_empty() {
            return Err(SessionError::Empty);
        }

        let cards = deck.cards().to_vec();
        let queue = first_cycle_queue(&cards, config.card_order, rng);
        let state = init_session_with_queue(queue, config.max_cycles);

        Ok(Self {
            deck_id: deck.id().clone(),
            cards,
            config,
            state,
        })
    }

    #[must_use]
    pub fn deck_id(&self) -> &DeckId {
        &self.deck_id
    }

    /// Current engine snapshot.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        if self.is_complete() {
            return None;
        }
        self.state.current_card()
    }

    /// Text shown first for the current card.
    #[must_use]
    pub fn shown_face(&self) -> Option<&str> {
        self.current_card()
            .map(|card| card.face(self.config.start_side))
    }

    /// Text revealed before the learner judges the current card.
    #[must_use]
    pub fn scoring_face(&self) -> Option<&str> {
        self.current_card()
            .map(|card| card.face(self.config.scoring_side()))
    }

    #[must_use]
    pub fn scoring_side(&self) -> CardSide {
        self.config.scoring_side()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        should_advance_cycle(&self.state).should_end
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        engine::end_reason(&self.state)
    }

    /// Judge the card currently on screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session has ended.
    pub fn answer_current(&mut self, was_correct: bool) -> Result<AnswerResult, SessionError> {
        let uid = self
            .current_card()
            .map(|card| card.uid().clone())
            .ok_or(SessionError::Completed)?;
        self.answer_card(&uid, was_correct)
    }

    /// Judge a card by uid; it must be the card currently on screen.
    ///
    /// Starts the next cycle on its own when the answer exhausts a cycle that
    /// still leaves cards outstanding.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session has ended, and
    /// `SessionError::UnexpectedCard` when `card_uid` is not the current card.
    pub fn answer_card(
        &mut self,
        card_uid: &CardUid,
        was_correct: bool,
    ) -> Result<AnswerResult, SessionError> {
        let expected = self
            .current_card()
            .map(|card| card.uid().clone())
            .ok_or(SessionError::Completed)?;
        if expected != *card_uid {
            return Err(SessionError::UnexpectedCard {
                expected,
                got: card_uid.clone(),
            });
        }

        let answered_in_cycle = self.state.cycle();
        let answered = apply_answer(&self.state, card_uid, was_correct);
        let decision = should_advance_cycle(&answered);
        self.state = if decision.should_advance {
            start_next_cycle(&answered, &self.cards)
        } else {
            answered
        };

        Ok(AnswerResult {
            card_uid: expected,
            was_correct,
            decision,
            answered_in_cycle,
            cycle: self.state.cycle(),
            is_complete: decision.should_end,
        })
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let cycle_len = self.state.cycle_queue().len();
        SessionProgress {
            cycle: self.state.cycle(),
            max_cycles: self.state.max_cycles(),
            position: (self.state.current_card_index() + 1).min(cycle_len),
            cycle_len,
            remaining_in_cycle: self.state.remaining_in_cycle(),
            outstanding: self.state.incorrect_card_ids().len(),
            is_complete: self.is_complete(),
        }
    }

    /// Scores and per-card outcomes so far.
    ///
    /// Available at any point; a session abandoned mid-way reports the cards it
    /// never reached in cycle 1 as unattempted.
    #[must_use]
    pub fn report(&self) -> SessionReport {
        SessionReport {
            deck_id: self.deck_id.clone(),
            cycles_run: self.state.cycle(),
            end_reason: self.end_reason(),
            scores: compute_scores(&self.state),
            breakdown: compute_breakdown(&self.cards, &self.state),
            outcomes: card_outcomes(&self.cards, &self.state)
                .into_iter()
                .map(|(card, outcome)| CardResult::new(card, outcome))
                .collect(),
        }
    }
}

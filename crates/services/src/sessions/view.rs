use serde::Serialize;

use study_core::engine::EndReason;
use study_core::model::{Card, CardUid, DeckId};
use study_core::scoring::{Breakdown, Outcome, Scores};

/// Outcome of one card, with the text needed to list it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardResult {
    pub uid: CardUid,
    pub front: String,
    pub back: String,
    pub outcome: Outcome,
}

impl CardResult {
    #[must_use]
    pub fn new(card: &Card, outcome: Outcome) -> Self {
        Self {
            uid: card.uid().clone(),
            front: card.front().to_owned(),
            back: card.back().to_owned(),
            outcome,
        }
    }
}

/// End-of-session report.
///
/// Presentation-agnostic: no pre-formatted strings, so a terminal or any other
/// front end can render it as it likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub deck_id: DeckId,
    pub cycles_run: u32,
    /// `None` when the session was left before it ended.
    pub end_reason: Option<EndReason>,
    pub scores: Scores,
    pub breakdown: Breakdown,
    /// Every card of the deck, in deck order.
    pub outcomes: Vec<CardResult>,
}

impl SessionReport {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.end_reason.is_some()
    }

    /// Cards that still need practice after the session.
    pub fn missed(&self) -> impl Iterator<Item = &CardResult> {
        self.outcomes
            .iter()
            .filter(|result| result.outcome == Outcome::Missed)
    }
}

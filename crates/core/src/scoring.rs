//! Scores and per-card outcomes derived from a session state.
//!
//! Only cycle 1 counts toward "right on first try". Later cycles can only move
//! a card from missed to corrected; a card right in cycle 1 stays right.

use serde::Serialize;

use crate::model::{Card, SessionState};

/// Result of a single card over the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    CorrectFirstTime,
    CorrectOnRetry,
    Missed,
    /// Never answered in cycle 1: the session was left before reaching it, or
    /// the state was built from a different card list.
    Unattempted,
}

impl Outcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::CorrectFirstTime => "correct-first-time",
            Outcome::CorrectOnRetry => "correct-on-retry",
            Outcome::Missed => "missed",
            Outcome::Unattempted => "unattempted",
        }
    }
}

/// `correct` out of `total`, with a whole-number percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub percent: u32,
}

impl Score {
    /// Builds a score, rounding the percentage half-up; 0 when `total` is 0.
    #[must_use]
    pub fn new(correct: usize, total: usize) -> Self {
        Self {
            correct,
            total,
            percent: percent_half_up(correct, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scores {
    pub right_on_first_try: Score,
    pub overall: Score,
}

/// Outcome counts across a deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub correct_first_time: usize,
    pub correct_on_retry: usize,
    pub missed: usize,
    pub unattempted: usize,
}

impl Breakdown {
    #[must_use]
    pub fn total(&self) -> usize {
        self.correct_first_time + self.correct_on_retry + self.missed + self.unattempted
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::CorrectFirstTime => self.correct_first_time += 1,
            Outcome::CorrectOnRetry => self.correct_on_retry += 1,
            Outcome::Missed => self.missed += 1,
            Outcome::Unattempted => self.unattempted += 1,
        }
    }
}

/// Classifies a card from its cycle-1 answer and whether it is still outstanding.
#[must_use]
pub fn classify_card_outcome(card: &Card, state: &SessionState) -> Outcome {
    match state.cycle1_answers.get(card.uid()) {
        None => Outcome::Unattempted,
        Some(true) => Outcome::CorrectFirstTime,
        Some(false) if state.incorrect_card_ids.contains(card.uid()) => Outcome::Missed,
        Some(false) => Outcome::CorrectOnRetry,
    }
}

/// Computes first-try and overall scores over the cards answered in cycle 1.
#[must_use]
pub fn compute_scores(state: &SessionState) -> Scores {
    let total = state.cycle1_answers.len();
    let first_try = state
        .cycle1_answers
        .values()
        .filter(|&&correct| correct)
        .count();
    let overall = state
        .cycle1_answers
        .iter()
        .filter(|&(uid, &correct)| correct || !state.incorrect_card_ids.contains(uid))
        .count();

    Scores {
        right_on_first_try: Score::new(first_try, total),
        overall: Score::new(overall, total),
    }
}

/// Counts outcomes across every card of the deck, attempted or not.
#[must_use]
pub fn compute_breakdown(all_cards: &[Card], state: &SessionState) -> Breakdown {
    all_cards
        .iter()
        .map(|card| classify_card_outcome(card, state))
        .fold(Breakdown::default(), |mut acc, outcome| {
            acc.record(outcome);
            acc
        })
}

/// Pairs each card with its outcome, in deck order.
#[must_use]
pub fn card_outcomes<'a>(all_cards: &'a [Card], state: &SessionState) -> Vec<(&'a Card, Outcome)> {
    all_cards
        .iter()
        .map(|card| (card, classify_card_outcome(card, state)))
        .collect()
}

fn percent_half_up(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = (correct as u128 * 200 + total as u128) / (total as u128 * 2);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{apply_answer, init_session, should_advance_cycle, start_next_cycle};
    use crate::model::{CardId, CardUid, DeckId, MaxCycles};

    fn card(id: &str) -> Card {
        let deck = DeckId::new("deck").unwrap();
        let card_id = CardId::new(id).unwrap();
        let uid = CardUid::derive(&deck, &card_id);
        Card::new(card_id, uid, "front", "back").unwrap()
    }

    fn deck(ids: &[&str]) -> Vec<Card> {
        ids.iter().map(|id| card(id)).collect()
    }

    fn answer_current(state: &SessionState, correct: bool) -> SessionState {
        let uid = state.current_card().unwrap().uid().clone();
        apply_answer(state, &uid, correct)
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(Score::new(2, 3).percent, 67);
        assert_eq!(Score::new(1, 3).percent, 33);
        assert_eq!(Score::new(1, 8).percent, 13); // 12.5
        assert_eq!(Score::new(1, 200).percent, 1); // 0.5
        assert_eq!(Score::new(3, 3).percent, 100);
        assert_eq!(Score::new(0, 0).percent, 0);
    }

    #[test]
    fn three_card_scenario_scores() {
        let cards = deck(&["A", "B", "C"]);
        let mut state = init_session(&cards, MaxCycles::new(4).unwrap());
        state = answer_current(&state, true);
        state = answer_current(&state, false);
        state = answer_current(&state, true);
        state = start_next_cycle(&state, &cards);
        state = answer_current(&state, true);
        assert!(should_advance_cycle(&state).should_end);

        let scores = compute_scores(&state);
        assert_eq!(scores.right_on_first_try, Score { correct: 2, total: 3, percent: 67 });
        assert_eq!(scores.overall, Score { correct: 3, total: 3, percent: 100 });

        assert_eq!(
            compute_breakdown(&cards, &state),
            Breakdown {
                correct_first_time: 2,
                correct_on_retry: 1,
                missed: 0,
                unattempted: 0,
            }
        );
    }

    #[test]
    fn all_correct_first_cycle_scores_full_marks() {
        let cards = deck(&["1", "2", "3", "4", "5"]);
        let mut state = init_session(&cards, MaxCycles::new(3).unwrap());
        while !state.is_cycle_exhausted() {
            state = answer_current(&state, true);
        }

        let scores = compute_scores(&state);
        assert_eq!(scores.right_on_first_try.percent, 100);
        assert_eq!(scores.overall.percent, 100);
        assert_eq!(compute_breakdown(&cards, &state).correct_first_time, 5);
    }

    #[test]
    fn ceiling_session_reports_both_cards_missed() {
        let cards = deck(&["x", "y"]);
        let mut state = init_session(&cards, MaxCycles::new(3).unwrap());
        loop {
            while !state.is_cycle_exhausted() {
                state = answer_current(&state, false);
            }
            if should_advance_cycle(&state).should_end {
                break;
            }
            state = start_next_cycle(&state, &cards);
        }

        let breakdown = compute_breakdown(&cards, &state);
        assert_eq!(breakdown.missed, 2);
        assert_eq!(breakdown.total(), 2);

        let scores = compute_scores(&state);
        assert_eq!(scores.overall, Score { correct: 0, total: 2, percent: 0 });
    }

    #[test]
    fn first_cycle_correct_is_never_downgraded() {
        let cards = deck(&["a"]);
        let uid = cards[0].uid().clone();
        let state = init_session(&cards, MaxCycles::new(3).unwrap());
        let state = apply_answer(&state, &uid, true);
        // out-of-contract second answer leaves the card outstanding
        let state = apply_answer(&state, &uid, false);

        assert!(state.incorrect_card_ids().contains(&uid));
        assert_eq!(classify_card_outcome(&cards[0], &state), Outcome::CorrectFirstTime);
    }

    #[test]
    fn cards_missing_from_cycle1_are_unattempted() {
        let studied = deck(&["a"]);
        let mut state = init_session(&studied, MaxCycles::new(2).unwrap());
        state = answer_current(&state, true);

        let full = deck(&["a", "b"]);
        assert_eq!(classify_card_outcome(&full[1], &state), Outcome::Unattempted);

        let breakdown = compute_breakdown(&full, &state);
        assert_eq!(breakdown.unattempted, 1);
        assert_eq!(breakdown.correct_first_time, 1);

        // unattempted cards never enter the denominator
        assert_eq!(compute_scores(&state).overall.total, 1);
    }

    #[test]
    fn classification_is_repeatable() {
        let cards = deck(&["a", "b"]);
        let mut state = init_session(&cards, MaxCycles::new(2).unwrap());
        state = answer_current(&state, false);
        for card in &cards {
            assert_eq!(
                classify_card_outcome(card, &state),
                classify_card_outcome(card, &state)
            );
        }
        assert_eq!(classify_card_outcome(&cards[0], &state), Outcome::Missed);
        assert_eq!(classify_card_outcome(&cards[1], &state), Outcome::Unattempted);
    }

    #[test]
    fn card_outcomes_follow_deck_order() {
        let cards = deck(&["a", "b"]);
        let mut state = init_session(&cards, MaxCycles::new(1).unwrap());
        state = answer_current(&state, false);
        state = answer_current(&state, true);

        let outcomes: Vec<_> = card_outcomes(&cards, &state)
            .into_iter()
            .map(|(card, outcome)| (card.id().as_str(), outcome.as_str()))
            .collect();
        assert_eq!(outcomes, [("a", "missed"), ("b", "correct-first-time")]);
    }
}

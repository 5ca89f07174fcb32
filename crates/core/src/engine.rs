//! Session engine: the state machine behind a multi-cycle study session.
//!
//! A session walks the whole deck once (cycle 1), then keeps re-queueing the
//! cards still answered wrong until none are left or the cycle ceiling is hit.
//!
//! Every function here is pure. Callers thread the returned [`SessionState`]
//! into the next call:
//!
//! 1. [`init_session`]
//! 2. [`apply_answer`] for the card at the current index
//! 3. [`should_advance_cycle`]; on `should_advance`, [`start_next_cycle`];
//!    on `should_end`, hand the state to [`crate::scoring`].
//!
//! Calls outside that sequence (answering past the end of a cycle, passing a
//! uid other than the current card's) are caller contract violations and are
//! not checked here.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::{Card, CardUid, MaxCycles, SessionState};

/// What the caller should do after an answer.
///
/// At most one flag is set; both clear means "keep showing cards".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleDecision {
    pub should_advance: bool,
    pub should_end: bool,
}

impl CycleDecision {
    pub const CONTINUE: Self = Self {
        should_advance: false,
        should_end: false,
    };
    pub const ADVANCE: Self = Self {
        should_advance: true,
        should_end: false,
    };
    pub const END: Self = Self {
        should_advance: false,
        should_end: true,
    };
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    /// Every card still tracked was answered correctly.
    AllCorrect,
    /// The last allowed cycle finished with cards still outstanding.
    CeilingReached,
}

/// Builds the queue for a cycle.
///
/// Cycle 1 gets every card in the order given. Later cycles get the cards whose
/// uid is in `incorrect_ids`, in the relative order of `all_cards`. An empty
/// result is valid and reads as an already exhausted cycle.
#[must_use]
pub fn build_cycle_queue(
    all_cards: &[Card],
    incorrect_ids: &BTreeSet<CardUid>,
    cycle_number: u32,
) -> Vec<Card> {
    if cycle_number <= 1 {
        return all_cards.to_vec();
    }

    all_cards
        .iter()
        .filter(|card| incorrect_ids.contains(card.uid()))
        .cloned()
        .collect()
}

/// Starts a session over the deck's cards in their given order.
///
/// Callers should refuse empty decks before getting here; an empty deck yields
/// a session whose first cycle is already exhausted.
#[must_use]
pub fn init_session(all_cards: &[Card], max_cycles: MaxCycles) -> SessionState {
    init_session_with_queue(
        build_cycle_queue(all_cards, &BTreeSet::new(), 1),
        max_cycles,
    )
}

/// Starts a session whose first cycle uses an already ordered queue.
///
/// This is how a shuffled first pass is built. Retry cycles still follow the
/// card list passed to [`start_next_cycle`].
#[must_use]
pub fn init_session_with_queue(first_cycle: Vec<Card>, max_cycles: MaxCycles) -> SessionState {
    SessionState {
        cycle: 1,
        max_cycles: max_cycles.get(),
        cycle_queue: first_cycle,
        current_card_index: 0,
        incorrect_card_ids: BTreeSet::new(),
        cycle1_answers: BTreeMap::new(),
    }
}

/// Records a judgment for the card at the current position and moves past it.
///
/// A correct answer clears the card from the outstanding set, an incorrect one
/// adds it. During cycle 1 the first judgment per card is also kept for
/// scoring; an existing entry is never overwritten.
#[must_use]
pub fn apply_answer(state: &SessionState, card_uid: &CardUid, was_correct: bool) -> SessionState {
    let mut next = state.clone();

    if was_correct {
        next.incorrect_card_ids.remove(card_uid);
    } else {
        next.incorrect_card_ids.insert(card_uid.clone());
    }

    if next.cycle == 1 {
        next.cycle1_answers
            .entry(card_uid.clone())
            .or_insert(was_correct);
    }

    next.current_card_index += 1;
    next
}

/// Evaluates the cycle state machine.
///
/// - cycle not exhausted: continue;
/// - exhausted and nothing outstanding: end (early termination);
/// - exhausted on the last allowed cycle: end (ceiling);
/// - otherwise: advance to the next cycle.
#[must_use]
pub fn should_advance_cycle(state: &SessionState) -> CycleDecision {
    if !state.is_cycle_exhausted() {
        return CycleDecision::CONTINUE;
    }
    if state.incorrect_card_ids.is_empty() || state.cycle >= state.max_cycles {
        return CycleDecision::END;
    }
    CycleDecision::ADVANCE
}

/// Reports why the session ends, or `None` while it should go on.
#[must_use]
pub fn end_reason(state: &SessionState) -> Option<EndReason> {
    if !should_advance_cycle(state).should_end {
        return None;
    }
    if state.incorrect_card_ids.is_empty() {
        Some(EndReason::AllCorrect)
    } else {
        Some(EndReason::CeilingReached)
    }
}

/// Moves to the next cycle, queueing the outstanding cards in deck order.
///
/// Only valid after [`should_advance_cycle`] returned `should_advance`.
/// `all_cards` must be the deck in its original order.
#[must_use]
pub fn start_next_cycle(state: &SessionState, all_cards: &[Card]) -> SessionState {
    let cycle = state.cycle + 1;
    SessionState {
        cycle,
        max_cycles: state.max_cycles,
        cycle_queue: build_cycle_queue(all_cards, &state.incorrect_card_ids, cycle),
        current_card_index: 0,
        incorrect_card_ids: state.incorrect_card_ids.clone(),
        cycle1_answers: state.cycle1_answers.clone(),
    }
}

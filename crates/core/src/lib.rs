#![forbid(unsafe_code)]

//! Domain model and the pure study-session engine.
//!
//! - [`model`]: cards, decks, session configuration and state.
//! - [`engine`]: state transitions of a multi-cycle study session.
//! - [`scoring`]: scores and per-card outcomes derived from a session state.

pub mod engine;
pub mod model;
pub mod scoring;

pub use engine::{CycleDecision, EndReason};
pub use scoring::{Breakdown, Outcome, Score, Scores};

mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::first_cycle_queue;
pub use progress::SessionProgress;
pub use service::{AnswerResult, StudySession};
pub use view::{CardResult, SessionReport};
pub use workflow::SessionLoopService;

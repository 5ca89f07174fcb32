#![forbid(unsafe_code)]

pub mod deck_service;
pub mod error;
pub mod sessions;

pub use sessions as session;

pub use deck_service::DeckService;
pub use error::{DeckServiceError, SessionError};

pub use sessions::{
    AnswerResult, CardResult, SessionLoopService, SessionProgress, SessionReport, StudySession,
};

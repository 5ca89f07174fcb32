mod card;
mod deck;
mod ids;
mod session;

pub use ids::{CardId, CardUid, DeckId, ParseIdError};

pub use card::{Card, CardError, CardSide};
pub use deck::{Deck, DeckError, DeckSummary};
pub use session::{CardOrder, MaxCycles, SessionConfig, SessionConfigError, SessionState};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a deck (the slug its file or row is stored under)
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeckId(String);

impl DeckId {
    /// Creates a new `DeckId`
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the value is empty or contains separator characters.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
        let id = id.into();
        if is_slug(&id) {
            Ok(Self(id))
        } else {
            Err(ParseIdError::new("DeckId"))
        }
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Deck-local identifier of a card
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId(String);

impl CardId {
    /// Creates a new `CardId`
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the value is empty or contains separator characters.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
        let id = id.into();
        if is_slug(&id) {
            Ok(Self(id))
        } else {
            Err(ParseIdError::new("CardId"))
        }
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Globally unique card identifier, the key for all per-card session tracking
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardUid(String);

impl CardUid {
    /// Creates a new `CardUid`
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the value is empty or has surrounding whitespace.
    pub fn new(uid: impl Into<String>) -> Result<Self, ParseIdError> {
        let uid = uid.into();
        if uid.is_empty() || uid.trim() != uid {
            return Err(ParseIdError::new("CardUid"));
        }
        Ok(Self(uid))
    }

    /// Builds the default uid of a card: `<deck>:<card>`.
    ///
    /// Neither slug may contain `:`, so derived uids never collide across decks.
    #[must_use]
    pub fn derive(deck_id: &DeckId, card_id: &CardId) -> Self {
        Self(format!("{}:{}", deck_id.0, card_id.0))
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ':' | '/' | '\\'))
}

impl fmt::Debug for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeckId({})", self.0)
    }
}

impl fmt::Debug for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardId({})", self.0)
    }
}

impl fmt::Debug for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardUid({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── FromStr / String conversions ──────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl ParseIdError {
    fn new(kind: &'static str) -> Self {
        Self { kind }
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for DeckId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for CardId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for CardUid {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DeckId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for CardId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for CardUid {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeckId> for String {
    fn from(value: DeckId) -> Self {
        value.0
    }
}

impl From<CardId> for String {
    fn from(value: CardId) -> Self {
        value.0
    }
}

impl From<CardUid> for String {
    fn from(value: CardUid) -> Self {
        value.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_id_display() {
        let id: DeckId = "spanish-basics".parse().unwrap();
        assert_eq!(id.to_string(), "spanish-basics");
    }

    #[test]
    fn deck_id_rejects_separators_and_whitespace() {
        assert!("".parse::<DeckId>().is_err());
        assert!("two words".parse::<DeckId>().is_err());
        assert!("a:b".parse::<DeckId>().is_err());
        assert!("../escape".parse::<DeckId>().is_err());
    }

    #[test]
    fn card_id_from_str() {
        let id: CardId = "c1".parse().unwrap();
        assert_eq!(id.as_str(), "c1");
    }

    #[test]
    fn card_uid_derives_from_deck_and_card() {
        let deck = DeckId::new("verbs").unwrap();
        let card = CardId::new("7").unwrap();
        assert_eq!(CardUid::derive(&deck, &card).as_str(), "verbs:7");
    }

    #[test]
    fn card_uid_rejects_padding() {
        assert!(CardUid::new(" x").is_err());
        assert!(CardUid::new("").is_err());
        assert!(CardUid::new("deck:card").is_ok());
    }

    #[test]
    fn parse_error_names_the_kind() {
        let err = "".parse::<CardId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse CardId from string");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Opaque identifier of a card on the board (e.g. a request number)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct CardId(String);

impl CardId {
    // Characters that would break the status endpoint path
    const RESERVED: [char; 3] = ['/', '?', '#'];

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CardId {
    type Err = crate::error::BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = s.is_empty()
            || s.chars()
                .any(|c| c.is_whitespace() || Self::RESERVED.contains(&c));

        if invalid {
            Err(crate::error::BoardError::InvalidCardId(s.to_string()))
        } else {
            Ok(Self(s.to_string()))
        }
    }
}

impl TryFrom<String> for CardId {
    type Error = crate::error::BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<u64> for CardId {
    fn from(number: u64) -> Self {
        Self(number.to_string())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a board column, which is also the status label of
/// every card it holds
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(String);

impl StatusId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatusId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A movable unit of work on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub status: StatusId,
    /// Rendering content, never inspected by the board logic
    #[serde(default)]
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Creates a card without rendering content
    pub fn new(id: CardId, status: StatusId) -> Self {
        Self {
            id,
            status,
            content: Value::Null,
            moved_at: None,
        }
    }

    /// Attaches rendering content
    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    /// Records a confirmed status change. Only the board calls this, as
    /// part of moving the card between columns.
    pub(crate) fn set_status(&mut self, status: StatusId) {
        self.status = status;
        self.moved_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_parsing() {
        let id = CardId::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");

        let id = CardId::from_str("REQ-7").unwrap();
        assert_eq!(id.as_str(), "REQ-7");

        assert!(CardId::from_str("").is_err());
        assert!(CardId::from_str("a b").is_err());
        assert!(CardId::from_str("1/2").is_err());
        assert!(CardId::from_str("1?x=2").is_err());
        assert!(CardId::from_str("1#top").is_err());
    }

    #[test]
    fn test_card_id_from_number() {
        assert_eq!(CardId::from(17).as_str(), "17");
        assert_eq!(CardId::from(17), CardId::from_str("17").unwrap());
    }

    #[test]
    fn test_status_id_display() {
        let status = StatusId::from("In Progress");
        assert_eq!(status.to_string(), "In Progress");
        assert_eq!(status.as_str(), "In Progress");
    }

    #[test]
    fn test_set_status_records_move_time() {
        let mut card = Card::new(CardId::from(1), StatusId::from("New"));
        assert!(card.moved_at.is_none());

        card.set_status(StatusId::from("Repaired"));

        assert_eq!(card.status, StatusId::from("Repaired"));
        assert!(card.moved_at.is_some());
    }

    #[test]
    fn test_card_deserialization_defaults() {
        let json = r#"{ "id": "3", "status": "Scrap" }"#;
        let card: Card = serde_json::from_str(json).unwrap();

        assert_eq!(card.id.as_str(), "3");
        assert_eq!(card.status.as_str(), "Scrap");
        assert!(card.content.is_null());
        assert!(card.moved_at.is_none());
    }

    #[test]
    fn test_card_deserialization_rejects_bad_id() {
        let json = r#"{ "id": "a/b", "status": "New" }"#;
        assert!(serde_json::from_str::<Card>(json).is_err());
    }

    #[test]
    fn test_card_serialization_skips_unmoved_timestamp() {
        let card = Card::new(CardId::from(1), StatusId::from("New"))
            .with_content(serde_json::json!({ "subject": "Leaking pump" }));
        let json = serde_json::to_string(&card).unwrap();

        assert!(!json.contains("moved_at"));
        assert!(json.contains("Leaking pump"));
    }
}

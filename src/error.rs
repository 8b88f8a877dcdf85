use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Duplicate card on board: {0}")]
    DuplicateCard(String),

    #[error("Duplicate column on board: {0}")]
    DuplicateColumn(String),

    #[error("Card {card} has status {status} but sits in column {column}")]
    StatusMismatch {
        card: String,
        status: String,
        column: String,
    },

    #[error("Card {0} is not placed in exactly one column")]
    MisplacedCard(String),

    #[error("Invalid card ID format: {0}")]
    InvalidCardId(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

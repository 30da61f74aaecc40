//! Error types for the domain layer.

/// Domain-level errors (malformed values that must never reach the wire).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Amount {minor} does not fit the 12-digit wire format")]
    AmountOutOfRange { minor: i64 },

    #[error("Unsupported decimal places: {0}")]
    UnsupportedDecimalPlaces(u8),

    #[error("Invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid flag {0:?}: expected Y or N")]
    InvalidFlag(String),
}

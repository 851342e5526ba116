//! Parse errors shared by the string-encoded types.

use thiserror::Error;

/// Failure to decode a base58 value (account reference, blockhash, signature).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("value is empty")]
    Empty,

    #[error("encoded value too long: {0} characters")]
    TooLong(usize),

    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("decoded to {actual} bytes, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
}

/// Failure to parse a decimal SOL amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative")]
    Negative,

    #[error("invalid amount: {0}")]
    Invalid(String),

    #[error("amount exceeds the maximum lamport value")]
    Overflow,
}

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("unexpected end of input while reading {0}")]
    Truncated(&'static str),

    #[error("invalid compact-u16 length encoding")]
    InvalidLength,

    #[error("{0} trailing bytes after transaction")]
    TrailingBytes(usize),

    #[error("versioned messages are not supported")]
    UnsupportedVersion,

    #[error("account index {index} out of range ({len} keys)")]
    AccountIndexOutOfRange { index: u8, len: usize },

    #[error("malformed header: {0}")]
    InvalidHeader(String),

    #[error("signer {0} is not a required signer of this message")]
    KeypairNotSigner(String),

    #[error("too many accounts or instructions: {0}")]
    TooLarge(String),

    #[error("invalid base64: {0}")]
    Base64(String),
}

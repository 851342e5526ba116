use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeypairError {
    #[error("keypair must be {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("public half does not match the secret key")]
    PublicKeyMismatch,

    #[error("invalid keypair file: {0}")]
    Format(String),

    #[error("keypair file already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

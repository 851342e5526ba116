//! Ledger client error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("node returned HTTP {0}")]
    HttpStatus(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A JSON-RPC error object returned by the node, including preflight
    /// simulation failures.
    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },
}

impl LedgerError {
    /// Errors worth retrying by the user: the node was unreachable or overloaded.
    pub fn is_transient(&self) -> bool {
        match self {
            LedgerError::Transport(_) => true,
            LedgerError::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => LedgerError::HttpStatus(status.as_u16()),
            None => LedgerError::Transport(e.to_string()),
        }
    }
}

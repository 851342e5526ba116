use solsend_crypto::KeypairError;
use solsend_rpc::LedgerError;
use solsend_transactions::TransactionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet not connected")]
    NotConnected,

    #[error("transaction rejected by wallet: {0}")]
    Rejected(String),

    #[error("transaction too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("signing error: {0}")]
    Signing(#[from] TransactionError),

    #[error("key error: {0}")]
    Key(#[from] KeypairError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

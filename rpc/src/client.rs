//! The ledger seam used by the wallet workflow.

use std::fmt;
use std::future::Future;

use solsend_types::{Blockhash, Commitment, Lamports, Pubkey, Signature, TransferRecord};

use crate::error::LedgerError;

/// Broadcast options forwarded to `sendTransaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Skip the node's simulation of the transaction before broadcast.
    pub skip_preflight: bool,
    /// Commitment the preflight simulation runs against.
    pub preflight_commitment: Commitment,
    /// How many times the node re-broadcasts before giving up. `None` leaves
    /// the node's own default in place.
    pub max_retries: Option<usize>,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            preflight_commitment: Commitment::Confirmed,
            max_retries: Some(5),
        }
    }
}

/// A recent blockhash and the last block height at which a transaction that
/// references it can still land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBlockhash {
    pub blockhash: Blockhash,
    pub last_valid_block_height: u64,
}

/// Where a submitted transaction stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Not yet observed at the requested commitment.
    Pending,
    Confirmed,
    /// Landed, but execution failed on the ledger.
    Failed(String),
    /// The validity height bound passed while still pending.
    Expired,
}

impl ConfirmationOutcome {
    pub fn is_final(&self) -> bool {
        !matches!(self, ConfirmationOutcome::Pending)
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmationOutcome::Confirmed)
    }
}

impl fmt::Display for ConfirmationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmationOutcome::Pending => f.write_str("pending"),
            ConfirmationOutcome::Confirmed => f.write_str("confirmed"),
            ConfirmationOutcome::Failed(reason) => write!(f, "failed: {reason}"),
            ConfirmationOutcome::Expired => f.write_str("block height exceeded"),
        }
    }
}

/// Read and write access to the ledger.
///
/// Futures are `Send` so a workflow generic over the client can run on a
/// multi-threaded runtime.
pub trait LedgerClient: Send + Sync {
    /// Balance of `account` in lamports.
    fn get_balance(
        &self,
        account: &Pubkey,
        commitment: Commitment,
    ) -> impl Future<Output = Result<Lamports, LedgerError>> + Send;

    fn latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> impl Future<Output = Result<LatestBlockhash, LedgerError>> + Send;

    /// Submit a signed, serialized transaction. Returns its signature.
    fn send_transaction(
        &self,
        wire: &[u8],
        options: SendOptions,
    ) -> impl Future<Output = Result<Signature, LedgerError>> + Send;

    /// Wait until `signature` reaches `commitment`, fails, or the validity bound
    /// `last_valid_block_height` of `blockhash` passes.
    fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &Blockhash,
        last_valid_block_height: u64,
        commitment: Commitment,
    ) -> impl Future<Output = Result<ConfirmationOutcome, LedgerError>> + Send;

    /// Up to `limit` recent transfers touching `account`, most recent first.
    fn get_history(
        &self,
        account: &Pubkey,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<TransferRecord>, LedgerError>> + Send;
}

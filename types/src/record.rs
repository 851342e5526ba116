//! Transfer history entries as shown in the recent-activity list.

use serde::{Deserialize, Serialize};

use crate::address::Pubkey;
use crate::amount::Lamports;
use crate::keys::Signature;
use crate::time::Timestamp;

/// Which way value moved relative to the viewed account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "received",
            Self::Outgoing => "sent",
        }
    }
}

/// On-chain execution status of a historical transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Success,
    Failed,
}

/// One row of the transfer history, most recent first when in a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub signature: Signature,
    pub direction: Direction,
    pub amount: Lamports,
    pub counterparty: Pubkey,
    /// Block time, when the ledger reports one.
    pub timestamp: Option<Timestamp>,
    pub status: TransferStatus,
}

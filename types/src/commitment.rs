//! Commitment levels for ledger reads and confirmations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Durability guarantee requested from or reported by the ledger.
///
/// Ordered from weakest to strongest, so `observed >= required` means satisfied.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Seen by the node, may be rolled back.
    Processed,
    /// Voted on by a supermajority.
    #[default]
    Confirmed,
    /// Rooted; will not be rolled back.
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }

    /// Whether an observed level meets this required level.
    pub fn is_satisfied_by(&self, observed: Commitment) -> bool {
        observed >= *self
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            other => Err(format!("unknown commitment level: {other}")),
        }
    }
}

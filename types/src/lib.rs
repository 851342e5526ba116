//! Fundamental types for solsend.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account references, blockhashes, signatures, lamport amounts, commitment levels,
//! clusters, timestamps, and transfer history records.

pub mod address;
pub mod amount;
pub mod commitment;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod record;
pub mod time;

pub use address::Pubkey;
pub use amount::{parse_sol, Lamports, ParsedSol, LAMPORTS_PER_SOL, SOL_DECIMALS};
pub use commitment::Commitment;
pub use error::{AmountError, DecodeError};
pub use hash::Blockhash;
pub use keys::{KeyPair, PrivateKey, Signature};
pub use network::Cluster;
pub use record::{Direction, TransferRecord, TransferStatus};
pub use time::Timestamp;

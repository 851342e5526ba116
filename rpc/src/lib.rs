//! Ledger client for solsend.
//!
//! [`LedgerClient`] is the seam between the wallet workflow and the ledger node.
//! [`RpcClient`] implements it over HTTP JSON-RPC 2.0; tests substitute the
//! in-memory ledger from `solsend-nullables`.

pub mod client;
pub mod error;
pub mod history;
pub mod http;
pub mod wire;

pub use client::{ConfirmationOutcome, LatestBlockhash, LedgerClient, SendOptions};
pub use error::LedgerError;
pub use http::{RpcClient, RpcClientConfig};

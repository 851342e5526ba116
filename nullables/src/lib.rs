//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the wallet workflow (the ledger node, the
//! wallet session, the clock) sits behind a trait. This crate provides
//! test-friendly implementations that:
//! - Return scripted values
//! - Record every call for later assertions
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod ledger;
pub mod wallet;

pub use clock::NullClock;
pub use ledger::{LedgerCall, NullLedger};
pub use wallet::NullWallet;

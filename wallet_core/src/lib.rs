//! Wallet core library for solsend.
//!
//! Provides everything a wallet front end needs:
//! - A wallet session that signs and broadcasts on behalf of the connected account
//! - The transfer workflow: validate, build, sign, broadcast, confirm, refresh
//! - Balance and history refresh against the ledger
//! - A framework-independent dashboard view model

pub mod clock;
pub mod dashboard;
pub mod error;
pub mod refresh;
pub mod session;
pub mod transfer;

pub use clock::{Clock, SystemClock};
pub use dashboard::{Dashboard, SharedDashboard, SubmitStatus, TransferForm};
pub use error::WalletError;
pub use session::{KeypairWallet, WalletSession};
pub use transfer::{
    ErrorKind, SubmissionGate, TransferController, TransferError, TransferReceipt,
    TransferSettings,
};

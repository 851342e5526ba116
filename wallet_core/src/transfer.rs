//! The transfer workflow.
//!
//! One submission runs these steps in order, each awaited before the next:
//!
//! 1. parse the recipient and the decimal amount (local, no network)
//! 2. fetch a recent blockhash and its validity height bound
//! 3. build the transfer envelope with the sender as fee payer
//! 4. have the wallet sign and broadcast it
//! 5. wait for confirmation within the validity bound
//! 6. refresh balance and history (best effort)
//!
//! The in-flight flag and the form are released on every exit path by
//! [`SubmissionGuard`]. Every failure is returned as a [`TransferError`] and
//! recorded on the dashboard as an alert; none is retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use solsend_rpc::{ConfirmationOutcome, LatestBlockhash, LedgerClient, LedgerError, SendOptions};
use solsend_transactions::{Transaction, TransactionError};
use solsend_types::{
    parse_sol, AmountError, Commitment, DecodeError, Lamports, Pubkey, Signature, TransferRecord,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::dashboard::{lock, SharedDashboard, SubmitStatus, DEFAULT_HISTORY_LIMIT};
use crate::error::WalletError;
use crate::refresh;
use crate::session::WalletSession;

// ── Errors ──────────────────────────────────────────────────────────────

/// Coarse classification of a [`TransferError`] for front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input caught before any network call.
    LocalValidation,
    /// The ledger node could not be reached or did not answer in time.
    TransientNetwork,
    /// The wallet or the node's preflight check refused the transaction.
    Rejection,
    /// The transaction landed but did not execute, or never landed in time.
    Execution,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Invalid recipient address")]
    InvalidRecipient(#[source] DecodeError),

    #[error("invalid amount: {0}")]
    InvalidAmount(#[source] AmountError),

    #[error("could not fetch a recent blockhash: {0}")]
    Checkpoint(#[source] LedgerError),

    #[error("could not build transaction: {0}")]
    Envelope(#[source] TransactionError),

    #[error("{0}")]
    Broadcast(#[source] WalletError),

    #[error("{reason}")]
    Execution { signature: Signature, reason: String },

    #[error("could not confirm transaction: {0}")]
    Confirmation(#[source] LedgerError),

    #[error("a transfer is already in flight")]
    Busy,
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::InvalidRecipient(_)
            | TransferError::InvalidAmount(_)
            | TransferError::Envelope(_)
            | TransferError::Busy => ErrorKind::LocalValidation,
            TransferError::Checkpoint(_) | TransferError::Confirmation(_) => {
                ErrorKind::TransientNetwork
            }
            TransferError::Broadcast(WalletError::Ledger(e)) if e.is_transient() => {
                ErrorKind::TransientNetwork
            }
            TransferError::Broadcast(_) => ErrorKind::Rejection,
            TransferError::Execution { .. } => ErrorKind::Execution,
        }
    }

    /// The signature, if the transaction got as far as being broadcast.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            TransferError::Execution { signature, .. } => Some(signature),
            _ => None,
        }
    }

    /// The one-line message shown to the user.
    pub fn alert(&self) -> String {
        match self {
            TransferError::InvalidRecipient(_) => self.to_string(),
            other => format!("Transaction failed: {other}"),
        }
    }
}

// ── Submission gate ─────────────────────────────────────────────────────

/// At most one submission in flight.
#[derive(Debug, Default)]
pub struct SubmissionGate {
    in_flight: AtomicBool,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the gate, or `None` if a submission already holds it.
    fn try_acquire<'a>(&'a self, dashboard: &'a SharedDashboard) -> Option<SubmissionGuard<'a>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        lock(dashboard).set_status(SubmitStatus::Submitting);
        Some(SubmissionGuard {
            gate: self,
            dashboard,
        })
    }
}

/// Releases the gate and clears the form when dropped.
struct SubmissionGuard<'a> {
    gate: &'a SubmissionGate,
    dashboard: &'a SharedDashboard,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        let mut view = lock(self.dashboard);
        view.form_mut().clear();
        if view.is_submitting() {
            view.set_status(SubmitStatus::Idle);
        }
        drop(view);
        self.gate.in_flight.store(false, Ordering::Release);
    }
}

// ── Controller ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSettings {
    /// Commitment for the blockhash fetch, confirmation, and balance reads.
    pub commitment: Commitment,
    pub send_options: SendOptions,
    pub history_limit: usize,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            commitment: Commitment::Confirmed,
            send_options: SendOptions::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// A confirmed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub signature: Signature,
    pub recipient: Pubkey,
    pub amount: Lamports,
    /// The amount text had more than nine fractional digits; the excess was dropped.
    pub truncated: bool,
    /// Balance after the transfer, if the post-transfer refresh succeeded.
    pub balance: Option<Lamports>,
}

/// Runs the transfer workflow against a ledger and a wallet session, and
/// keeps a [`SharedDashboard`] current.
pub struct TransferController<L, W> {
    ledger: L,
    wallet: W,
    dashboard: SharedDashboard,
    settings: TransferSettings,
    gate: Arc<SubmissionGate>,
    clock: Arc<dyn Clock>,
}

impl<L: LedgerClient, W: WalletSession> TransferController<L, W> {
    pub fn new(ledger: L, wallet: W, dashboard: SharedDashboard, settings: TransferSettings) -> Self {
        Self {
            ledger,
            wallet,
            dashboard,
            settings,
            gate: Arc::new(SubmissionGate::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn dashboard(&self) -> &SharedDashboard {
        &self.dashboard
    }

    pub fn settings(&self) -> &TransferSettings {
        &self.settings
    }

    /// The in-flight flag, shareable with observers.
    pub fn gate(&self) -> Arc<SubmissionGate> {
        Arc::clone(&self.gate)
    }

    /// Bring the dashboard in line with the wallet's connected account,
    /// refreshing balance and history when it changed.
    pub async fn sync_account(&self) -> Option<Pubkey> {
        let account = self.wallet.current_account();
        let changed = lock(&self.dashboard).set_account(account);
        if let (true, Some(account)) = (changed, account) {
            info!(%account, "account connected");
            self.refresh_all(&account).await;
        }
        account
    }

    pub async fn refresh_balance(&self, account: &Pubkey) -> Result<Lamports, LedgerError> {
        refresh::refresh_balance(&self.ledger, &self.dashboard, account, self.settings.commitment)
            .await
    }

    pub async fn refresh_history(
        &self,
        account: &Pubkey,
        limit: usize,
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        refresh::refresh_history(&self.ledger, &self.dashboard, account, limit).await
    }

    async fn refresh_all(&self, account: &Pubkey) -> Option<Lamports> {
        refresh::refresh_account(
            &self.ledger,
            &self.dashboard,
            account,
            self.settings.commitment,
            self.settings.history_limit,
        )
        .await
    }

    /// Submit whatever is in the dashboard's form as the wallet's account.
    pub async fn submit_form(&self) -> Option<Result<TransferReceipt, TransferError>> {
        let account = self.wallet.current_account();
        let form = lock(&self.dashboard).form().clone();
        self.submit_transfer(account, &form.recipient, &form.amount)
            .await
    }

    /// Run the transfer workflow.
    ///
    /// Returns `None` without side effects when no account is connected or
    /// either input is empty. Otherwise the outcome is also recorded on the
    /// dashboard, and the form is cleared whatever happened.
    pub async fn submit_transfer(
        &self,
        account: Option<Pubkey>,
        recipient_text: &str,
        amount_text: &str,
    ) -> Option<Result<TransferReceipt, TransferError>> {
        let Some(account) = account else {
            debug!("no wallet connected, ignoring submit");
            return None;
        };
        if recipient_text.is_empty() || amount_text.is_empty() {
            debug!(
                recipient = !recipient_text.is_empty(),
                amount = !amount_text.is_empty(),
                "missing required fields, ignoring submit"
            );
            return None;
        }
        let Some(_guard) = self.gate.try_acquire(&self.dashboard) else {
            warn!("submission already in flight");
            return Some(Err(TransferError::Busy));
        };

        let result = self.execute(account, recipient_text, amount_text).await;

        let status = match &result {
            Ok(receipt) => {
                info!(signature = %receipt.signature, "transfer confirmed");
                SubmitStatus::Succeeded {
                    signature: receipt.signature,
                    at: self.clock.now(),
                }
            }
            Err(e) => {
                error!(kind = ?e.kind(), error = %e, "transfer failed");
                SubmitStatus::Failed { message: e.alert() }
            }
        };
        lock(&self.dashboard).set_status(status);
        Some(result)
    }

    async fn execute(
        &self,
        account: Pubkey,
        recipient_text: &str,
        amount_text: &str,
    ) -> Result<TransferReceipt, TransferError> {
        let recipient: Pubkey = recipient_text.trim().parse().map_err(|e| {
            warn!(recipient = recipient_text, error = %e, "invalid recipient address");
            TransferError::InvalidRecipient(e)
        })?;
        let parsed = parse_sol(amount_text).map_err(TransferError::InvalidAmount)?;
        if parsed.dropped_digits {
            warn!(
                amount = amount_text,
                lamports = parsed.lamports.get(),
                "amount has sub-lamport digits, truncating"
            );
        }

        let LatestBlockhash {
            blockhash,
            last_valid_block_height,
        } = self
            .ledger
            .latest_blockhash(self.settings.commitment)
            .await
            .map_err(TransferError::Checkpoint)?;

        let tx = Transaction::new_transfer(&account, &recipient, parsed.lamports, blockhash)
            .map_err(TransferError::Envelope)?;
        info!(
            from = %account,
            to = %recipient,
            lamports = parsed.lamports.get(),
            %blockhash,
            "transaction created"
        );

        let signature = self
            .wallet
            .sign_and_send(tx, &self.ledger, self.settings.send_options)
            .await
            .map_err(TransferError::Broadcast)?;
        info!(%signature, "transaction sent");

        let outcome = self
            .ledger
            .confirm_transaction(
                &signature,
                &blockhash,
                last_valid_block_height,
                self.settings.commitment,
            )
            .await
            .map_err(TransferError::Confirmation)?;
        match outcome {
            ConfirmationOutcome::Confirmed => {}
            ConfirmationOutcome::Failed(reason) => {
                return Err(TransferError::Execution { signature, reason })
            }
            unresolved @ (ConfirmationOutcome::Expired | ConfirmationOutcome::Pending) => {
                return Err(TransferError::Execution {
                    signature,
                    reason: unresolved.to_string(),
                })
            }
        }

        let balance = self.refresh_all(&account).await;
        Ok(TransferReceipt {
            signature,
            recipient,
            amount: parsed.lamports,
            truncated: parsed.dropped_digits,
            balance,
        })
    }
}

//! Dashboard view model.
//!
//! Everything a front end renders: the connected account, its balance, the
//! recent transfers, the transfer form, and the status of the last submission.
//! It holds plain data only; the workflow and refresh functions write to it
//! and the binding layer reads from it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use solsend_types::{Cluster, Lamports, Pubkey, Signature, Timestamp, TransferRecord};

/// How long the success banner stays up after a confirmed transfer.
pub const SUCCESS_BANNER_SECS: u64 = 5;

/// Default number of history rows shown.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Dashboard state shared between the workflow and the binding layer. The lock
/// is never held across an `.await`.
pub type SharedDashboard = Arc<Mutex<Dashboard>>;

/// Lock a shared dashboard, recovering from a poisoned lock.
pub fn lock(dashboard: &SharedDashboard) -> MutexGuard<'_, Dashboard> {
    dashboard.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transfer inputs as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub recipient: String,
    pub amount: String,
}

impl TransferForm {
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recipient.is_empty() && self.amount.is_empty()
    }

    pub fn clear(&mut self) {
        self.recipient.clear();
        self.amount.clear();
    }
}

/// Where the last submission stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        signature: Signature,
        at: Timestamp,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    cluster: Cluster,
    account: Option<Pubkey>,
    balance: Lamports,
    history: Vec<TransferRecord>,
    history_limit: usize,
    form: TransferForm,
    status: SubmitStatus,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Cluster::default())
    }
}

impl Dashboard {
    pub fn new(cluster: Cluster) -> Self {
        Self {
            cluster,
            account: None,
            balance: Lamports::ZERO,
            history: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            form: TransferForm::default(),
            status: SubmitStatus::Idle,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Wrap in the shared handle used by the controller.
    pub fn shared(self) -> SharedDashboard {
        Arc::new(Mutex::new(self))
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    pub fn account(&self) -> Option<Pubkey> {
        self.account
    }

    /// Full base58 account string, the payload of a "copy address" action.
    pub fn account_display(&self) -> Option<String> {
        self.account.map(|a| a.to_string())
    }

    pub fn account_explorer_url(&self) -> Option<String> {
        self.account
            .map(|a| self.cluster.explorer_address_url(&a))
    }

    /// Switch accounts. Balance and history belong to the old account, so they
    /// are reset when it changes. Returns whether it changed.
    pub fn set_account(&mut self, account: Option<Pubkey>) -> bool {
        if self.account == account {
            return false;
        }
        self.account = account;
        self.balance = Lamports::ZERO;
        self.history.clear();
        true
    }

    pub fn balance(&self) -> Lamports {
        self.balance
    }

    /// Balance as shown to the user, e.g. `2 SOL`.
    pub fn balance_display(&self) -> String {
        self.balance.to_string()
    }

    pub fn set_balance(&mut self, balance: Lamports) {
        self.balance = balance;
    }

    pub fn history(&self) -> &[TransferRecord] {
        &self.history
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn set_history(&mut self, mut records: Vec<TransferRecord>) {
        records.truncate(self.history_limit);
        self.history = records;
    }

    /// Block explorer link for a history row.
    pub fn explorer_link(&self, record: &TransferRecord) -> String {
        self.cluster.explorer_tx_url(&record.signature)
    }

    pub fn form(&self) -> &TransferForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TransferForm {
        &mut self.form
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    pub fn set_status(&mut self, status: SubmitStatus) {
        self.status = status;
    }

    /// True while a submission is in flight; front ends disable the send button.
    pub fn is_submitting(&self) -> bool {
        matches!(self.status, SubmitStatus::Submitting)
    }

    /// The success notification, while it is still within its display window.
    pub fn success_banner(&self, now: Timestamp) -> Option<String> {
        match &self.status {
            SubmitStatus::Succeeded { signature, at }
                if !at.has_expired(SUCCESS_BANNER_SECS, now) =>
            {
                Some(format!("Transaction successful! Signature: {signature}"))
            }
            _ => None,
        }
    }

    /// The error alert for the last failed submission.
    pub fn error_alert(&self) -> Option<&str> {
        match &self.status {
            SubmitStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Acknowledge a finished submission, returning to idle.
    pub fn dismiss(&mut self) {
        if !self.is_submitting() {
            self.status = SubmitStatus::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solsend_types::{Direction, TransferStatus};

    fn record(n: u8) -> TransferRecord {
        TransferRecord {
            signature: Signature::new([n; 64]),
            direction: Direction::Incoming,
            amount: Lamports::new(u64::from(n)),
            counterparty: Pubkey::new([n; 32]),
            timestamp: None,
            status: TransferStatus::Success,
        }
    }

    #[test]
    fn balance_renders_in_sol() {
        let mut d = Dashboard::default();
        d.set_balance(Lamports::new(2_000_000_000));
        assert_eq!(d.balance_display(), "2 SOL");
        d.set_balance(Lamports::new(1_500_000_000));
        assert_eq!(d.balance_display(), "1.5 SOL");
    }

    #[test]
    fn history_capped_at_limit() {
        let mut d = Dashboard::default();
        d.set_history((1..=8).map(record).collect());
        assert_eq!(d.history().len(), 5);
        assert_eq!(d.history()[0], record(1));
    }

    #[test]
    fn explorer_link_targets_cluster() {
        let d = Dashboard::new(Cluster::Devnet);
        let link = d.explorer_link(&record(1));
        assert!(link.starts_with("https://explorer.solana.com/tx/"));
        assert!(link.ends_with("?cluster=devnet"));
    }

    #[test]
    fn account_change_resets_balance_and_history() {
        let mut d = Dashboard::default();
        assert!(d.set_account(Some(Pubkey::new([1; 32]))));
        d.set_balance(Lamports::new(5));
        d.set_history(vec![record(1)]);

        assert!(!d.set_account(Some(Pubkey::new([1; 32]))));
        assert_eq!(d.balance(), Lamports::new(5));

        assert!(d.set_account(Some(Pubkey::new([2; 32]))));
        assert_eq!(d.balance(), Lamports::ZERO);
        assert!(d.history().is_empty());
    }

    #[test]
    fn banner_visible_for_five_seconds() {
        let mut d = Dashboard::default();
        let sig = Signature::new([7; 64]);
        d.set_status(SubmitStatus::Succeeded {
            signature: sig,
            at: Timestamp::new(1_000),
        });
        let banner = d.success_banner(Timestamp::new(1_004)).unwrap();
        assert_eq!(banner, format!("Transaction successful! Signature: {sig}"));
        assert!(d.success_banner(Timestamp::new(1_005)).is_none());
        assert!(d.error_alert().is_none());
    }

    #[test]
    fn alert_only_for_failure() {
        let mut d = Dashboard::default();
        assert!(d.error_alert().is_none());
        d.set_status(SubmitStatus::Failed {
            message: "Transaction failed: InsufficientFunds".into(),
        });
        assert_eq!(d.error_alert(), Some("Transaction failed: InsufficientFunds"));
        assert!(d.success_banner(Timestamp::new(0)).is_none());
        d.dismiss();
        assert_eq!(d.status(), &SubmitStatus::Idle);
    }
}

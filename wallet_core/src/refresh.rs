//! Balance and history refresh.
//!
//! Both are idempotent reads. On success the dashboard is updated, provided it
//! still shows the same account; on failure it keeps the stale value and the
//! error is logged and returned.

use solsend_rpc::{LedgerClient, LedgerError};
use solsend_types::{Commitment, Lamports, Pubkey, TransferRecord};
use tracing::{debug, warn};

use crate::dashboard::{lock, SharedDashboard};

pub async fn refresh_balance<L: LedgerClient>(
    ledger: &L,
    dashboard: &SharedDashboard,
    account: &Pubkey,
    commitment: Commitment,
) -> Result<Lamports, LedgerError> {
    let balance = ledger
        .get_balance(account, commitment)
        .await
        .inspect_err(|e| warn!(%account, error = %e, "balance refresh failed"))?;

    let mut view = lock(dashboard);
    if view.account() == Some(*account) {
        view.set_balance(balance);
    }
    debug!(%account, %balance, "balance refreshed");
    Ok(balance)
}

pub async fn refresh_history<L: LedgerClient>(
    ledger: &L,
    dashboard: &SharedDashboard,
    account: &Pubkey,
    limit: usize,
) -> Result<Vec<TransferRecord>, LedgerError> {
    let records = ledger
        .get_history(account, limit)
        .await
        .inspect_err(|e| warn!(%account, error = %e, "history refresh failed"))?;

    let mut view = lock(dashboard);
    if view.account() == Some(*account) {
        view.set_history(records.clone());
    }
    debug!(%account, count = records.len(), "history refreshed");
    Ok(records)
}

/// Refresh both, ignoring failures beyond logging them. Returns the new
/// balance if that read succeeded.
pub async fn refresh_account<L: LedgerClient>(
    ledger: &L,
    dashboard: &SharedDashboard,
    account: &Pubkey,
    commitment: Commitment,
    history_limit: usize,
) -> Option<Lamports> {
    let balance = refresh_balance(ledger, dashboard, account, commitment)
        .await
        .ok();
    // Failure is already logged; the dashboard keeps the stale list.
    refresh_history(ledger, dashboard, account, history_limit)
        .await
        .ok();
    balance
}

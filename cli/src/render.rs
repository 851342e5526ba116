//! Plain-text rendering of the dashboard.

use solsend_types::{Direction, Timestamp, TransferRecord, TransferStatus};
use solsend_utils::{format_age, short_address};
use solsend_wallet_core::{Dashboard, SubmitStatus};

pub fn account_summary(view: &Dashboard) -> String {
    match (view.account_display(), view.account_explorer_url()) {
        (Some(account), Some(url)) => format!(
            "Account: {account}\nBalance: {}\nExplorer: {url}\n",
            view.balance_display()
        ),
        _ => "No wallet connected\n".to_string(),
    }
}

fn history_row(view: &Dashboard, record: &TransferRecord, now: Timestamp) -> String {
    let preposition = match record.direction {
        Direction::Outgoing => "to",
        Direction::Incoming => "from",
    };
    let status = match record.status {
        TransferStatus::Success => "ok",
        TransferStatus::Failed => "failed",
    };
    let when = match record.timestamp {
        Some(at) => format_age(at.elapsed_since(now)),
        None => "time unknown".to_string(),
    };
    format!(
        "{:<8} {:>16} {:<4} {}  {}  [{}]\n         {}\n",
        record.direction.as_str(),
        record.amount.to_string(),
        preposition,
        short_address(&record.counterparty),
        when,
        status,
        view.explorer_link(record),
    )
}

pub fn history(view: &Dashboard, now: Timestamp) -> String {
    if view.history().is_empty() {
        return "No recent transfers\n".to_string();
    }
    let mut out = String::from("Recent transfers:\n");
    for record in view.history() {
        out.push_str(&history_row(view, record, now));
    }
    out
}

/// The banner or alert left by the last submission, if any.
pub fn submission(view: &Dashboard, now: Timestamp) -> Option<String> {
    if let Some(banner) = view.success_banner(now) {
        let mut out = format!("{banner}\n");
        if let SubmitStatus::Succeeded { signature, .. } = view.status() {
            out.push_str(&format!("{}\n", view.cluster().explorer_tx_url(signature)));
        }
        return Some(out);
    }
    view.error_alert().map(|alert| format!("{alert}\n"))
}

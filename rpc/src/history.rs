//! Turning raw ledger transactions into transfer history records.

use solsend_types::{Direction, Lamports, Pubkey, Timestamp, TransferRecord, TransferStatus};

use crate::wire::{ConfirmedTransaction, SignatureInfo};

/// Decide whether a transaction moved funds out of or into `account`, and who
/// the other party was.
///
/// The ledger orders a transfer's account keys with the fee payer (the sender)
/// first and the recipient second, so the viewed account at index 0 means an
/// outgoing transfer to key 1; anywhere else means an incoming transfer from
/// key 0.
pub fn infer_direction(account: &Pubkey, account_keys: &[Pubkey]) -> Option<(Direction, Pubkey)> {
    let payer = account_keys.first()?;
    if payer == account {
        account_keys
            .get(1)
            .map(|to| (Direction::Outgoing, *to))
    } else {
        Some((Direction::Incoming, *payer))
    }
}

/// Build a history record for `account` from a signature listing entry and the
/// fetched transaction. Returns `None` when the transaction lacks balance
/// metadata or does not list `account` among its static keys.
pub fn transfer_record(
    account: &Pubkey,
    info: &SignatureInfo,
    tx: &ConfirmedTransaction,
) -> Option<TransferRecord> {
    let meta = tx.meta.as_ref()?;
    let keys = &tx.transaction.message.account_keys;
    let (direction, counterparty) = infer_direction(account, keys)?;

    let index = keys.iter().position(|k| k == account)?;
    let pre = *meta.pre_balances.get(index)?;
    let post = *meta.post_balances.get(index)?;
    let moved = pre.abs_diff(post);
    let amount = match direction {
        Direction::Outgoing => moved.saturating_sub(meta.fee),
        Direction::Incoming => moved,
    };

    let failed = meta.err.is_some() || info.err.is_some();
    Some(TransferRecord {
        signature: info.signature,
        direction,
        amount: Lamports::new(amount),
        counterparty,
        timestamp: info.block_time.or(tx.block_time).map(Timestamp::new),
        status: if failed {
            TransferStatus::Failed
        } else {
            TransferStatus::Success
        },
    })
}

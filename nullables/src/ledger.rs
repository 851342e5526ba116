//! Nullable ledger: a scripted, in-memory ledger node.
//!
//! Every call is recorded, in order, before it is answered. Answers come from
//! scripted state: balances per account, the blockhash to hand out, the
//! signature and confirmation outcome for broadcasts, and history per account.
//! A confirmed transfer is applied to the in-memory balances and history so a
//! later refresh observes it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use solsend_rpc::{ConfirmationOutcome, LatestBlockhash, LedgerClient, LedgerError, SendOptions};
use solsend_transactions::{SystemTransfer, Transaction};
use solsend_types::{
    Blockhash, Commitment, Direction, Lamports, Pubkey, Signature, TransferRecord, TransferStatus,
};

/// Fee charged per confirmed transaction.
pub const DEFAULT_FEE: Lamports = Lamports::new(5_000);

/// One recorded ledger call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    GetBalance {
        account: Pubkey,
        commitment: Commitment,
    },
    LatestBlockhash {
        commitment: Commitment,
    },
    SendTransaction {
        wire: Vec<u8>,
        options: SendOptions,
    },
    ConfirmTransaction {
        signature: Signature,
        blockhash: Blockhash,
        last_valid_block_height: u64,
        commitment: Commitment,
    },
    GetHistory {
        account: Pubkey,
        limit: usize,
    },
}

impl LedgerCall {
    /// The JSON-RPC method this call stands for.
    pub fn method(&self) -> &'static str {
        match self {
            LedgerCall::GetBalance { .. } => "getBalance",
            LedgerCall::LatestBlockhash { .. } => "getLatestBlockhash",
            LedgerCall::SendTransaction { .. } => "sendTransaction",
            LedgerCall::ConfirmTransaction { .. } => "confirmTransaction",
            LedgerCall::GetHistory { .. } => "getHistory",
        }
    }
}

type Hook = Arc<dyn Fn(&LedgerCall) + Send + Sync>;

struct State {
    balances: HashMap<Pubkey, Lamports>,
    balance_error: Option<LedgerError>,
    latest: LatestBlockhash,
    blockhash_error: Option<LedgerError>,
    send_signature: Option<Signature>,
    send_error: Option<LedgerError>,
    confirmation: Result<ConfirmationOutcome, LedgerError>,
    history: HashMap<Pubkey, Vec<TransferRecord>>,
    history_error: Option<LedgerError>,
    pending: HashMap<Signature, SystemTransfer>,
    fee: Lamports,
}

/// A test ledger that answers from scripted state and records every call.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullLedger {
    state: Mutex<State>,
    calls: Mutex<Vec<LedgerCall>>,
    hook: Mutex<Option<Hook>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                balances: HashMap::new(),
                balance_error: None,
                latest: LatestBlockhash {
                    blockhash: Blockhash::new([1; 32]),
                    last_valid_block_height: 300,
                },
                blockhash_error: None,
                send_signature: None,
                send_error: None,
                confirmation: Ok(ConfirmationOutcome::Confirmed),
                history: HashMap::new(),
                history_error: None,
                pending: HashMap::new(),
                fee: DEFAULT_FEE,
            }),
            calls: Mutex::new(Vec::new()),
            hook: Mutex::new(None),
        }
    }

    /// Builder form of [`NullLedger::set_balance`].
    pub fn with_balance(self, account: Pubkey, balance: Lamports) -> Self {
        self.set_balance(account, balance);
        self
    }

    pub fn set_balance(&self, account: Pubkey, balance: Lamports) {
        self.state.lock().unwrap().balances.insert(account, balance);
    }

    pub fn fail_balance(&self, err: LedgerError) {
        self.state.lock().unwrap().balance_error = Some(err);
    }

    pub fn set_latest_blockhash(&self, latest: LatestBlockhash) {
        self.state.lock().unwrap().latest = latest;
    }

    pub fn fail_latest_blockhash(&self, err: LedgerError) {
        self.state.lock().unwrap().blockhash_error = Some(err);
    }

    /// Answer broadcasts with `signature` instead of the transaction's own.
    pub fn respond_with_signature(&self, signature: Signature) {
        self.state.lock().unwrap().send_signature = Some(signature);
    }

    pub fn fail_send(&self, err: LedgerError) {
        self.state.lock().unwrap().send_error = Some(err);
    }

    pub fn set_confirmation(&self, outcome: ConfirmationOutcome) {
        self.state.lock().unwrap().confirmation = Ok(outcome);
    }

    pub fn fail_confirmation(&self, err: LedgerError) {
        self.state.lock().unwrap().confirmation = Err(err);
    }

    pub fn set_history(&self, account: Pubkey, records: Vec<TransferRecord>) {
        self.state.lock().unwrap().history.insert(account, records);
    }

    pub fn fail_history(&self, err: LedgerError) {
        self.state.lock().unwrap().history_error = Some(err);
    }

    pub fn set_fee(&self, fee: Lamports) {
        self.state.lock().unwrap().fee = fee;
    }

    /// Run `hook` on every call, after it is recorded and before it is answered.
    pub fn on_call(&self, hook: impl Fn(&LedgerCall) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Arc::new(hook));
    }

    /// All calls so far (for assertions).
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(LedgerCall::method).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Transactions broadcast so far, decoded from their wire bytes.
    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                LedgerCall::SendTransaction { wire, .. } => Transaction::deserialize(wire).ok(),
                _ => None,
            })
            .collect()
    }

    pub fn balance_of(&self, account: &Pubkey) -> Lamports {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(account)
            .copied()
            .unwrap_or_default()
    }

    /// Forget recorded calls; scripted state is kept.
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: LedgerCall) {
        self.calls.lock().unwrap().push(call.clone());
        let hook = self.hook.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook(&call);
        }
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    fn apply(&mut self, signature: Signature, transfer: &SystemTransfer, succeeded: bool) {
        let fee = self.fee;
        let debit = if succeeded {
            transfer.lamports.checked_add(fee).unwrap_or(Lamports::new(u64::MAX))
        } else {
            fee
        };
        let from = self.balances.entry(transfer.from).or_default();
        *from = from.saturating_sub(debit);
        if succeeded {
            let to = self.balances.entry(transfer.to).or_default();
            *to = to.checked_add(transfer.lamports).unwrap_or(Lamports::new(u64::MAX));
        }

        let status = if succeeded {
            TransferStatus::Success
        } else {
            TransferStatus::Failed
        };
        let mut push = |account: Pubkey, direction, counterparty| {
            self.history.entry(account).or_default().insert(
                0,
                TransferRecord {
                    signature,
                    direction,
                    amount: transfer.lamports,
                    counterparty,
                    timestamp: None,
                    status,
                },
            );
        };
        push(transfer.from, Direction::Outgoing, transfer.to);
        if succeeded && transfer.to != transfer.from {
            push(transfer.to, Direction::Incoming, transfer.from);
        }
    }
}

impl LedgerClient for NullLedger {
    async fn get_balance(
        &self,
        account: &Pubkey,
        commitment: Commitment,
    ) -> Result<Lamports, LedgerError> {
        self.record(LedgerCall::GetBalance {
            account: *account,
            commitment,
        });
        let state = self.state.lock().unwrap();
        match &state.balance_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.balances.get(account).copied().unwrap_or_default()),
        }
    }

    async fn latest_blockhash(&self, commitment: Commitment) -> Result<LatestBlockhash, LedgerError> {
        self.record(LedgerCall::LatestBlockhash { commitment });
        let state = self.state.lock().unwrap();
        match &state.blockhash_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.latest),
        }
    }

    async fn send_transaction(
        &self,
        wire: &[u8],
        options: SendOptions,
    ) -> Result<Signature, LedgerError> {
        self.record(LedgerCall::SendTransaction {
            wire: wire.to_vec(),
            options,
        });
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.send_error {
            return Err(err.clone());
        }
        let tx = Transaction::deserialize(wire)
            .map_err(|e| LedgerError::InvalidResponse(format!("undecodable transaction: {e}")))?;
        let signature = match (state.send_signature, tx.signature()) {
            (Some(scripted), _) => scripted,
            (None, Some(own)) => *own,
            (None, None) => {
                return Err(LedgerError::Rpc {
                    code: -32602,
                    message: "transaction is not signed".into(),
                })
            }
        };
        if let Some(transfer) = tx.system_transfer() {
            state.pending.insert(signature, transfer);
        }
        Ok(signature)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &Blockhash,
        last_valid_block_height: u64,
        commitment: Commitment,
    ) -> Result<ConfirmationOutcome, LedgerError> {
        self.record(LedgerCall::ConfirmTransaction {
            signature: *signature,
            blockhash: *blockhash,
            last_valid_block_height,
            commitment,
        });
        let mut state = self.state.lock().unwrap();
        let outcome = state.confirmation.clone()?;
        if let Some(transfer) = state.pending.remove(signature) {
            match &outcome {
                ConfirmationOutcome::Confirmed => state.apply(*signature, &transfer, true),
                ConfirmationOutcome::Failed(_) => state.apply(*signature, &transfer, false),
                _ => {}
            }
        }
        Ok(outcome)
    }

    async fn get_history(
        &self,
        account: &Pubkey,
        limit: usize,
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        self.record(LedgerCall::GetHistory {
            account: *account,
            limit,
        });
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.history_error {
            return Err(err.clone());
        }
        Ok(state
            .history
            .get(account)
            .map(|records| records.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

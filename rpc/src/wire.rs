//! JSON shapes of the node's responses.

use serde::Deserialize;
use serde_json::Value;
use solsend_types::{Blockhash, Commitment, Pubkey, Signature};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcContext {
    #[serde(default)]
    pub slot: u64,
}

/// `{ "context": {...}, "value": ... }` wrapper used by most account queries.
#[derive(Debug, Clone, Deserialize)]
pub struct WithContext<T> {
    #[serde(default)]
    pub context: RpcContext,
    pub value: T,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockhashValue {
    pub blockhash: Blockhash,
    pub last_valid_block_height: u64,
}

/// One entry of `getSignatureStatuses`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// The commitment this status has reached. Nodes that omit
    /// `confirmationStatus` report rooted transactions with null `confirmations`.
    pub fn commitment(&self) -> Commitment {
        match (self.confirmation_status, self.confirmations) {
            (Some(level), _) => level,
            (None, None) => Commitment::Finalized,
            (None, Some(_)) => Commitment::Processed,
        }
    }
}

/// One entry of `getSignaturesForAddress`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: Signature,
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

/// `getTransaction` result with `"encoding": "json"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransaction {
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    pub transaction: UiTransaction,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub pre_balances: Vec<u64>,
    #[serde(default)]
    pub post_balances: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiTransaction {
    #[serde(default)]
    pub signatures: Vec<Signature>,
    pub message: UiMessage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiMessage {
    pub account_keys: Vec<Pubkey>,
    #[serde(default)]
    pub recent_blockhash: Option<Blockhash>,
}

/// Render a ledger error value (`"AccountNotFound"`,
/// `{"InstructionError":[0,{"Custom":1}]}`, ...) as a single line.
pub fn error_reason(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_latest_blockhash() {
        let v: WithContext<BlockhashValue> = serde_json::from_value(json!({
            "context": { "slot": 2792 },
            "value": {
                "blockhash": "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi",
                "lastValidBlockHeight": 3090
            }
        }))
        .unwrap();
        assert_eq!(v.context.slot, 2792);
        assert_eq!(v.value.blockhash, Blockhash::new([1; 32]));
        assert_eq!(v.value.last_valid_block_height, 3090);
    }

    #[test]
    fn status_commitment_levels() {
        let confirmed: SignatureStatus = serde_json::from_value(json!({
            "slot": 72, "confirmations": 10, "err": null, "confirmationStatus": "confirmed"
        }))
        .unwrap();
        assert_eq!(confirmed.commitment(), Commitment::Confirmed);
        assert!(confirmed.err.is_none());

        let rooted: SignatureStatus =
            serde_json::from_value(json!({ "slot": 48, "confirmations": null, "err": null }))
                .unwrap();
        assert_eq!(rooted.commitment(), Commitment::Finalized);
    }

    #[test]
    fn status_with_error() {
        let status: SignatureStatus = serde_json::from_value(json!({
            "slot": 5,
            "confirmations": 0,
            "err": { "InstructionError": [0, { "Custom": 1 }] },
            "confirmationStatus": "processed"
        }))
        .unwrap();
        let err = status.err.unwrap();
        assert_eq!(error_reason(&err), r#"{"InstructionError":[0,{"Custom":1}]}"#);
        assert_eq!(error_reason(&json!("InsufficientFunds")), "InsufficientFunds");
    }

    #[test]
    fn parses_transaction_with_missing_optionals() {
        let tx: ConfirmedTransaction = serde_json::from_value(json!({
            "slot": 430,
            "transaction": {
                "message": {
                    "accountKeys": [
                        "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi",
                        "11111111111111111111111111111111"
                    ]
                }
            }
        }))
        .unwrap();
        assert!(tx.meta.is_none());
        assert!(tx.block_time.is_none());
        assert_eq!(tx.transaction.message.account_keys.len(), 2);
    }
}

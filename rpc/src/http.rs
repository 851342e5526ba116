//! JSON-RPC 2.0 ledger client over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use solsend_types::{Blockhash, Commitment, Lamports, Pubkey, Signature, TransferRecord};
use tracing::{debug, info, warn};

use crate::client::{ConfirmationOutcome, LatestBlockhash, LedgerClient, SendOptions};
use crate::error::LedgerError;
use crate::history::transfer_record;
use crate::wire::{
    error_reason, BlockhashValue, ConfirmedTransaction, RpcErrorObject, SignatureInfo,
    SignatureStatus, WithContext,
};

/// Upper bound the node accepts for `getSignaturesForAddress`.
const MAX_SIGNATURES_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcClientConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Delay between status polls while confirming.
    pub poll_interval: Duration,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// HTTP client for a ledger node's JSON-RPC endpoint.
///
/// Wraps `reqwest::Client` with the endpoint URL and provides a typed method
/// for each call the wallet needs. Cloning shares the connection pool.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    poll_interval: Duration,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    /// Create a client for `url` (e.g. `https://api.devnet.solana.com`) with
    /// default timeouts.
    pub fn new(url: impl Into<String>) -> Result<Self, LedgerError> {
        Self::with_config(url, RpcClientConfig::default())
    }

    pub fn with_config(url: impl Into<String>, config: RpcClientConfig) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| LedgerError::Client(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
            poll_interval: config.poll_interval,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a JSON-RPC request and decode its `result` field.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc request");

        let response = self.http.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(LedgerError::HttpStatus(response.status().as_u16()));
        }

        let mut json: Value = response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(format!("invalid JSON: {e}")))?;

        if let Some(err) = json.get("error").filter(|e| !e.is_null()) {
            let err: RpcErrorObject = serde_json::from_value(err.clone())
                .map_err(|e| LedgerError::InvalidResponse(format!("malformed error: {e}")))?;
            debug!(method, code = err.code, message = %err.message, "rpc error");
            return Err(LedgerError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let result = json
            .get_mut("result")
            .map(Value::take)
            .ok_or_else(|| LedgerError::InvalidResponse(format!("{method}: missing result")))?;
        serde_json::from_value(result)
            .map_err(|e| LedgerError::InvalidResponse(format!("{method}: {e}")))
    }

    /// Current block height at `commitment`.
    pub async fn block_height(&self, commitment: Commitment) -> Result<u64, LedgerError> {
        self.call("getBlockHeight", json!([{ "commitment": commitment.as_str() }]))
            .await
    }

    /// One status poll for `signature`, without waiting.
    pub async fn signature_status(
        &self,
        signature: &Signature,
        commitment: Commitment,
    ) -> Result<ConfirmationOutcome, LedgerError> {
        Ok(self.poll_status(signature, commitment).await?.0)
    }

    /// Like [`signature_status`](Self::signature_status), also reporting
    /// whether the node has seen the transaction land without error.
    async fn poll_status(
        &self,
        signature: &Signature,
        commitment: Commitment,
    ) -> Result<(ConfirmationOutcome, bool), LedgerError> {
        let statuses: WithContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature.to_string()], { "searchTransactionHistory": false }]),
            )
            .await?;
        let Some(status) = statuses.value.into_iter().next().flatten() else {
            return Ok((ConfirmationOutcome::Pending, false));
        };
        if let Some(err) = &status.err {
            return Ok((ConfirmationOutcome::Failed(error_reason(err)), false));
        }
        if commitment.is_satisfied_by(status.commitment()) {
            Ok((ConfirmationOutcome::Confirmed, true))
        } else {
            Ok((ConfirmationOutcome::Pending, true))
        }
    }
}

impl LedgerClient for RpcClient {
    async fn get_balance(
        &self,
        account: &Pubkey,
        commitment: Commitment,
    ) -> Result<Lamports, LedgerError> {
        let balance: WithContext<u64> = self
            .call(
                "getBalance",
                json!([account.to_string(), { "commitment": commitment.as_str() }]),
            )
            .await?;
        Ok(Lamports::new(balance.value))
    }

    async fn latest_blockhash(&self, commitment: Commitment) -> Result<LatestBlockhash, LedgerError> {
        let latest: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": commitment.as_str() }]),
            )
            .await?;
        Ok(LatestBlockhash {
            blockhash: latest.value.blockhash,
            last_valid_block_height: latest.value.last_valid_block_height,
        })
    }

    async fn send_transaction(
        &self,
        wire: &[u8],
        options: SendOptions,
    ) -> Result<Signature, LedgerError> {
        let mut config = json!({
            "encoding": "base64",
            "skipPreflight": options.skip_preflight,
            "preflightCommitment": options.preflight_commitment.as_str(),
        });
        if let Some(retries) = options.max_retries {
            config["maxRetries"] = json!(retries);
        }
        let encoded = STANDARD.encode(wire);
        let signature: String = self
            .call("sendTransaction", json!([encoded, config]))
            .await?;
        signature
            .parse()
            .map_err(|e| LedgerError::InvalidResponse(format!("bad signature {signature}: {e}")))
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &Blockhash,
        last_valid_block_height: u64,
        commitment: Commitment,
    ) -> Result<ConfirmationOutcome, LedgerError> {
        // The blockhash bound only limits whether the transaction can still
        // land. Once it has, wait for the commitment without the bound.
        let mut landed = false;
        loop {
            let (outcome, seen) = self.poll_status(signature, commitment).await?;
            if outcome.is_final() {
                info!(%signature, %outcome, "confirmation resolved");
                return Ok(outcome);
            }
            if seen && !landed {
                debug!(%signature, %commitment, "transaction landed, waiting for commitment");
                landed = true;
            }

            if !landed {
                let height = self.block_height(commitment).await?;
                if height > last_valid_block_height {
                    // It may have landed between the status read and the height read.
                    let (outcome, seen) = self.poll_status(signature, commitment).await?;
                    if outcome.is_final() {
                        info!(%signature, %outcome, "confirmation resolved");
                        return Ok(outcome);
                    }
                    if !seen {
                        warn!(
                            %signature,
                            %blockhash,
                            height,
                            last_valid_block_height,
                            "blockhash expired before confirmation"
                        );
                        return Ok(ConfirmationOutcome::Expired);
                    }
                    debug!(%signature, "transaction landed at the height bound");
                    landed = true;
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn get_history(
        &self,
        account: &Pubkey,
        limit: usize,
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        let infos = self.signatures_for_address(account, limit).await?;
        let mut records = Vec::with_capacity(infos.len());
        for info in &infos {
            let Some(tx) = self.get_transaction(&info.signature).await? else {
                debug!(signature = %info.signature, "transaction not found, skipping");
                continue;
            };
            match transfer_record(account, info, &tx) {
                Some(record) => records.push(record),
                None => debug!(signature = %info.signature, "not a transfer record, skipping"),
            }
        }
        Ok(records)
    }
}

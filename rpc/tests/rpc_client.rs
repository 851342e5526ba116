//! `RpcClient` against a scripted in-process JSON-RPC node.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use solsend_rpc::{
    ConfirmationOutcome, LedgerClient, LedgerError, RpcClient, RpcClientConfig, SendOptions,
};
use solsend_types::{Blockhash, Commitment, Direction, Lamports, Pubkey, Signature};

const SIG: &str =
    "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";
const ALICE: &str = "US517G5965aydkZ46HS38QLi7UQiSojurfbQfKCELFx";
const BOB: &str = "8qbHbw2BbbTHBW1sbeqakYXVKRQM8Ne7pLK7m6CVfeR";

type Requests = Arc<Mutex<Vec<Value>>>;

/// Answer each request with the next scripted `result` (or full error body).
async fn mock_node(responses: Vec<Value>) -> (RpcClient, Requests) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests: Requests = Arc::default();
    let queue = Arc::new(Mutex::new(VecDeque::from(responses)));

    let seen = requests.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve(stream, queue.clone(), seen.clone()));
        }
    });

    let config = RpcClientConfig {
        poll_interval: Duration::from_millis(5),
        ..RpcClientConfig::default()
    };
    let client = RpcClient::with_config(format!("http://{addr}"), config).unwrap();
    (client, requests)
}

async fn serve(mut stream: TcpStream, queue: Arc<Mutex<VecDeque<Value>>>, seen: Requests) {
    let mut buf = Vec::new();
    while let Some(request) = read_request(&mut stream, &mut buf).await {
        let id = request["id"].clone();
        seen.lock().unwrap().push(request);
        let scripted = queue.lock().unwrap().pop_front().unwrap_or(Value::Null);
        let body = match scripted {
            Value::Object(ref map) if map.contains_key("error") => {
                json!({ "jsonrpc": "2.0", "id": id, "error": map["error"] })
            }
            result => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        }
        .to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        if stream.write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}

async fn read_request(stream: &mut TcpStream, buf: &mut Vec<u8>) -> Option<Value> {
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let total = end + 4 + len;
            if buf.len() >= total {
                let body: Vec<u8> = buf.drain(..total).skip(end + 4).collect();
                return serde_json::from_slice(&body).ok();
            }
        }
        let mut chunk = [0u8; 4096];
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

#[tokio::test]
async fn get_balance_sends_commitment() {
    let (client, requests) = mock_node(vec![json!({ "context": { "slot": 1 }, "value": 2_000_000_000u64 })]).await;
    let alice: Pubkey = ALICE.parse().unwrap();

    let balance = client.get_balance(&alice, Commitment::Confirmed).await.unwrap();
    assert_eq!(balance, Lamports::new(2_000_000_000));

    let req = &requests.lock().unwrap()[0];
    assert_eq!(req["jsonrpc"], "2.0");
    assert_eq!(req["method"], "getBalance");
    assert_eq!(req["params"][0], ALICE);
    assert_eq!(req["params"][1]["commitment"], "confirmed");
}

#[tokio::test]
async fn latest_blockhash_parses_bound() {
    let (client, _) = mock_node(vec![json!({
        "context": { "slot": 1 },
        "value": {
            "blockhash": "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi",
            "lastValidBlockHeight": 150
        }
    })])
    .await;
    let latest = client.latest_blockhash(Commitment::Finalized).await.unwrap();
    assert_eq!(latest.blockhash, Blockhash::new([1; 32]));
    assert_eq!(latest.last_valid_block_height, 150);
}

#[tokio::test]
async fn send_transaction_encodes_options() {
    let (client, requests) = mock_node(vec![json!(SIG)]).await;
    let sig = client
        .send_transaction(&[1, 2, 3], SendOptions::default())
        .await
        .unwrap();
    assert_eq!(sig.to_string(), SIG);

    let req = &requests.lock().unwrap()[0];
    assert_eq!(req["method"], "sendTransaction");
    assert_eq!(req["params"][0], "AQID");
    let config = &req["params"][1];
    assert_eq!(config["encoding"], "base64");
    assert_eq!(config["skipPreflight"], false);
    assert_eq!(config["preflightCommitment"], "confirmed");
    assert_eq!(config["maxRetries"], 5);
}

#[tokio::test]
async fn preflight_failure_maps_to_rpc_error() {
    let (client, _) = mock_node(vec![json!({
        "error": {
            "code": -32002,
            "message": "Transaction simulation failed: Attempt to debit an account but found no record of a prior credit.",
            "data": { "logs": [] }
        }
    })])
    .await;
    let err = client
        .send_transaction(&[0], SendOptions::default())
        .await
        .unwrap_err();
    match err {
        LedgerError::Rpc { code, message } => {
            assert_eq!(code, -32002);
            assert!(message.starts_with("Transaction simulation failed"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn confirm_polls_until_confirmed() {
    let sig: Signature = SIG.parse().unwrap();
    let (client, requests) = mock_node(vec![
        json!({ "context": { "slot": 1 }, "value": [null] }),
        json!(100),
        json!({ "context": { "slot": 2 }, "value": [{
            "slot": 2, "confirmations": 1, "err": null, "confirmationStatus": "processed"
        }] }),
        json!({ "context": { "slot": 3 }, "value": [{
            "slot": 2, "confirmations": 2, "err": null, "confirmationStatus": "confirmed"
        }] }),
    ])
    .await;

    let outcome = client
        .confirm_transaction(&sig, &Blockhash::new([1; 32]), 150, Commitment::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome, ConfirmationOutcome::Confirmed);

    let methods: Vec<String> = requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r["method"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        methods,
        [
            "getSignatureStatuses",
            "getBlockHeight",
            "getSignatureStatuses",
            "getSignatureStatuses"
        ]
    );
}

#[tokio::test]
async fn confirm_reports_execution_failure() {
    let sig: Signature = SIG.parse().unwrap();
    let (client, _) = mock_node(vec![json!({ "context": { "slot": 1 }, "value": [{
        "slot": 1, "confirmations": 0, "err": "InsufficientFunds", "confirmationStatus": "processed"
    }] })])
    .await;
    let outcome = client
        .confirm_transaction(&sig, &Blockhash::default(), 150, Commitment::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome, ConfirmationOutcome::Failed("InsufficientFunds".into()));
}

#[tokio::test]
async fn confirm_expires_past_height_bound() {
    let sig: Signature = SIG.parse().unwrap();
    let (client, requests) = mock_node(vec![
        json!({ "context": { "slot": 1 }, "value": [null] }),
        json!(151),
        json!({ "context": { "slot": 2 }, "value": [null] }),
    ])
    .await;
    let outcome = client
        .confirm_transaction(&sig, &Blockhash::default(), 150, Commitment::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome, ConfirmationOutcome::Expired);
    assert_eq!(requests.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn confirm_rechecks_status_at_height_bound() {
    let sig: Signature = SIG.parse().unwrap();
    let (client, requests) = mock_node(vec![
        json!({ "context": { "slot": 1 }, "value": [null] }),
        json!(151),
        json!({ "context": { "slot": 2 }, "value": [{
            "slot": 2, "confirmations": 2, "err": null, "confirmationStatus": "confirmed"
        }] }),
    ])
    .await;
    let outcome = client
        .confirm_transaction(&sig, &Blockhash::default(), 150, Commitment::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome, ConfirmationOutcome::Confirmed);
    assert_eq!(requests.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn landed_transaction_outlives_height_bound() {
    let sig: Signature = SIG.parse().unwrap();
    let (client, requests) = mock_node(vec![
        json!({ "context": { "slot": 1 }, "value": [null] }),
        json!(151),
        json!({ "context": { "slot": 2 }, "value": [{
            "slot": 2, "confirmations": 1, "err": null, "confirmationStatus": "processed"
        }] }),
        json!({ "context": { "slot": 3 }, "value": [{
            "slot": 2, "confirmations": 1, "err": null, "confirmationStatus": "processed"
        }] }),
        json!({ "context": { "slot": 4 }, "value": [{
            "slot": 2, "confirmations": 2, "err": null, "confirmationStatus": "confirmed"
        }] }),
    ])
    .await;
    let outcome = client
        .confirm_transaction(&sig, &Blockhash::default(), 150, Commitment::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome, ConfirmationOutcome::Confirmed);

    let methods: Vec<String> = requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r["method"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        methods,
        [
            "getSignatureStatuses",
            "getBlockHeight",
            "getSignatureStatuses",
            "getSignatureStatuses",
            "getSignatureStatuses"
        ]
    );
}

#[tokio::test]
async fn history_skips_missing_transactions() {
    let (client, requests) = mock_node(vec![
        json!([
            { "signature": SIG, "slot": 10, "err": null, "blockTime": 1_700_000_000 },
            { "signature": SIG, "slot": 9, "err": null, "blockTime": null }
        ]),
        json!({
            "slot": 10,
            "blockTime": 1_700_000_000,
            "meta": {
                "err": null,
                "fee": 5000,
                "preBalances": [2_000_000_000u64, 0, 1],
                "postBalances": [999_995_000u64, 1_000_000_000u64, 1]
            },
            "transaction": {
                "signatures": [SIG],
                "message": { "accountKeys": [ALICE, BOB, "11111111111111111111111111111111"] }
            }
        }),
        Value::Null,
    ])
    .await;
    let alice: Pubkey = ALICE.parse().unwrap();

    let records = client.get_history(&alice, 5).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].direction, Direction::Outgoing);
    assert_eq!(records[0].amount, Lamports::new(1_000_000_000));
    assert_eq!(records[0].counterparty, BOB.parse::<Pubkey>().unwrap());

    let reqs = requests.lock().unwrap();
    assert_eq!(reqs[0]["method"], "getSignaturesForAddress");
    assert_eq!(reqs[0]["params"][1]["limit"], 5);
    assert_eq!(reqs[1]["method"], "getTransaction");
    assert_eq!(reqs[1]["params"][1]["encoding"], "json");
}

#[tokio::test]
async fn unreachable_node_is_transient() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RpcClient::new(format!("http://{addr}")).unwrap();
    let err = client.latest_blockhash(Commitment::Confirmed).await.unwrap_err();
    assert!(err.is_transient(), "{err:?}");
}

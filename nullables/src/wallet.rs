//! Nullable wallet: a wallet session with scripted approvals.

use std::sync::Mutex;

use solsend_crypto::keypair_from_seed;
use solsend_rpc::{LedgerClient, SendOptions};
use solsend_transactions::Transaction;
use solsend_types::{KeyPair, Pubkey, Signature};
use solsend_wallet_core::{WalletError, WalletSession};

/// A test wallet with a deterministic key.
///
/// Approves and signs every request unless told to reject the next one, and
/// records each transaction it was asked to sign.
pub struct NullWallet {
    keypair: Option<KeyPair>,
    rejection: Mutex<Option<String>>,
    requests: Mutex<Vec<Transaction>>,
}

impl NullWallet {
    /// A connected wallet whose key derives from `seed`.
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            keypair: Some(keypair_from_seed(&seed)),
            rejection: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A wallet with no connected account.
    pub fn disconnected() -> Self {
        Self {
            keypair: None,
            rejection: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The connected account. Panics when disconnected.
    pub fn account(&self) -> Pubkey {
        self.keypair
            .as_ref()
            .map(|kp| kp.public)
            .expect("NullWallet is disconnected")
    }

    /// Refuse the next signing request, as a user dismissing the approval prompt.
    pub fn reject_next(&self, reason: impl Into<String>) {
        *self.rejection.lock().unwrap() = Some(reason.into());
    }

    /// Every transaction the wallet was asked to sign.
    pub fn requests(&self) -> Vec<Transaction> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for NullWallet {
    fn default() -> Self {
        Self::new([7; 32])
    }
}

impl WalletSession for NullWallet {
    fn current_account(&self) -> Option<Pubkey> {
        self.keypair.as_ref().map(|kp| kp.public)
    }

    async fn sign_and_send<L: LedgerClient>(
        &self,
        mut tx: Transaction,
        ledger: &L,
        options: SendOptions,
    ) -> Result<Signature, WalletError> {
        self.requests.lock().unwrap().push(tx.clone());
        let keypair = self.keypair.as_ref().ok_or(WalletError::NotConnected)?;
        let rejection = self.rejection.lock().unwrap().take();
        if let Some(reason) = rejection {
            return Err(WalletError::Rejected(reason));
        }
        tx.sign(keypair)?;
        let wire = tx.serialize()?;
        Ok(ledger.send_transaction(&wire, options).await?)
    }
}

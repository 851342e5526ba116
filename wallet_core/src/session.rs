//! Wallet sessions: who is connected, and signing on their behalf.

use std::future::Future;
use std::path::Path;

use solsend_crypto::{generate_keypair, read_keypair_file};
use solsend_rpc::{LedgerClient, SendOptions};
use solsend_transactions::{Transaction, PACKET_DATA_SIZE};
use solsend_types::{KeyPair, Pubkey, Signature};
use tracing::{debug, warn};

use crate::error::WalletError;

/// A connected wallet that can approve, sign, and broadcast transactions.
pub trait WalletSession: Send + Sync {
    /// The connected account, or `None` when disconnected.
    fn current_account(&self) -> Option<Pubkey>;

    /// Sign `tx` as the connected account and broadcast it through `ledger`.
    fn sign_and_send<L: LedgerClient>(
        &self,
        tx: Transaction,
        ledger: &L,
        options: SendOptions,
    ) -> impl Future<Output = Result<Signature, WalletError>> + Send;
}

/// A wallet session backed by a local Ed25519 keypair.
pub struct KeypairWallet {
    keypair: Option<KeyPair>,
}

impl KeypairWallet {
    pub fn new(keypair: KeyPair) -> Self {
        Self {
            keypair: Some(keypair),
        }
    }

    /// Connect with a freshly generated keypair.
    pub fn generate() -> Self {
        Self::new(generate_keypair())
    }

    /// Connect with a keypair file in the Solana CLI layout.
    pub fn from_file(path: &Path) -> Result<Self, WalletError> {
        let keypair = read_keypair_file(path)?;
        debug!(account = %keypair.public, path = %path.display(), "loaded keypair");
        Ok(Self::new(keypair))
    }

    /// Drop the key material. Later calls see no connected account.
    pub fn disconnect(&mut self) {
        self.keypair = None;
    }

    pub fn is_connected(&self) -> bool {
        self.keypair.is_some()
    }
}

impl WalletSession for KeypairWallet {
    fn current_account(&self) -> Option<Pubkey> {
        self.keypair.as_ref().map(|kp| kp.public)
    }

    async fn sign_and_send<L: LedgerClient>(
        &self,
        mut tx: Transaction,
        ledger: &L,
        options: SendOptions,
    ) -> Result<Signature, WalletError> {
        let keypair = self.keypair.as_ref().ok_or(WalletError::NotConnected)?;
        if tx.fee_payer() != Some(&keypair.public) {
            return Err(WalletError::Rejected(
                "fee payer is not the connected account".into(),
            ));
        }

        tx.sign(keypair)?;
        let wire = tx.serialize()?;
        if wire.len() > PACKET_DATA_SIZE {
            return Err(WalletError::TooLarge {
                size: wire.len(),
                limit: PACKET_DATA_SIZE,
            });
        }
        let local = tx.signature().copied();

        let signature = ledger.send_transaction(&wire, options).await?;
        if local != Some(signature) {
            warn!(%signature, "node returned a signature that differs from the local one");
        }
        Ok(signature)
    }
}

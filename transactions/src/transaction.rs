//! Signed transactions and their base64 wire encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use solsend_crypto::{sign_message, verify_signature};
use solsend_types::{Blockhash, KeyPair, Lamports, Pubkey, Signature};

use crate::compact::{encode_compact_u16, len_u16};
use crate::error::TransactionError;
use crate::instruction::{system_transfer, SystemInstruction, SYSTEM_PROGRAM_ID};
use crate::message::{Message, Reader};

/// Largest serialized transaction the ledger accepts.
pub const PACKET_DATA_SIZE: usize = 1232;

/// A system transfer recovered from a transaction's instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemTransfer {
    pub from: Pubkey,
    pub to: Pubkey,
    pub lamports: Lamports,
}

/// A message plus one signature slot per required signer.
///
/// Unsigned slots hold the all-zero signature until [`Transaction::sign`] fills them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    signatures: Vec<Signature>,
    message: Message,
}

impl Transaction {
    pub fn new_unsigned(message: Message) -> Self {
        let slots = usize::from(message.header().num_required_signatures);
        Self {
            signatures: vec![Signature::default(); slots],
            message,
        }
    }

    /// Build an unsigned transfer of `lamports` from `from` to `to`, with `from`
    /// as fee payer.
    pub fn new_transfer(
        from: &Pubkey,
        to: &Pubkey,
        lamports: Lamports,
        recent_blockhash: Blockhash,
    ) -> Result<Self, TransactionError> {
        let ix = system_transfer(from, to, lamports);
        let message = Message::new(&[ix], from, recent_blockhash)?;
        Ok(Self::new_unsigned(message))
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.message.fee_payer()
    }

    pub fn recent_blockhash(&self) -> &Blockhash {
        self.message.recent_blockhash()
    }

    /// Fill the signature slot belonging to `keypair`.
    pub fn sign(&mut self, keypair: &KeyPair) -> Result<(), TransactionError> {
        let slot = self
            .message
            .signer_keys()
            .iter()
            .position(|k| *k == keypair.public)
            .ok_or_else(|| TransactionError::KeypairNotSigner(keypair.public.to_string()))?;
        let bytes = self.message.serialize();
        self.signatures[slot] = sign_message(&bytes, &keypair.private);
        Ok(())
    }

    /// True once every signature slot is filled.
    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty() && self.signatures.iter().all(|s| *s != Signature::default())
    }

    /// The fee payer's signature, which identifies the transaction on the ledger.
    pub fn signature(&self) -> Option<&Signature> {
        self.signatures
            .first()
            .filter(|s| **s != Signature::default())
    }

    /// Check every signature against its signer key.
    pub fn verify(&self) -> bool {
        if !self.is_signed() || self.signatures.len() != self.message.signer_keys().len() {
            return false;
        }
        let bytes = self.message.serialize();
        self.signatures
            .iter()
            .zip(self.message.signer_keys())
            .all(|(sig, key)| verify_signature(&bytes, sig, key))
    }

    /// The first System Program transfer in this transaction, if any.
    pub fn system_transfer(&self) -> Option<SystemTransfer> {
        let keys = self.message.account_keys();
        self.message.instructions().iter().find_map(|ix| {
            let program = keys.get(usize::from(ix.program_id_index))?;
            if *program != SYSTEM_PROGRAM_ID {
                return None;
            }
            let SystemInstruction::Transfer { lamports } =
                SystemInstruction::decode(&ix.data).ok()??;
            let from = keys.get(usize::from(*ix.accounts.first()?))?;
            let to = keys.get(usize::from(*ix.accounts.get(1)?))?;
            Some(SystemTransfer {
                from: *from,
                to: *to,
                lamports,
            })
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let message = self.message.serialize();
        let mut out = Vec::with_capacity(1 + self.signatures.len() * 64 + message.len());
        encode_compact_u16(len_u16(self.signatures.len(), "signatures")?, &mut out);
        for sig in &self.signatures {
            out.extend_from_slice(sig.as_bytes());
        }
        out.extend_from_slice(&message);
        Ok(out)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = Reader::new(bytes);
        let count = usize::from(reader.compact()?);
        let mut signatures = Vec::with_capacity(count.min(16));
        for _ in 0..count {
            signatures.push(Signature::new(reader.array("signature")?));
        }
        let message = Message::read(&mut reader)?;
        reader.finish()?;

        let required = usize::from(message.header().num_required_signatures);
        if signatures.len() != required {
            return Err(TransactionError::InvalidHeader(format!(
                "{} signatures for {required} required signers",
                signatures.len()
            )));
        }
        Ok(Self {
            signatures,
            message,
        })
    }

    /// Base64 of the wire bytes, as `sendTransaction` expects.
    pub fn to_base64(&self) -> Result<String, TransactionError> {
        Ok(STANDARD.encode(self.serialize()?))
    }

    pub fn from_base64(text: &str) -> Result<Self, TransactionError> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| TransactionError::Base64(e.to_string()))?;
        Self::deserialize(&bytes)
    }
}

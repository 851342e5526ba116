//! Legacy messages: the signed portion of a transaction.
//!
//! Layout: a three-byte header, a compact-u16-prefixed list of 32-byte account
//! keys, the 32-byte recent blockhash, and a compact-u16-prefixed list of
//! compiled instructions. Keys are ordered signer-writable, signer-readonly,
//! nonsigner-writable, nonsigner-readonly, with the fee payer always first.

use solsend_types::{Blockhash, Pubkey};

use crate::compact::{decode_compact_u16, encode_compact_u16, len_u16};
use crate::error::TransactionError;
use crate::instruction::{CompiledInstruction, Instruction};

/// Set on the first byte of a versioned (v0+) message.
const VERSION_PREFIX_MASK: u8 = 0x80;

/// Instructions address accounts by a one-byte index.
const MAX_ACCOUNT_KEYS: usize = u8::MAX as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    header: MessageHeader,
    account_keys: Vec<Pubkey>,
    recent_blockhash: Blockhash,
    instructions: Vec<CompiledInstruction>,
}

#[derive(Clone, Copy)]
struct KeyFlags {
    pubkey: Pubkey,
    is_signer: bool,
    is_writable: bool,
}

impl Message {
    /// Compile `instructions` into a message paid for by `payer`.
    pub fn new(
        instructions: &[Instruction],
        payer: &Pubkey,
        recent_blockhash: Blockhash,
    ) -> Result<Self, TransactionError> {
        let mut keys = vec![KeyFlags {
            pubkey: *payer,
            is_signer: true,
            is_writable: true,
        }];
        let mut upsert = |pubkey: Pubkey, is_signer: bool, is_writable: bool| {
            match keys.iter_mut().find(|k| k.pubkey == pubkey) {
                Some(existing) => {
                    existing.is_signer |= is_signer;
                    existing.is_writable |= is_writable;
                }
                None => keys.push(KeyFlags {
                    pubkey,
                    is_signer,
                    is_writable,
                }),
            }
        };
        for ix in instructions {
            for meta in &ix.accounts {
                upsert(meta.pubkey, meta.is_signer, meta.is_writable);
            }
            upsert(ix.program_id, false, false);
        }

        // Stable, so the payer stays ahead of the other signer-writable keys.
        keys.sort_by_key(|k| (!k.is_signer, !k.is_writable));

        if keys.len() > MAX_ACCOUNT_KEYS {
            return Err(TransactionError::TooLarge(format!(
                "{} account keys",
                keys.len()
            )));
        }

        let count = |pred: fn(&KeyFlags) -> bool| -> Result<u8, TransactionError> {
            let n = keys.iter().filter(|k| pred(k)).count();
            u8::try_from(n).map_err(|_| TransactionError::TooLarge(format!("{n} signers")))
        };
        let header = MessageHeader {
            num_required_signatures: count(|k| k.is_signer)?,
            num_readonly_signed_accounts: count(|k| k.is_signer && !k.is_writable)?,
            num_readonly_unsigned_accounts: count(|k| !k.is_signer && !k.is_writable)?,
        };
        let account_keys: Vec<Pubkey> = keys.iter().map(|k| k.pubkey).collect();

        let index_of = |pubkey: &Pubkey| -> u8 {
            // Every key was inserted above and the list holds at most 256 entries.
            account_keys
                .iter()
                .position(|k| k == pubkey)
                .map(|i| i as u8)
                .unwrap_or_default()
        };
        let mut compiled = Vec::with_capacity(instructions.len());
        for ix in instructions {
            len_u16(ix.accounts.len(), "instruction accounts")?;
            len_u16(ix.data.len(), "bytes of instruction data")?;
            compiled.push(CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect(),
                data: ix.data.clone(),
            });
        }
        len_u16(compiled.len(), "instructions")?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    pub fn account_keys(&self) -> &[Pubkey] {
        &self.account_keys
    }

    pub fn recent_blockhash(&self) -> &Blockhash {
        &self.recent_blockhash
    }

    pub fn instructions(&self) -> &[CompiledInstruction] {
        &self.instructions
    }

    /// The account that pays the fee: always the first key.
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.account_keys.first()
    }

    /// Keys whose signatures the transaction must carry, in signature order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        let n = usize::from(self.header.num_required_signatures).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    pub fn is_signer(&self, index: usize) -> bool {
        index < usize::from(self.header.num_required_signatures)
    }

    pub fn is_writable(&self, index: usize) -> bool {
        let signers = usize::from(self.header.num_required_signatures);
        if index >= self.account_keys.len() {
            false
        } else if index < signers {
            index < signers - usize::from(self.header.num_readonly_signed_accounts)
        } else {
            index
                < self.account_keys.len()
                    - usize::from(self.header.num_readonly_unsigned_accounts)
        }
    }

    /// The bytes that signers sign.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 + 1 + self.account_keys.len() * 32 + 32 + 64);
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        // Lengths were bounded when the message was compiled or decoded.
        encode_compact_u16(self.account_keys.len() as u16, &mut out);
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(self.recent_blockhash.as_bytes());

        encode_compact_u16(self.instructions.len() as u16, &mut out);
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_compact_u16(ix.accounts.len() as u16, &mut out);
            out.extend_from_slice(&ix.accounts);
            encode_compact_u16(ix.data.len() as u16, &mut out);
            out.extend_from_slice(&ix.data);
        }
        out
    }

    /// Decode a message, validating the header and every account index.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = Reader::new(bytes);
        let message = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(message)
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self, TransactionError> {
        let first = reader.u8("message header")?;
        if first & VERSION_PREFIX_MASK != 0 {
            return Err(TransactionError::UnsupportedVersion);
        }
        let header = MessageHeader {
            num_required_signatures: first,
            num_readonly_signed_accounts: reader.u8("message header")?,
            num_readonly_unsigned_accounts: reader.u8("message header")?,
        };

        let key_count = usize::from(reader.compact()?);
        let mut account_keys = Vec::with_capacity(key_count.min(MAX_ACCOUNT_KEYS));
        for _ in 0..key_count {
            account_keys.push(Pubkey::new(reader.array("account key")?));
        }
        let recent_blockhash = Blockhash::new(reader.array("recent blockhash")?);

        let ix_count = usize::from(reader.compact()?);
        let mut instructions = Vec::with_capacity(ix_count.min(64));
        for _ in 0..ix_count {
            let program_id_index = reader.u8("program id index")?;
            let n = usize::from(reader.compact()?);
            let accounts = reader.take(n, "instruction accounts")?.to_vec();
            let n = usize::from(reader.compact()?);
            let data = reader.take(n, "instruction data")?.to_vec();
            instructions.push(CompiledInstruction {
                program_id_index,
                accounts,
                data,
            });
        }

        let message = Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        };
        message.validate()?;
        Ok(message)
    }

    fn validate(&self) -> Result<(), TransactionError> {
        let h = &self.header;
        let keys = self.account_keys.len();
        let signers = usize::from(h.num_required_signatures);
        if signers == 0 {
            return Err(TransactionError::InvalidHeader(
                "no required signatures".into(),
            ));
        }
        if h.num_readonly_signed_accounts >= h.num_required_signatures {
            return Err(TransactionError::InvalidHeader(
                "fee payer must be writable".into(),
            ));
        }
        if signers + usize::from(h.num_readonly_unsigned_accounts) > keys {
            return Err(TransactionError::InvalidHeader(format!(
                "header describes more accounts than the {keys} keys present"
            )));
        }
        for ix in &self.instructions {
            for &index in std::iter::once(&ix.program_id_index).chain(&ix.accounts) {
                if usize::from(index) >= keys {
                    return Err(TransactionError::AccountIndexOutOfRange { index, len: keys });
                }
            }
        }
        Ok(())
    }
}

/// Bounds-checked cursor over wire bytes.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], TransactionError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(TransactionError::Truncated(what))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self, what: &'static str) -> Result<u8, TransactionError> {
        Ok(self.take(1, what)?[0])
    }

    pub(crate) fn array<const N: usize>(
        &mut self,
        what: &'static str,
    ) -> Result<[u8; N], TransactionError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    pub(crate) fn compact(&mut self) -> Result<u16, TransactionError> {
        let (value, used) = decode_compact_u16(&self.bytes[self.pos..])?;
        self.pos += used;
        Ok(value)
    }

    pub(crate) fn finish(&self) -> Result<(), TransactionError> {
        match self.bytes.len() - self.pos {
            0 => Ok(()),
            extra => Err(TransactionError::TrailingBytes(extra)),
        }
    }
}

//! Instructions and the System Program transfer encoding.

use solsend_types::{Lamports, Pubkey};

use crate::error::TransactionError;

/// The System Program id: 32 zero bytes, `11111111111111111111111111111111` in base58.
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// Index of the `Transfer` variant in the System Program's instruction enum.
const SYSTEM_TRANSFER_INDEX: u32 = 2;

/// An account referenced by an instruction, with its access flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A program invocation before key compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// An instruction whose keys have been replaced by indices into the message's
/// account list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// The subset of System Program instructions this wallet understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemInstruction {
    Transfer { lamports: Lamports },
}

impl SystemInstruction {
    /// Encode as instruction data: a u32 LE variant index followed by the payload.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            SystemInstruction::Transfer { lamports } => {
                let mut data = Vec::with_capacity(12);
                data.extend_from_slice(&SYSTEM_TRANSFER_INDEX.to_le_bytes());
                data.extend_from_slice(&lamports.get().to_le_bytes());
                data
            }
        }
    }

    /// Decode instruction data. Returns `Ok(None)` for variants other than `Transfer`.
    pub fn decode(data: &[u8]) -> Result<Option<Self>, TransactionError> {
        let index_bytes: [u8; 4] = data
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or(TransactionError::Truncated("system instruction index"))?;
        if u32::from_le_bytes(index_bytes) != SYSTEM_TRANSFER_INDEX {
            return Ok(None);
        }
        let lamport_bytes: [u8; 8] = data
            .get(4..12)
            .and_then(|b| b.try_into().ok())
            .ok_or(TransactionError::Truncated("transfer lamports"))?;
        Ok(Some(SystemInstruction::Transfer {
            lamports: Lamports::new(u64::from_le_bytes(lamport_bytes)),
        }))
    }
}

/// Build a System Program transfer of `lamports` from `from` (signer) to `to`.
pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: Lamports) -> Instruction {
    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data: SystemInstruction::Transfer { lamports }.encode(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_program_id_renders_as_ones() {
        assert_eq!(
            SYSTEM_PROGRAM_ID.to_string(),
            "11111111111111111111111111111111"
        );
    }

    #[test]
    fn transfer_data_layout() {
        let data = SystemInstruction::Transfer {
            lamports: Lamports::new(500_000_000),
        }
        .encode();
        assert_eq!(data.len(), 12);
        assert_eq!(&data[..4], &[2, 0, 0, 0]);
        assert_eq!(&data[4..], &500_000_000u64.to_le_bytes());
    }

    #[test]
    fn transfer_accounts() {
        let from = Pubkey::new([1; 32]);
        let to = Pubkey::new([2; 32]);
        let ix = system_transfer(&from, &to, Lamports::new(1));
        assert_eq!(ix.program_id, SYSTEM_PROGRAM_ID);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
    }

    #[test]
    fn decode_transfer() {
        let data = SystemInstruction::Transfer {
            lamports: Lamports::new(42),
        }
        .encode();
        assert_eq!(
            SystemInstruction::decode(&data).unwrap(),
            Some(SystemInstruction::Transfer {
                lamports: Lamports::new(42)
            })
        );
    }

    #[test]
    fn decode_other_variant_is_none() {
        assert_eq!(SystemInstruction::decode(&[0, 0, 0, 0]).unwrap(), None);
    }

    #[test]
    fn decode_truncated() {
        assert!(SystemInstruction::decode(&[2, 0]).is_err());
        assert!(SystemInstruction::decode(&[2, 0, 0, 0, 1]).is_err());
    }
}

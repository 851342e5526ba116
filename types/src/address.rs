//! Account reference: an Ed25519 public key in base58 form.
//!
//! Any base58 string that decodes to exactly 32 bytes is accepted. No on-curve
//! check is made, so program-derived addresses are valid recipients too.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// Length of a public key in bytes.
pub const PUBKEY_BYTES: usize = 32;

/// Longest base58 rendering of 32 bytes.
const MAX_BASE58_LEN: usize = 44;

/// A ledger account reference.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }
}

/// Decode a base58 string into a fixed-size byte array.
///
/// `max_len` bounds the input before decoding so oversized text is rejected cheaply.
pub(crate) fn decode_base58_fixed<const N: usize>(
    s: &str,
    max_len: usize,
) -> Result<[u8; N], DecodeError> {
    if s.is_empty() {
        return Err(DecodeError::Empty);
    }
    if s.len() > max_len {
        return Err(DecodeError::TooLong(s.len()));
    }
    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|e| DecodeError::Base58(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| DecodeError::WrongLength {
            expected: N,
            actual: bytes.len(),
        })
}

impl FromStr for Pubkey {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_base58_fixed(s, MAX_BASE58_LEN).map(Self)
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_program_id_is_all_ones() {
        let key = Pubkey::default();
        assert_eq!(key.to_string(), "11111111111111111111111111111111");
        assert_eq!(
            "11111111111111111111111111111111".parse::<Pubkey>().unwrap(),
            key
        );
    }

    #[test]
    fn parses_known_address() {
        let text = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";
        let key: Pubkey = text.parse().unwrap();
        assert_eq!(key.to_string(), text);
    }

    #[test]
    fn rejects_non_base58_text() {
        assert!(matches!(
            "not-an-address".parse::<Pubkey>(),
            Err(DecodeError::Base58(_))
        ));
        assert!("valid-recipient-address".parse::<Pubkey>().is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            "abc".parse::<Pubkey>(),
            Err(DecodeError::WrongLength {
                expected: 32,
                actual: 3
            })
        );
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert_eq!("".parse::<Pubkey>(), Err(DecodeError::Empty));
        let long = "1".repeat(45);
        assert_eq!(long.parse::<Pubkey>(), Err(DecodeError::TooLong(45)));
    }

    #[test]
    fn serde_uses_base58_string() {
        let key = Pubkey::new([7u8; 32]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{key}\""));
        let back: Pubkey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}

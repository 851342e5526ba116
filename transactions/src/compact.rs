//! Compact-u16 ("shortvec") length prefixes.
//!
//! Seven bits per byte, low bits first, high bit set on every byte but the last.
//! At most three bytes; the third byte may only carry the top two bits.

use crate::error::TransactionError;

/// Append `value` in compact-u16 form.
pub fn encode_compact_u16(value: u16, out: &mut Vec<u8>) {
    let mut rem = value;
    loop {
        let mut byte = (rem & 0x7F) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            return;
        }
        byte |= 0x80;
        out.push(byte);
    }
}

/// Decode a compact-u16 from the front of `bytes`, returning the value and the
/// number of bytes consumed. Non-canonical encodings are rejected.
pub fn decode_compact_u16(bytes: &[u8]) -> Result<(u16, usize), TransactionError> {
    let mut value: u32 = 0;
    for i in 0..3 {
        let byte = *bytes
            .get(i)
            .ok_or(TransactionError::Truncated("compact-u16"))?;
        // A zero continuation byte means a shorter encoding existed.
        if i > 0 && byte == 0 {
            return Err(TransactionError::InvalidLength);
        }
        value |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return u16::try_from(value)
                .map(|v| (v, i + 1))
                .map_err(|_| TransactionError::InvalidLength);
        }
        if i == 2 {
            break;
        }
    }
    Err(TransactionError::InvalidLength)
}

/// Convert a collection length to u16, failing for oversized collections.
pub(crate) fn len_u16(len: usize, what: &str) -> Result<u16, TransactionError> {
    u16::try_from(len).map_err(|_| TransactionError::TooLarge(format!("{len} {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u16) -> Vec<u8> {
        let mut out = Vec::new();
        encode_compact_u16(value, &mut out);
        out
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(0x7F), vec![0x7F]);
        assert_eq!(encode(0x80), vec![0x80, 0x01]);
        assert_eq!(encode(0x3FFF), vec![0xFF, 0x7F]);
        assert_eq!(encode(0x4000), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode(0xFFFF), vec![0xFF, 0xFF, 0x03]);
    }

    #[test]
    fn decode_reports_consumed_bytes() {
        assert_eq!(decode_compact_u16(&[0x80, 0x01, 0xAA]).unwrap(), (0x80, 2));
    }

    #[test]
    fn rejects_non_canonical() {
        assert_eq!(
            decode_compact_u16(&[0x80, 0x00]),
            Err(TransactionError::InvalidLength)
        );
    }

    #[test]
    fn rejects_overflow() {
        assert_eq!(
            decode_compact_u16(&[0xFF, 0xFF, 0x04]),
            Err(TransactionError::InvalidLength)
        );
        assert_eq!(
            decode_compact_u16(&[0x80, 0x80, 0x80, 0x01]),
            Err(TransactionError::InvalidLength)
        );
    }

    #[test]
    fn rejects_truncated() {
        assert_eq!(
            decode_compact_u16(&[0x80]),
            Err(TransactionError::Truncated("compact-u16"))
        );
        assert_eq!(
            decode_compact_u16(&[]),
            Err(TransactionError::Truncated("compact-u16"))
        );
    }
}

use proptest::prelude::*;

use solsend_types::{parse_sol, Blockhash, Lamports, Pubkey, Signature, Timestamp, LAMPORTS_PER_SOL};

proptest! {
    /// Pubkey base58 roundtrip: display then parse produces the same key.
    #[test]
    fn pubkey_base58_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let key = Pubkey::new(bytes);
        let parsed: Pubkey = key.to_string().parse().unwrap();
        prop_assert_eq!(parsed, key);
    }

    /// Blockhash base58 roundtrip.
    #[test]
    fn blockhash_base58_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = Blockhash::new(bytes);
        let parsed: Blockhash = hash.to_string().parse().unwrap();
        prop_assert_eq!(parsed, hash);
    }

    /// Signature base58 roundtrip over both halves of the 64 bytes.
    #[test]
    fn signature_base58_roundtrip(
        lo in prop::array::uniform32(0u8..),
        hi in prop::array::uniform32(0u8..),
    ) {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&lo);
        bytes[32..].copy_from_slice(&hi);
        let sig = Signature::new(bytes);
        let parsed: Signature = sig.to_string().parse().unwrap();
        prop_assert_eq!(parsed, sig);
    }

    /// Formatting lamports as SOL text and parsing it back is lossless.
    #[test]
    fn sol_string_roundtrip(lamports in 0u64..u64::MAX) {
        let amount = Lamports::new(lamports);
        let parsed = parse_sol(&amount.to_sol_string()).unwrap();
        prop_assert_eq!(parsed.lamports, amount);
        prop_assert!(!parsed.dropped_digits);
    }

    /// Extra fractional digits never round up.
    #[test]
    fn extra_digits_truncate(
        whole in 0u64..1_000_000,
        frac in 0u64..LAMPORTS_PER_SOL,
        tail in 1u32..10,
    ) {
        let text = format!("{whole}.{frac:09}{tail}");
        let parsed = parse_sol(&text).unwrap();
        prop_assert_eq!(parsed.lamports.get(), whole * LAMPORTS_PER_SOL + frac);
        prop_assert!(parsed.dropped_digits);
    }

    /// Timestamp has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired(base in 0i64..1_000_000, duration in 0u64..1_000, offset in 0i64..2_000) {
        let shown = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(shown.has_expired(duration, now), offset as u64 >= duration);
    }
}

//! Native token amounts.
//!
//! Amounts are held as integer lamports. Conversion from user-entered SOL text is
//! done on the decimal string itself, never through floating point, so
//! `"1.23456789995"` becomes exactly `1_234_567_899` lamports. Digits past the
//! ninth fractional place are dropped (truncation toward zero); callers learn
//! about it through [`ParsedSol::dropped_digits`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AmountError;

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Number of fractional SOL digits representable in lamports.
pub const SOL_DECIMALS: usize = 9;

/// An amount of the native token in lamports.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Lamports(u64);

impl Lamports {
    pub const ZERO: Self = Self(0);

    pub const fn new(lamports: u64) -> Self {
        Self(lamports)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Whole SOL with up to 9 fractional digits, trailing zeros trimmed.
    pub fn to_sol_string(&self) -> String {
        let whole = self.0 / LAMPORTS_PER_SOL;
        let frac = self.0 % LAMPORTS_PER_SOL;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{frac:09}");
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }

    /// Parse decimal SOL text, truncating sub-lamport digits.
    pub fn from_sol_str(text: &str) -> Result<Self, AmountError> {
        parse_sol(text).map(|parsed| parsed.lamports)
    }
}

impl fmt::Display for Lamports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} SOL", self.to_sol_string())
    }
}

impl FromStr for Lamports {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_sol_str(s)
    }
}

/// Result of parsing a SOL amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedSol {
    pub lamports: Lamports,
    /// True when non-zero digits beyond lamport precision were discarded.
    pub dropped_digits: bool,
}

/// Parse a decimal SOL amount such as `"1"`, `"0.5"`, `".25"` or `"+2."`.
///
/// Exponents, separators and signs other than a leading `+` are rejected.
pub fn parse_sol(text: &str) -> Result<ParsedSol, AmountError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative);
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (whole, frac) = match unsigned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (unsigned, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(AmountError::Invalid(trimmed.to_string()));
    }

    let whole_lamports = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .map_err(|_| AmountError::Overflow)?
            .checked_mul(LAMPORTS_PER_SOL)
            .ok_or(AmountError::Overflow)?
    };

    let kept = &frac[..frac.len().min(SOL_DECIMALS)];
    let dropped = &frac[kept.len()..];
    let mut frac_lamports = 0u64;
    for (i, b) in kept.bytes().enumerate() {
        frac_lamports += u64::from(b - b'0') * 10u64.pow((SOL_DECIMALS - 1 - i) as u32);
    }

    let lamports = whole_lamports
        .checked_add(frac_lamports)
        .ok_or(AmountError::Overflow)?;

    Ok(ParsedSol {
        lamports: Lamports(lamports),
        dropped_digits: dropped.bytes().any(|b| b != b'0'),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_sol() {
        assert_eq!(Lamports::from_sol_str("1").unwrap().get(), 1_000_000_000);
        assert_eq!(Lamports::from_sol_str("2").unwrap().get(), 2_000_000_000);
    }

    #[test]
    fn fractional_sol() {
        assert_eq!(Lamports::from_sol_str("0.5").unwrap().get(), 500_000_000);
        assert_eq!(Lamports::from_sol_str(".25").unwrap().get(), 250_000_000);
        assert_eq!(Lamports::from_sol_str("3.").unwrap().get(), 3_000_000_000);
        assert_eq!(Lamports::from_sol_str("0.000000001").unwrap().get(), 1);
    }

    #[test]
    fn truncates_sub_lamport_digits() {
        let parsed = parse_sol("1.23456789995").unwrap();
        assert_eq!(parsed.lamports.get(), 1_234_567_899);
        assert!(parsed.dropped_digits);

        let exact = parse_sol("1.234567899000").unwrap();
        assert_eq!(exact.lamports.get(), 1_234_567_899);
        assert!(!exact.dropped_digits);

        assert_eq!(Lamports::from_sol_str("0.0000000009").unwrap(), Lamports::ZERO);
    }

    #[test]
    fn surrounding_whitespace_and_plus_sign() {
        assert_eq!(Lamports::from_sol_str("  +1.5 ").unwrap().get(), 1_500_000_000);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_sol(""), Err(AmountError::Empty));
        assert_eq!(parse_sol("   "), Err(AmountError::Empty));
        assert_eq!(parse_sol("-1"), Err(AmountError::Negative));
        assert!(matches!(parse_sol("."), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_sol("1e9"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_sol("1.2.3"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_sol("abc"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_sol("1,5"), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn rejects_overflow() {
        // u64::MAX lamports is ~18.4 billion SOL.
        assert_eq!(parse_sol("18446744074"), Err(AmountError::Overflow));
        assert_eq!(
            parse_sol("99999999999999999999999"),
            Err(AmountError::Overflow)
        );
        assert!(parse_sol("18446744073.709551615").is_ok());
        assert_eq!(parse_sol("18446744073.709551616"), Err(AmountError::Overflow));
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Lamports::new(2_000_000_000).to_string(), "2 SOL");
        assert_eq!(Lamports::new(1_500_000_000).to_string(), "1.5 SOL");
        assert_eq!(Lamports::new(1).to_string(), "0.000000001 SOL");
        assert_eq!(Lamports::ZERO.to_string(), "0 SOL");
    }

    #[test]
    fn checked_arithmetic() {
        let a = Lamports::new(5);
        assert_eq!(a.checked_sub(Lamports::new(6)), None);
        assert_eq!(a.saturating_sub(Lamports::new(6)), Lamports::ZERO);
        assert_eq!(Lamports::new(u64::MAX).checked_add(a), None);
    }
}

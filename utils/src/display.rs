//! Terminal display helpers.

use solsend_types::Pubkey;

/// Abbreviate an account for compact listings: `4Nd1…DB4T`.
pub fn short_address(account: &Pubkey) -> String {
    let full = account.to_string();
    if full.len() <= 10 {
        return full;
    }
    format!("{}…{}", &full[..4], &full[full.len() - 4..])
}

/// Describe an age in seconds, e.g. `42s ago`, `3m 5s ago`, `2d 4h ago`.
pub fn format_age(secs: u64) -> String {
    let span = if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    };
    format!("{span} ago")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_address_keeps_ends() {
        let key: Pubkey = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T".parse().unwrap();
        assert_eq!(short_address(&key), "4Nd1…DB4T");
    }

    #[test]
    fn ages() {
        assert_eq!(format_age(42), "42s ago");
        assert_eq!(format_age(185), "3m 5s ago");
        assert_eq!(format_age(7_260), "2h 1m ago");
        assert_eq!(format_age(187_200), "2d 4h ago");
    }
}

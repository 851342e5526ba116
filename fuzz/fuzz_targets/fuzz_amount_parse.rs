#![no_main]

use libfuzzer_sys::fuzz_target;

use solsend_types::{parse_sol, Lamports, Pubkey};

// Amount and address parsing never panic on arbitrary text, and every parsed
// amount formats back to a value that parses to itself.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(parsed) = parse_sol(text) {
        let formatted = parsed.lamports.to_sol_string();
        let again: Lamports = formatted.parse().expect("formatted amount must parse");
        assert_eq!(again, parsed.lamports);
    }

    let _ = text.parse::<Pubkey>();
});

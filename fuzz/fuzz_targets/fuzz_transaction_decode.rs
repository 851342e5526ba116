#![no_main]

use libfuzzer_sys::fuzz_target;

use solsend_transactions::{Message, Transaction};

// Decoding arbitrary bytes never panics, and whatever decodes re-encodes to
// the same bytes.
fuzz_target!(|data: &[u8]| {
    if let Ok(message) = Message::deserialize(data) {
        assert_eq!(message.serialize(), data);
    }

    if let Ok(tx) = Transaction::deserialize(data) {
        let encoded = tx.serialize().expect("decoded transaction must re-encode");
        assert_eq!(encoded, data);
        let _ = tx.verify();
        let _ = tx.system_transfer();
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Transaction::from_base64(text);
    }
});

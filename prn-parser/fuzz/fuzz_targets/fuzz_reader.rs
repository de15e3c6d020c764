#![no_main]

use libfuzzer_sys::fuzz_target;
use prn_parser::{SpoolReader, Token};

fuzz_target!(|data: &[u8]| {
    let reader = SpoolReader::new(2, b"\r\n").expect("CR LF is a valid line break");
    let mut rebuilt = Vec::with_capacity(data.len());
    let mut kept = Vec::new();

    // Reading from memory never fails
    let pages = reader
        .read_with(data, None, |token| {
            rebuilt.extend_from_slice(token.bytes());
            if let Token::Data(bytes) = token {
                kept.extend_from_slice(bytes);
            }
        })
        .expect("in-memory read failed");

    // Verify invariants:
    // 1. Every input byte is reported exactly once, in order
    // 2. Pages hold exactly the data bytes
    assert_eq!(rebuilt, data);
    assert_eq!(pages.into_vec().concat(), kept);
});

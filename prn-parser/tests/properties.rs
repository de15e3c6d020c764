//! Property-based tests for the spool reader
//!
//! Inputs are assembled from PJL-shaped fragments (command lines, broken
//! prefixes, identifiers, end lines) mixed with arbitrary payload bytes so
//! the matcher's rollback paths are exercised, not just plain data.

use proptest::prelude::*;
use prn_parser::{SpoolReader, Token};

const START: &[u8] = b"\x1b%-12345X@PJL\r\n";

/// Payload bytes that can never start a control construct
fn payload() -> impl Strategy<Value = Vec<u8>> {
    let byte = any::<u8>().prop_filter("marker start", |b| *b != b'@' && *b != 0x1b);
    prop::collection::vec(byte, 1..48)
}

fn command_line() -> impl Strategy<Value = Vec<u8>> {
    "[ -~]{0,24}".prop_map(|text| [&b"@PJL"[..], text.as_bytes(), &b"\r\n"[..]].concat())
}

/// Fragments that look like PJL but are not
fn near_miss() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(b"@".to_vec()),
        Just(b"@PJ\x00".to_vec()),
        Just(b"@PJL\r".to_vec()),
        Just(b"@PJL SET\x07".to_vec()),
        Just(b"\x1b%-123".to_vec()),
        Just(b"\x1b%-12345X".to_vec()),
        Just(b"\x1b%-12345X\r".to_vec()),
    ]
}

fn fragment() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        4 => payload(),
        3 => command_line(),
        2 => near_miss(),
        1 => Just(b"\x1b%-12345X\r\n".to_vec()),
    ]
}

fn spool_body() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(fragment(), 0..24).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn tokens_reconstruct_input(body in spool_body(), framed in any::<bool>(), threshold in 0usize..4) {
        let input = if framed { [START, body.as_slice()].concat() } else { body };
        let reader = SpoolReader::new(threshold, b"\r\n").unwrap();

        let mut rebuilt = Vec::new();
        reader
            .read_with(input.as_slice(), None, |token| rebuilt.extend_from_slice(token.bytes()))
            .unwrap();

        prop_assert_eq!(rebuilt, input);
    }

    #[test]
    fn pages_are_the_data_tokens(body in spool_body(), threshold in 1usize..4) {
        let input = [START, body.as_slice()].concat();
        let reader = SpoolReader::new(threshold, b"\r\n").unwrap();

        let mut data = Vec::new();
        let mut page_lengths = Vec::new();
        let pages = reader
            .read_with(input.as_slice(), None, |token| match token {
                Token::Data(bytes) => data.extend_from_slice(bytes),
                Token::PageEnd { len, .. } => page_lengths.push(len),
                _ => {}
            })
            .unwrap();

        prop_assert_eq!(pages.iter().map(<[u8]>::len).collect::<Vec<_>>(), page_lengths);
        prop_assert!(pages.iter().all(|page| !page.is_empty()));
        prop_assert_eq!(pages.into_vec().concat(), data);
    }

    #[test]
    fn unframed_input_is_one_page(body in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assume!(!body.starts_with(START));
        let reader = SpoolReader::new(1, b"\r\n").unwrap();

        let pages = reader.read(body.as_slice()).unwrap();

        prop_assert_eq!(pages.into_vec(), vec![body]);
    }

    #[test]
    fn second_run_sets_the_boundary(
        threshold in 2usize..6,
        short_run in 1usize..6,
        first in payload(),
        second in payload(),
        line in command_line(),
    ) {
        let short_run = short_run.min(threshold - 1);
        let mut input = START.to_vec();
        for _ in 0..short_run {
            input.extend_from_slice(&line);
        }
        input.extend_from_slice(&first);
        for _ in 0..threshold {
            input.extend_from_slice(&line);
        }
        input.extend_from_slice(&second);

        let pages = SpoolReader::new(threshold, b"\r\n").unwrap().read(input.as_slice()).unwrap();

        prop_assert_eq!(pages.into_vec(), vec![first, second]);
    }

    #[test]
    fn broken_prefix_stays_in_page(before in payload(), after in payload()) {
        let input = [START, &before[..], &b"@PJ\x00"[..], &after[..]].concat();

        let pages = SpoolReader::new(1, b"\r\n").unwrap().read(input.as_slice()).unwrap();

        prop_assert_eq!(pages.into_vec(), vec![[&before[..], &b"@PJ\x00"[..], &after[..]].concat()]);
    }

    #[test]
    fn leading_run_adds_no_page(runs in 1usize..5, line in command_line(), body in payload()) {
        let mut input = START.to_vec();
        for _ in 0..runs {
            input.extend_from_slice(&line);
        }
        input.extend_from_slice(&body);

        let pages = SpoolReader::new(1, b"\r\n").unwrap().read(input.as_slice()).unwrap();

        prop_assert_eq!(pages.into_vec(), vec![body]);
    }
}

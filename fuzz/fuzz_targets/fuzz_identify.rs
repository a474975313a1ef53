//! Fuzz target for issuer lookup.
//!
//! Tests that identify() never panics and returns a consistent pair.

#![no_main]

use std::sync::OnceLock;

use cardvalidate::{Issuer, IssuerTable, Range};
use libfuzzer_sys::fuzz_target;

static TABLE: OnceLock<IssuerTable> = OnceLock::new();

fuzz_target!(|data: &str| {
    let table = TABLE.get_or_init(|| IssuerTable::default_table().unwrap());

    let (issuer, length) = table.identify(data);
    if issuer == Issuer::Unknown {
        assert_eq!(length, Range::EMPTY);
    } else {
        assert!(data.bytes().all(|b| b.is_ascii_digit()));
        assert!(!length.is_empty());
    }

    let card_issuer = table.identify_card(data);
    if card_issuer.is_known() {
        assert_eq!(card_issuer, issuer);
        assert!(length.contains(data.len() as u64));
    }
});

//! Fuzz target for card validation.
//!
//! Tests that the pipeline never panics and that every failure maps to a
//! stable error code.

#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use cardvalidate::{is_well_formed, ValidationError, Validator};
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    number: &'a str,
    exp_date: &'a str,
    now_secs: u32,
}

static VALIDATOR: OnceLock<Validator> = OnceLock::new();

fuzz_target!(|input: Input<'_>| {
    let validator = VALIDATOR.get_or_init(|| Validator::with_default_rules().unwrap());
    let now = Utc.timestamp_opt(i64::from(input.now_secs), 0).unwrap();

    match validator.validate_at(input.number, input.exp_date, now) {
        Ok(issuer) => {
            assert!(issuer.is_known());
            assert!(is_well_formed(input.number));
        }
        Err(ValidationError::MalformedNumber) => assert!(!is_well_formed(input.number)),
        Err(e) => {
            assert!(is_well_formed(input.number));
            assert!((2..=5).contains(&e.code()));
        }
    }
});

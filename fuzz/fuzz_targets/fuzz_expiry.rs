//! Fuzz target for expiry date parsing.
//!
//! Tests that expiry parsing never panics on arbitrary input.

#![no_main]

use cardvalidate::ExpiryDate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(exp) = ExpiryDate::parse(data) {
        assert!((1..=12).contains(&exp.month()));
        // Accepted input is exactly the canonical rendering.
        assert_eq!(exp.to_string(), data);
        let _ = exp.starts_at();
        let _ = exp.is_expired();
    }
});

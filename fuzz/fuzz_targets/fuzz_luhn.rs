//! Fuzz target for the mod-10 checksum.
//!
//! The digit-slice and ASCII entry points must agree, and a generated check
//! digit must always complete a passing number.

#![no_main]

use cardvalidate::luhn;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let ascii_digits = text.bytes().all(|b| b.is_ascii_digit());
        if !ascii_digits {
            assert!(!luhn::passes(text));
        }
    }

    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();
    let text: String = digits.iter().map(|&d| char::from(b'0' + d)).collect();
    assert_eq!(luhn::validate(&digits), luhn::passes(&text));
    assert_eq!(
        luhn::validate(&digits),
        !digits.is_empty() && luhn::compute_checksum(&digits) % 10 == 0
    );

    if let Some((_, body)) = digits.split_last() {
        let check = luhn::generate_check_digit(body);
        let mut completed = body.to_vec();
        completed.push(check);
        assert!(check <= 9 && luhn::validate(&completed));
    }
});

//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold for all inputs,
//! helping discover edge cases that manual tests might miss.

use cardvalidate::{
    is_well_formed, luhn, mask, ExpiryDate, Issuer, IssuerRule, IssuerTable, ValidationError,
    Validator, DEFAULT_RULES,
};
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 20, 0, 0, 0).unwrap()
}

/// Generates a random digit string of a given length.
fn digit_string(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::char::range('0', '9'), len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generates a random digit string of a length within range.
fn digit_string_range(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
    range.prop_flat_map(digit_string)
}

/// Appends the Luhn check digit to a digit string.
fn with_check_digit(body: &str) -> String {
    let digits: Vec<u8> = body.bytes().map(|b| b - b'0').collect();
    format!("{}{}", body, luhn::generate_check_digit(&digits))
}

/// Picks a default rule, one of its prefixes and one of its lengths, then
/// fills the rest with random digits and a valid check digit.
fn valid_card_strategy() -> impl Strategy<Value = (IssuerRule, String)> {
    prop::sample::select(DEFAULT_RULES.to_vec()).prop_flat_map(|rule| {
        (
            Just(rule),
            rule.prefix.iter(),
            rule.length.iter(),
            digit_string(19),
        )
            .prop_map(|(rule, prefix, length, fill)| {
                let prefix = prefix.to_string();
                let body_len = length as usize - prefix.len() - 1;
                let body = format!("{}{}", prefix, &fill[..body_len]);
                (rule, with_check_digit(&body))
            })
    })
}

/// Expiration dates strictly after `now()`.
fn future_date() -> impl Strategy<Value = String> {
    prop_oneof![
        (9u8..=12u8).prop_map(|m| format!("{:02}/2024", m)),
        (1u8..=12u8, 2025u16..=9999u16).prop_map(|(m, y)| format!("{:02}/{}", m, y)),
    ]
}

/// Expiration dates at or before `now()`.
fn past_date() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u8..=8u8).prop_map(|m| format!("{:02}/2024", m)),
        (1u8..=12u8, 0u16..=2023u16).prop_map(|(m, y)| format!("{:02}/{:04}", m, y)),
    ]
}

// =============================================================================
// LUHN PROPERTIES
// =============================================================================

proptest! {
    /// The generated check digit always completes a valid number.
    #[test]
    fn check_digit_makes_valid(body in digit_string_range(1..=18)) {
        prop_assert!(luhn::passes(&with_check_digit(&body)));
    }

    /// Changing any single digit breaks the checksum.
    #[test]
    fn single_digit_change_invalidates_luhn(
        body in digit_string_range(7..=18),
        pos in any::<prop::sample::Index>(),
        delta in 1u8..=9u8,
    ) {
        let card = with_check_digit(&body);
        let mut bytes = card.into_bytes();
        let i = pos.index(bytes.len());
        bytes[i] = b'0' + (bytes[i] - b'0' + delta) % 10;
        let changed = String::from_utf8(bytes).unwrap();
        prop_assert!(!luhn::passes(&changed));
    }

    /// Leading zeros do not change the checksum.
    #[test]
    fn leading_zeros_preserve_luhn(card in digit_string_range(1..=15), zeros in 1usize..=4) {
        let padded = format!("{}{}", "0".repeat(zeros), card);
        prop_assert_eq!(luhn::passes(&card), luhn::passes(&padded));
    }

    #[test]
    fn all_zeros_passes_luhn(len in 1usize..=19usize) {
        prop_assert!(luhn::passes(&"0".repeat(len)));
    }

    #[test]
    fn luhn_rejects_non_digits(input in ".*[^0-9].*") {
        prop_assert!(!luhn::passes(&input));
    }
}

// =============================================================================
// VALIDATION PROPERTIES
// =============================================================================

proptest! {
    /// Cards built from any default rule validate to that rule's issuer.
    #[test]
    fn generated_cards_validate((rule, card) in valid_card_strategy(), date in future_date()) {
        let v = Validator::with_default_rules().unwrap();
        prop_assert_eq!(v.validate_at(&card, &date, now()), Ok(rule.issuer));
    }

    /// The same cards are rejected once the date has passed.
    #[test]
    fn generated_cards_expire((_rule, card) in valid_card_strategy(), date in past_date()) {
        let v = Validator::with_default_rules().unwrap();
        prop_assert_eq!(v.validate_at(&card, &date, now()), Err(ValidationError::CardExpired));
    }

    /// Numbers outside 8-19 digits fail structure before anything else.
    #[test]
    fn wrong_length_is_malformed(
        card in prop_oneof![digit_string_range(0..=7), digit_string_range(20..=40)],
        date in ".*",
    ) {
        let v = Validator::with_default_rules().unwrap();
        prop_assert_eq!(
            v.validate_at(&card, &date, now()),
            Err(ValidationError::MalformedNumber)
        );
    }

    /// Any non-digit character makes the number malformed.
    #[test]
    fn non_digit_is_malformed(
        head in digit_string_range(0..=9),
        bad in "[^0-9]",
        tail in digit_string_range(0..=9),
    ) {
        let card = format!("{}{}{}", head, bad, tail);
        prop_assert!(!is_well_formed(&card));
        let v = Validator::with_default_rules().unwrap();
        prop_assert_eq!(
            v.validate_at(&card, "12/2099", now()),
            Err(ValidationError::MalformedNumber)
        );
    }

    /// Prefixes 0, 1, 7, 8 and 9 belong to no default issuer.
    #[test]
    fn unassigned_prefix_is_unknown(
        first in prop::sample::select(vec!['0', '1', '7', '8', '9']),
        rest in digit_string_range(7..=18),
    ) {
        let card = format!("{}{}", first, rest);
        let v = Validator::with_default_rules().unwrap();
        prop_assert_eq!(
            v.validate_at(&card, "12/2099", now()),
            Err(ValidationError::UnknownIssuer)
        );
    }

    /// Validation is a pure function of its inputs.
    #[test]
    fn validation_is_deterministic(card in "[0-9]{0,20}", date in "[0-9/]{0,8}") {
        let v = Validator::with_default_rules().unwrap();
        prop_assert_eq!(v.validate_at(&card, &date, now()), v.validate_at(&card, &date, now()));
    }

    #[test]
    fn validate_never_panics(card in ".*", date in ".*") {
        let v = Validator::with_default_rules().unwrap();
        let _ = v.validate_at(&card, &date, now());
    }

    /// identify never returns a known issuer with an empty length range.
    #[test]
    fn identify_is_consistent(card in digit_string_range(0..=20)) {
        let table = IssuerTable::default_table().unwrap();
        let (issuer, length) = table.identify(&card);
        prop_assert_eq!(issuer.is_known(), !length.is_empty());
        if issuer == Issuer::Unknown {
            prop_assert_eq!(table.identify_card(&card), Issuer::Unknown);
        }
    }
}

// =============================================================================
// EXPIRY PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn valid_month_parses(month in 1u8..=12u8, year in 0u16..=9999u16) {
        let text = format!("{:02}/{:04}", month, year);
        let date = ExpiryDate::parse(&text).unwrap();
        prop_assert_eq!(date.month(), month);
        prop_assert_eq!(date.year(), year);
        prop_assert_eq!(date.to_string(), text);
    }

    #[test]
    fn invalid_month_rejected(month in prop_oneof![Just(0u8), 13u8..=99u8], year in 0u16..=9999u16) {
        let text = format!("{:02}/{:04}", month, year);
        prop_assert!(ExpiryDate::parse(&text).is_err());
    }

    /// Once a date is expired it stays expired as time moves forward.
    #[test]
    fn expiry_is_monotonic(
        month in 1u8..=12u8,
        year in 1970u16..=2100u16,
        t in 0i64..=4_102_444_800i64,
        step in 0i64..=1_000_000_000i64,
    ) {
        let date = ExpiryDate::new(month, year).unwrap();
        let earlier = Utc.timestamp_opt(t, 0).unwrap();
        let later = Utc.timestamp_opt(t + step, 0).unwrap();
        if date.is_expired_at(earlier) {
            prop_assert!(date.is_expired_at(later));
        }
    }

    /// Dates order the same way as their instants.
    #[test]
    fn expiry_order_matches_instants(
        a in (1u8..=12u8, 0u16..=9999u16),
        b in (1u8..=12u8, 0u16..=9999u16),
    ) {
        let a = ExpiryDate::new(a.0, a.1).unwrap();
        let b = ExpiryDate::new(b.0, b.1).unwrap();
        prop_assert_eq!(a.cmp(&b), a.starts_at().cmp(&b.starts_at()));
    }
}

// =============================================================================
// MASKING PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn masked_never_exposes_full_number(card in digit_string_range(8..=19)) {
        let masked = mask::mask_number(&card);
        prop_assert_ne!(&masked, &card);
        prop_assert_eq!(masked.len(), card.len());
        prop_assert!(masked.ends_with(&card[card.len() - 4..]));
    }
}

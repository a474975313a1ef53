//! Validation pipeline for a card number and its expiration date.
//!
//! Stages run strictly in order and the first failure wins:
//!
//! 1. Structure: 8-19 ASCII digits, otherwise [`ValidationError::MalformedNumber`]
//! 2. Issuer: prefix and length match a rule, otherwise [`ValidationError::UnknownIssuer`]
//! 3. Luhn checksum, otherwise [`ValidationError::InvalidAccountNumber`]
//! 4. `MM/YYYY` expiration, otherwise [`ValidationError::MalformedDate`]
//! 5. Expiration strictly after the reference time, otherwise [`ValidationError::CardExpired`]
//!
//! The reference time is an explicit argument of [`Validator::validate_at`],
//! which makes the pipeline a pure function of its inputs.
//! [`Validator::validate`] supplies the current UTC time.

use crate::error::{TableError, ValidationError};
use crate::expiry::ExpiryDate;
use crate::issuer::Issuer;
use crate::luhn;
use crate::range::Range;
use crate::table::IssuerTable;
use chrono::{DateTime, Utc};

/// Minimum number of digits in a card number.
pub const MIN_CARD_DIGITS: usize = 8;

/// Maximum number of digits in a card number.
pub const MAX_CARD_DIGITS: usize = 19;

/// Result of a validation call: the identified issuer, or the first failure.
pub type ValidationOutcome = Result<Issuer, ValidationError>;

/// Validates cards against an issuer table.
///
/// The table is injected at construction and never mutated, so a single
/// `Validator` can serve any number of threads.
///
/// # Example
///
/// ```
/// use cardvalidate::{Issuer, ValidationError, Validator};
/// use chrono::{TimeZone, Utc};
///
/// let validator = Validator::with_default_rules().unwrap();
/// let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
///
/// assert_eq!(validator.validate_at("4111111111111111", "04/2025", now), Ok(Issuer::Visa));
/// assert_eq!(
///     validator.validate_at("4111111111111111", "03/2025", now),
///     Err(ValidationError::CardExpired)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    table: IssuerTable,
}

impl Validator {
    /// Creates a validator over the given table.
    pub fn new(table: IssuerTable) -> Self {
        Self { table }
    }

    /// Creates a validator over the built-in rule table.
    pub fn with_default_rules() -> Result<Self, TableError> {
        IssuerTable::default_table().map(Self::new)
    }

    /// Returns the issuer table.
    #[inline]
    pub fn table(&self) -> &IssuerTable {
        &self.table
    }

    /// Identifies the issuer of a card number.
    ///
    /// See [`IssuerTable::identify`].
    #[inline]
    pub fn identify(&self, card_number: &str) -> (Issuer, Range) {
        self.table.identify(card_number)
    }

    /// Validates a card against the current UTC time.
    pub fn validate(&self, card_number: &str, expiration_date: &str) -> ValidationOutcome {
        self.validate_at(card_number, expiration_date, Utc::now())
    }

    /// Validates a card against an explicit reference time.
    pub fn validate_at(
        &self,
        card_number: &str,
        expiration_date: &str,
        now: DateTime<Utc>,
    ) -> ValidationOutcome {
        if !is_well_formed(card_number) {
            return Err(ValidationError::MalformedNumber);
        }

        let issuer = self.table.identify_card(card_number);
        if !issuer.is_known() {
            return Err(ValidationError::UnknownIssuer);
        }

        if !luhn::passes(card_number) {
            return Err(ValidationError::InvalidAccountNumber);
        }

        let expiry =
            ExpiryDate::parse(expiration_date).map_err(|_| ValidationError::MalformedDate)?;

        if expiry.is_expired_at(now) {
            return Err(ValidationError::CardExpired);
        }

        Ok(issuer)
    }
}

/// Checks that a card number is 8-19 ASCII digits.
#[inline]
pub fn is_well_formed(card_number: &str) -> bool {
    (MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&card_number.len())
        && card_number.bytes().all(|b| b.is_ascii_digit())
}

//! Error types for card validation and issuer table construction.
//!
//! [`ValidationError`] is the closed set of per-call validation failures.
//! [`TableError`] signals a corrupt rule table and is raised only while an
//! [`IssuerTable`](crate::IssuerTable) is being built.

use crate::issuer::Issuer;
use crate::range::Range;
use crate::validate::{MAX_CARD_DIGITS, MIN_CARD_DIGITS};
use std::fmt;

/// Reasons a card fails validation.
///
/// Exactly one kind is produced per call: the pipeline stops at the first
/// failing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    /// The number is not 8-19 ASCII digits.
    MalformedNumber,

    /// No issuer rule matches the number's prefix and length.
    UnknownIssuer,

    /// The Luhn checksum failed.
    InvalidAccountNumber,

    /// The expiration date is not a `MM/YYYY` month.
    MalformedDate,

    /// The expiration month has started (or passed) at the reference time.
    CardExpired,
}

impl ValidationError {
    /// All failure kinds, in pipeline order.
    pub const ALL: [ValidationError; 5] = [
        Self::MalformedNumber,
        Self::UnknownIssuer,
        Self::InvalidAccountNumber,
        Self::MalformedDate,
        Self::CardExpired,
    ];

    /// Machine-readable error code.
    ///
    /// `0` is never returned; it is left for transport-level failures such
    /// as an undecodable request.
    #[inline]
    pub const fn code(&self) -> u8 {
        match self {
            Self::MalformedNumber => 1,
            Self::UnknownIssuer => 2,
            Self::InvalidAccountNumber => 3,
            Self::MalformedDate => 4,
            Self::CardExpired => 5,
        }
    }

    /// Short user-facing message.
    #[inline]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MalformedNumber => "Malformed credit card number",
            Self::UnknownIssuer => "Unknown IIN",
            Self::InvalidAccountNumber => "Invalid account number",
            Self::MalformedDate => "Malformed expiration date",
            Self::CardExpired => "Credit card has expired",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedNumber => {
                write!(f, "malformed card number (expected 8-19 digits)")
            }
            Self::UnknownIssuer => write!(f, "unknown card issuer"),
            Self::InvalidAccountNumber => {
                write!(f, "invalid account number (Luhn check failed)")
            }
            Self::MalformedDate => {
                write!(f, "malformed expiration date (expected MM/YYYY)")
            }
            Self::CardExpired => write!(f, "credit card has expired"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while building an issuer table.
///
/// These indicate a broken rule set, never bad user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Two rules register the same prefix.
    DuplicatePrefix {
        /// The prefix, as decimal digits.
        prefix: String,
        /// Issuer already registered at this prefix.
        existing: Issuer,
        /// Issuer of the rule that collided.
        conflicting: Issuer,
    },

    /// A rule range has `start > end`.
    InvalidRange {
        /// Issuer of the offending rule.
        issuer: Issuer,
        /// The offending range.
        range: Range,
    },

    /// A rule attaches `Issuer::Unknown`.
    UnknownIssuerRule {
        /// Prefix range of the offending rule.
        prefix: Range,
    },

    /// A length range reaches outside the accepted card number lengths.
    LengthOutOfBounds {
        /// Issuer of the offending rule.
        issuer: Issuer,
        /// The offending length range.
        length: Range,
    },

    /// A prefix has more digits than the longest number the rule accepts.
    PrefixTooLong {
        /// Issuer of the offending rule.
        issuer: Issuer,
        /// The longest prefix in the rule.
        prefix: u64,
        /// Upper bound of the rule's length range.
        max_length: u64,
    },

    /// A prefix range expands to more terminals than one rule may add.
    PrefixRangeTooLarge {
        /// Issuer of the offending rule.
        issuer: Issuer,
        /// The offending prefix range.
        range: Range,
        /// Maximum number of prefixes per rule.
        limit: u64,
    },

    /// The node arena outgrew its index type.
    CapacityExceeded,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePrefix {
                prefix,
                existing,
                conflicting,
            } => write!(
                f,
                "duplicate IIN prefix {}: already registered to {}, also claimed by {}",
                prefix, existing, conflicting
            ),
            Self::InvalidRange { issuer, range } => write!(
                f,
                "invalid range for {}: start {} is greater than end {}",
                issuer, range.start, range.end
            ),
            Self::UnknownIssuerRule { prefix } => {
                write!(f, "rule for prefix {} has no issuer", prefix)
            }
            Self::LengthOutOfBounds { issuer, length } => write!(
                f,
                "length range {} for {} is outside [{}-{}]",
                length, issuer, MIN_CARD_DIGITS, MAX_CARD_DIGITS
            ),
            Self::PrefixTooLong {
                issuer,
                prefix,
                max_length,
            } => write!(
                f,
                "prefix {} for {} is longer than its maximum card length {}",
                prefix, issuer, max_length
            ),
            Self::PrefixRangeTooLarge {
                issuer,
                range,
                limit,
            } => write!(
                f,
                "prefix range {} for {} expands to more than {} prefixes",
                range, issuer, limit
            ),
            Self::CapacityExceeded => write!(f, "issuer table is too large"),
        }
    }
}

impl std::error::Error for TableError {}

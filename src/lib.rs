//! # cardvalidate
//!
//! Credit card validation: structure, issuer (IIN) identification, Luhn
//! checksum and expiration date.
//!
//! Only plausibility is checked. Nothing here contacts a payment network or
//! tells whether an account exists.
//!
//! ## Quick Start
//!
//! ```rust
//! use cardvalidate::{Issuer, ValidationError, Validator};
//!
//! // Build the issuer table once at startup and share the validator.
//! let validator = Validator::with_default_rules().unwrap();
//!
//! assert_eq!(validator.validate("4111111111111111", "12/2099"), Ok(Issuer::Visa));
//! assert_eq!(
//!     validator.validate("4111111111111121", "12/2099"),
//!     Err(ValidationError::InvalidAccountNumber)
//! );
//! assert_eq!(
//!     validator.validate("4111111111111111", "13/2099"),
//!     Err(ValidationError::MalformedDate)
//! );
//! ```
//!
//! ## Issuer Identification
//!
//! ```rust
//! use cardvalidate::{Issuer, IssuerRule, IssuerTable, Range};
//!
//! let table = IssuerTable::default_table().unwrap();
//! assert_eq!(table.identify("6011111111111117"), (Issuer::Discover, Range::single(16)));
//!
//! // Custom rule sets are built the same way.
//! let rules = [IssuerRule::new(Issuer::Jcb, Range::new(3528, 3589), Range::single(16))];
//! let table = IssuerTable::build(&rules).unwrap();
//! assert_eq!(table.identify("3530111333300000").0, Issuer::Jcb);
//! ```
//!
//! ## Validation Stages
//!
//! | Stage | Failure |
//! |-------|---------|
//! | 8-19 ASCII digits | `MalformedNumber` |
//! | IIN prefix and length | `UnknownIssuer` |
//! | Luhn checksum | `InvalidAccountNumber` |
//! | `MM/YYYY` date | `MalformedDate` |
//! | date after reference time | `CardExpired` |
//!
//! ## Supported Issuers
//!
//! | Issuer | Prefix | Length |
//! |--------|--------|--------|
//! | American Express | 34, 37 | 15 |
//! | Diners Club | 30, 36, 38, 39 | 14 |
//! | Discover | 6011, 644-649, 65 | 16 |
//! | JCB | 3528-3589 | 16 |
//! | MasterCard | 51-55, 2221-2720 | 16 |
//! | UnionPay | 62 | 13-19 |
//! | Visa | 4 | 16 |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rules-json` | Load issuer rules from JSON |
//! | `cli` | Command-line tool |
//! | `server` | REST API with Swagger UI |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod error;
pub mod expiry;
pub mod issuer;
pub mod luhn;
pub mod mask;
pub mod range;
#[cfg(feature = "rules-json")]
pub mod rules_json;
pub mod table;
pub mod validate;

// Re-export main types at crate root
pub use error::{TableError, ValidationError};
pub use expiry::ExpiryDate;
pub use issuer::{Issuer, IssuerRule, DEFAULT_RULES};
pub use range::Range;
pub use table::{IssuerTable, MAX_PREFIXES_PER_RULE};
pub use validate::{
    is_well_formed, ValidationOutcome, Validator, MAX_CARD_DIGITS, MIN_CARD_DIGITS,
};

//! Card issuers and the static IIN rule table.
//!
//! An [`IssuerRule`] says: card numbers whose leading digits fall in
//! `prefix` belong to `issuer`, and valid numbers of that issuer have a total
//! length in `length`. [`DEFAULT_RULES`] lists the networks recognised out of
//! the box.

use crate::range::Range;
use std::fmt;
use std::str::FromStr;

/// Card issuing network.
///
/// `Unknown` is the default and is never attached to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "rules-json",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Issuer {
    /// No known issuer matched.
    #[default]
    Unknown,
    /// American Express - Prefix 34, 37, length 15
    AmericanExpress,
    /// Diners Club - Prefix 30, 36, 38, 39, length 14
    DinersClub,
    /// Discover - Prefix 6011, 644-649, 65, length 16
    Discover,
    /// JCB - Prefix 3528-3589, length 16
    Jcb,
    /// MasterCard - Prefix 51-55, 2221-2720, length 16
    MasterCard,
    /// UnionPay - Prefix 62, length 13-19
    UnionPay,
    /// Visa - Prefix 4, length 16
    Visa,
}

impl Issuer {
    /// Every issuer that may appear in a rule.
    pub const KNOWN: [Issuer; 7] = [
        Self::AmericanExpress,
        Self::DinersClub,
        Self::Discover,
        Self::Jcb,
        Self::MasterCard,
        Self::UnionPay,
        Self::Visa,
    ];

    /// Returns a human-readable name for the issuer.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::AmericanExpress => "American Express",
            Self::DinersClub => "Diners Club",
            Self::Discover => "Discover",
            Self::Jcb => "JCB",
            Self::MasterCard => "MasterCard",
            Self::UnionPay => "UnionPay",
            Self::Visa => "Visa",
        }
    }

    /// Returns the snake_case identifier used in rule files and on the CLI.
    #[inline]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::AmericanExpress => "american_express",
            Self::DinersClub => "diners_club",
            Self::Discover => "discover",
            Self::Jcb => "jcb",
            Self::MasterCard => "master_card",
            Self::UnionPay => "union_pay",
            Self::Visa => "visa",
        }
    }

    /// Returns true for every issuer except `Unknown`.
    #[inline]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssuerError(pub String);

impl fmt::Display for ParseIssuerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown issuer name '{}'", self.0)
    }
}

impl std::error::Error for ParseIssuerError {}

impl FromStr for Issuer {
    type Err = ParseIssuerError;

    /// Accepts the snake_case id or the display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        std::iter::once(Self::Unknown)
            .chain(Self::KNOWN)
            .find(|i| i.id().eq_ignore_ascii_case(wanted) || i.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseIssuerError(s.to_string()))
    }
}

/// A static IIN fact: numbers starting with a value in `prefix` belong to
/// `issuer` and must be `length` digits long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rules-json", derive(serde::Serialize, serde::Deserialize))]
pub struct IssuerRule {
    /// The issuing network.
    pub issuer: Issuer,
    /// IIN range. Each value is inserted using its decimal rendering.
    pub prefix: Range,
    /// Allowed total card number lengths.
    pub length: Range,
}

impl IssuerRule {
    /// Creates a new rule.
    #[inline]
    pub const fn new(issuer: Issuer, prefix: Range, length: Range) -> Self {
        Self {
            issuer,
            prefix,
            length,
        }
    }
}

/// The built-in IIN table.
pub const DEFAULT_RULES: &[IssuerRule] = &[
    IssuerRule::new(Issuer::AmericanExpress, Range::single(34), Range::single(15)),
    IssuerRule::new(Issuer::AmericanExpress, Range::single(37), Range::single(15)),
    IssuerRule::new(Issuer::DinersClub, Range::single(30), Range::single(14)),
    IssuerRule::new(Issuer::DinersClub, Range::single(36), Range::single(14)),
    IssuerRule::new(Issuer::DinersClub, Range::single(38), Range::single(14)),
    IssuerRule::new(Issuer::DinersClub, Range::single(39), Range::single(14)),
    IssuerRule::new(Issuer::Discover, Range::single(6011), Range::single(16)),
    IssuerRule::new(Issuer::Discover, Range::new(644, 649), Range::single(16)),
    IssuerRule::new(Issuer::Discover, Range::single(65), Range::single(16)),
    IssuerRule::new(Issuer::Jcb, Range::new(3528, 3589), Range::single(16)),
    IssuerRule::new(Issuer::MasterCard, Range::new(51, 55), Range::single(16)),
    IssuerRule::new(Issuer::MasterCard, Range::new(2221, 2720), Range::single(16)),
    IssuerRule::new(Issuer::UnionPay, Range::single(62), Range::new(13, 19)),
    IssuerRule::new(Issuer::Visa, Range::single(4), Range::single(16)),
];

//! Closed numeric intervals.
//!
//! Used both for IIN prefix ranges (`2221..=2720`) and for the valid card
//! number lengths of an issuer (`13..=19`).

use std::fmt;

/// A closed interval `start..=end` of unsigned integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "rules-json", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// Start of the range (inclusive).
    pub start: u64,
    /// End of the range (inclusive).
    pub end: u64,
}

impl Range {
    /// The empty range returned when a lookup matches nothing.
    ///
    /// This is the only range with `start > end`; it contains no value.
    pub const EMPTY: Range = Range { start: 1, end: 0 };

    /// Creates a new range.
    ///
    /// `start <= end` is checked when the range is inserted into an
    /// [`IssuerTable`](crate::IssuerTable), not here, so that rule tables can
    /// be declared as constants.
    #[inline]
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Creates a range holding a single value.
    #[inline]
    pub const fn single(value: u64) -> Self {
        Self {
            start: value,
            end: value,
        }
    }

    /// Checks if `n` falls within this range.
    #[inline]
    pub const fn contains(&self, n: u64) -> bool {
        self.start <= n && n <= self.end
    }

    /// Returns true if the range contains no value.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Iterates over every value in the range.
    pub fn iter(&self) -> std::ops::RangeInclusive<u64> {
        self.start..=self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else if self.start == self.end {
            write!(f, "[{}]", self.start)
        } else {
            write!(f, "[{}-{}]", self.start, self.end)
        }
    }
}

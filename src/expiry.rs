//! Card expiration dates.
//!
//! Dates are written `MM/YYYY`: exactly two month digits, a slash and
//! exactly four year digits. The date denotes the first instant (UTC) of that
//! month, and a card is expired once that instant is reached.
//!
//! # Example
//!
//! ```
//! use cardvalidate::expiry::ExpiryDate;
//! use chrono::{TimeZone, Utc};
//!
//! let expiry: ExpiryDate = "07/2030".parse().unwrap();
//! assert_eq!(expiry.month(), 7);
//! assert_eq!(expiry.year(), 2030);
//!
//! let now = Utc.with_ymd_and_hms(2030, 6, 30, 23, 59, 59).unwrap();
//! assert!(!expiry.is_expired_at(now));
//! let now = Utc.with_ymd_and_hms(2030, 7, 1, 0, 0, 0).unwrap();
//! assert!(expiry.is_expired_at(now));
//! ```

use chrono::{DateTime, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// A parsed `MM/YYYY` expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpiryDate {
    // Field order gives chronological ordering.
    year: u16,
    month: u8,
}

impl ExpiryDate {
    /// Creates a new expiry date.
    ///
    /// Returns `None` if the month is not 1-12 or the year exceeds 9999.
    pub fn new(month: u8, year: u16) -> Option<Self> {
        if !(1..=12).contains(&month) || year > 9999 {
            return None;
        }
        Some(Self { year, month })
    }

    /// Parses a strict `MM/YYYY` string.
    ///
    /// No whitespace, sign or other separator is accepted.
    pub fn parse(input: &str) -> Result<Self, ExpiryError> {
        let bytes = input.as_bytes();
        if bytes.len() != 7 || bytes[2] != b'/' {
            return Err(ExpiryError::InvalidFormat);
        }

        let month = parse_digits(&bytes[..2]).ok_or(ExpiryError::InvalidFormat)?;
        let year = parse_digits(&bytes[3..]).ok_or(ExpiryError::InvalidFormat)?;

        let month = month as u8;
        if !(1..=12).contains(&month) {
            return Err(ExpiryError::InvalidMonth(month));
        }

        Ok(Self {
            year: year as u16,
            month,
        })
    }

    /// Returns the month (1-12).
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the four-digit year.
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// The first instant of the expiration month, in UTC.
    pub fn starts_at(&self) -> DateTime<Utc> {
        // Every 1..=12 month of years 0..=9999 has a first day at midnight UTC.
        Utc.with_ymd_and_hms(self.year as i32, self.month as u32, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns true once `now` has reached the start of the expiration month.
    ///
    /// Equality counts as expired.
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.starts_at() <= now
    }

    /// Returns true if the card has expired at the current wall-clock time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Parses ASCII digits into a number, rejecting anything else.
fn parse_digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + (b - b'0') as u32)
    })
}

impl FromStr for ExpiryDate {
    type Err = ExpiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

/// Errors that can occur while parsing an expiry date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    /// Not of the form `MM/YYYY`.
    InvalidFormat,
    /// Month is out of range (must be 1-12).
    InvalidMonth(u8),
}

impl fmt::Display for ExpiryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid expiry format (expected MM/YYYY)"),
            Self::InvalidMonth(m) => write!(f, "invalid month {}: must be 1-12", m),
        }
    }
}

impl std::error::Error for ExpiryError {}

//! JSON issuer rule files.
//!
//! Replaces the built-in IIN table with rules read from JSON.
//!
//! # Feature
//!
//! Requires the `rules-json` feature.
//!
//! # Format
//!
//! An array of rules. Ranges are a number, a `"start-end"` string or an
//! object with `start` and `end`:
//!
//! ```json
//! [
//!   { "issuer": "visa", "prefix": 4, "length": 16 },
//!   { "issuer": "master_card", "prefix": "2221-2720", "length": "16" },
//!   { "network": "UnionPay", "prefix": 62, "length": { "start": 13, "end": 19 } }
//! ]
//! ```

use crate::error::TableError;
use crate::issuer::{Issuer, IssuerRule};
use crate::range::Range;
use crate::table::IssuerTable;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Loader for JSON rule files.
pub struct RulesLoader;

impl RulesLoader {
    /// Reads rules from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<IssuerRule>, RulesError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Reads rules from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Vec<IssuerRule>, RulesError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Parses rules from a JSON string.
    pub fn parse(json: &str) -> Result<Vec<IssuerRule>, RulesError> {
        let entries: Vec<JsonRule> = serde_json::from_str(json)
            .map_err(|e| RulesError::ParseError(format!("JSON parse error: {}", e)))?;

        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .into_rule()
                    .map_err(|msg| RulesError::ParseError(format!("rule {}: {}", i, msg)))
            })
            .collect()
    }

    /// Reads a JSON file and builds an [`IssuerTable`] from it.
    pub fn load_table<P: AsRef<Path>>(path: P) -> Result<IssuerTable, RulesError> {
        let rules = Self::from_file(path)?;
        Ok(IssuerTable::build(&rules)?)
    }

    /// Serialises rules back to pretty-printed JSON.
    pub fn to_json(rules: &[IssuerRule]) -> Result<String, RulesError> {
        serde_json::to_string_pretty(rules)
            .map_err(|e| RulesError::ParseError(format!("JSON encode error: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct JsonRule {
    #[serde(alias = "network", alias = "brand")]
    issuer: String,
    #[serde(alias = "iin")]
    prefix: JsonRange,
    #[serde(alias = "lengths")]
    length: JsonRange,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonRange {
    Single(u64),
    Text(String),
    Bounds { start: u64, end: u64 },
}

impl JsonRule {
    fn into_rule(self) -> Result<IssuerRule, String> {
        let issuer: Issuer = self.issuer.parse().map_err(|e| format!("{}", e))?;
        Ok(IssuerRule::new(
            issuer,
            self.prefix.into_range()?,
            self.length.into_range()?,
        ))
    }
}

impl JsonRange {
    fn into_range(self) -> Result<Range, String> {
        match self {
            Self::Single(n) => Ok(Range::single(n)),
            Self::Bounds { start, end } => Ok(Range::new(start, end)),
            Self::Text(text) => parse_range_text(&text),
        }
    }
}

/// Parses `"34"` or `"2221-2720"`.
fn parse_range_text(text: &str) -> Result<Range, String> {
    let parse = |s: &str| {
        s.trim()
            .parse::<u64>()
            .map_err(|_| format!("invalid range '{}'", text))
    };

    match text.split_once('-') {
        Some((start, end)) => Ok(Range::new(parse(start)?, parse(end)?)),
        None => parse(text).map(Range::single),
    }
}

/// Error type for rule file loading.
#[derive(Debug)]
pub enum RulesError {
    /// Failed to read the rule file.
    IoError(std::io::Error),
    /// Failed to parse the rule file.
    ParseError(String),
    /// The rules are inconsistent.
    Table(TableError),
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {}", e),
            Self::ParseError(s) => write!(f, "Parse error: {}", s),
            Self::Table(e) => write!(f, "Invalid rule table: {}", e),
        }
    }
}

impl std::error::Error for RulesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(e) => Some(e),
            Self::Table(e) => Some(e),
            Self::ParseError(_) => None,
        }
    }
}

impl From<std::io::Error> for RulesError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

impl From<TableError> for RulesError {
    fn from(err: TableError) -> Self {
        Self::Table(err)
    }
}

//! IIN lookup table: a radix-10 prefix tree over card number digits.
//!
//! Nodes live in a flat arena and each node owns a fixed array of ten child
//! slots indexed by digit value. A node may carry a terminal
//! `(issuer, length range)` pair.
//!
//! # Lookup
//!
//! [`IssuerTable::identify`] walks the tree one digit at a time and stops at
//! the *first* terminal it reaches. A longer prefix registered below a
//! shorter one is therefore never returned.
//!
//! # Example
//!
//! ```
//! use cardvalidate::{Issuer, IssuerTable, Range};
//!
//! let table = IssuerTable::default_table().unwrap();
//! assert_eq!(
//!     table.identify("4111111111111111"),
//!     (Issuer::Visa, Range::single(16))
//! );
//! assert_eq!(table.identify("9999999999999999"), (Issuer::Unknown, Range::EMPTY));
//! ```

use crate::error::TableError;
use crate::issuer::{Issuer, IssuerRule, DEFAULT_RULES};
use crate::range::Range;
use crate::validate::{MAX_CARD_DIGITS, MIN_CARD_DIGITS};

/// Maximum number of prefixes a single rule's range may expand to.
pub const MAX_PREFIXES_PER_RULE: u64 = 100_000;

/// Index of a node in the arena.
type NodeId = u32;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default)]
struct Node {
    children: [Option<NodeId>; 10],
    terminal: Option<(Issuer, Range)>,
}

/// Immutable prefix tree mapping IIN prefixes to issuers.
///
/// Built once with [`IssuerTable::build`] and read-only afterwards, so it can
/// be shared between threads freely.
#[derive(Debug, Clone)]
pub struct IssuerTable {
    nodes: Vec<Node>,
    terminals: usize,
}

impl IssuerTable {
    /// Builds a table from an ordered list of rules.
    ///
    /// Every value of each rule's prefix range is rendered as decimal digits
    /// and inserted as a terminal.
    ///
    /// # Errors
    ///
    /// - [`TableError::UnknownIssuerRule`] if a rule names `Issuer::Unknown`
    /// - [`TableError::InvalidRange`] if a prefix or length range is reversed
    /// - [`TableError::LengthOutOfBounds`] if lengths leave 8-19 digits
    /// - [`TableError::PrefixTooLong`] if a prefix is longer than the rule's
    ///   longest accepted number
    /// - [`TableError::PrefixRangeTooLarge`] if a prefix range covers more
    ///   than [`MAX_PREFIXES_PER_RULE`] values
    /// - [`TableError::DuplicatePrefix`] if a prefix is registered twice
    pub fn build<'a, I>(rules: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = &'a IssuerRule>,
    {
        let mut table = Self {
            nodes: vec![Node::default()],
            terminals: 0,
        };

        for rule in rules {
            table.insert_rule(rule)?;
        }

        Ok(table)
    }

    /// Builds the table for [`DEFAULT_RULES`].
    pub fn default_table() -> Result<Self, TableError> {
        Self::build(DEFAULT_RULES)
    }

    fn insert_rule(&mut self, rule: &IssuerRule) -> Result<(), TableError> {
        if !rule.issuer.is_known() {
            return Err(TableError::UnknownIssuerRule {
                prefix: rule.prefix,
            });
        }
        for range in [rule.prefix, rule.length] {
            if range.is_empty() {
                return Err(TableError::InvalidRange {
                    issuer: rule.issuer,
                    range,
                });
            }
        }

        let lengths = MIN_CARD_DIGITS as u64..=MAX_CARD_DIGITS as u64;
        if !lengths.contains(&rule.length.start) || !lengths.contains(&rule.length.end) {
            return Err(TableError::LengthOutOfBounds {
                issuer: rule.issuer,
                length: rule.length,
            });
        }
        if decimal_digits(rule.prefix.end) > rule.length.end {
            return Err(TableError::PrefixTooLong {
                issuer: rule.issuer,
                prefix: rule.prefix.end,
                max_length: rule.length.end,
            });
        }
        if rule.prefix.end - rule.prefix.start >= MAX_PREFIXES_PER_RULE {
            return Err(TableError::PrefixRangeTooLarge {
                issuer: rule.issuer,
                range: rule.prefix,
                limit: MAX_PREFIXES_PER_RULE,
            });
        }

        for prefix in rule.prefix.iter() {
            self.insert(&prefix.to_string(), rule.issuer, rule.length)?;
        }
        Ok(())
    }

    /// Adds a terminal at the path spelled by `key`.
    fn insert(&mut self, key: &str, issuer: Issuer, length: Range) -> Result<(), TableError> {
        let mut node = ROOT;
        for b in key.bytes() {
            let slot = (b - b'0') as usize;
            node = match self.nodes[node as usize].children[slot] {
                Some(child) => child,
                None => {
                    let child = NodeId::try_from(self.nodes.len())
                        .map_err(|_| TableError::CapacityExceeded)?;
                    self.nodes.push(Node::default());
                    self.nodes[node as usize].children[slot] = Some(child);
                    child
                }
            };
        }

        let target = &mut self.nodes[node as usize];
        if let Some((existing, _)) = target.terminal {
            return Err(TableError::DuplicatePrefix {
                prefix: key.to_string(),
                existing,
                conflicting: issuer,
            });
        }
        target.terminal = Some((issuer, length));
        self.terminals += 1;
        Ok(())
    }

    /// Finds the issuer whose prefix matches the start of `card_number`.
    ///
    /// Returns the issuer and its valid length range, or
    /// `(Issuer::Unknown, Range::EMPTY)` when no prefix matches. The walk
    /// stops at the first terminal, even if digits remain.
    ///
    /// The input is expected to be ASCII digits only; any other byte yields
    /// `Unknown` without touching the tree.
    pub fn identify(&self, card_number: &str) -> (Issuer, Range) {
        const MISS: (Issuer, Range) = (Issuer::Unknown, Range::EMPTY);

        if !card_number.bytes().all(|b| b.is_ascii_digit()) {
            return MISS;
        }

        let mut node = ROOT;
        for b in card_number.bytes() {
            node = match self.nodes[node as usize].children[(b - b'0') as usize] {
                Some(child) => child,
                None => return MISS,
            };
            if let Some(terminal) = self.nodes[node as usize].terminal {
                return terminal;
            }
        }
        MISS
    }

    /// Identifies the issuer and checks the number's length against it.
    ///
    /// Returns `Issuer::Unknown` when no prefix matches or when the number's
    /// length is outside the issuer's valid range.
    pub fn identify_card(&self, card_number: &str) -> Issuer {
        let (issuer, length) = self.identify(card_number);
        if length.contains(card_number.len() as u64) {
            issuer
        } else {
            Issuer::Unknown
        }
    }

    /// Returns the number of registered prefixes.
    #[inline]
    pub fn len(&self) -> usize {
        self.terminals
    }

    /// Returns true if no prefix is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terminals == 0
    }
}

/// Number of decimal digits in `n`.
fn decimal_digits(n: u64) -> u64 {
    n.checked_ilog10().map_or(1, |log| u64::from(log) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_table() -> IssuerTable {
        IssuerTable::default_table().expect("default rules must build")
    }

    #[test]
    fn test_identify_default_issuers() {
        let table = default_table();
        let cases = [
            ("4111111111111111", Issuer::Visa, Range::single(16)),
            ("6011111111111117", Issuer::Discover, Range::single(16)),
            ("6445644564456445", Issuer::Discover, Range::single(16)),
            ("6500000000000002", Issuer::Discover, Range::single(16)),
            ("378282246310005", Issuer::AmericanExpress, Range::single(15)),
            ("341111111111111", Issuer::AmericanExpress, Range::single(15)),
            ("30569309025904", Issuer::DinersClub, Range::single(14)),
            ("3530111333300000", Issuer::Jcb, Range::single(16)),
            ("5555555555554444", Issuer::MasterCard, Range::single(16)),
            ("2223000048400011", Issuer::MasterCard, Range::single(16)),
            ("6200000000000005", Issuer::UnionPay, Range::new(13, 19)),
        ];
        for (number, issuer, length) in cases {
            assert_eq!(table.identify(number), (issuer, length), "{}", number);
        }
    }

    #[test]
    fn test_identify_unknown() {
        let table = default_table();
        assert_eq!(
            table.identify("9999999999999999"),
            (Issuer::Unknown, Range::EMPTY)
        );
        // 2220 is just below the MasterCard 2-series
        assert_eq!(table.identify("2220000000000000").0, Issuer::Unknown);
        // 35 is an interior node with no terminal
        assert_eq!(table.identify("35"), (Issuer::Unknown, Range::EMPTY));
        assert_eq!(table.identify(""), (Issuer::Unknown, Range::EMPTY));
    }

    #[test]
    fn test_identify_rejects_non_digits() {
        let table = default_table();
        assert_eq!(table.identify("4111-1111"), (Issuer::Unknown, Range::EMPTY));
        assert_eq!(table.identify("x4111111"), (Issuer::Unknown, Range::EMPTY));
        assert_eq!(table.identify("4１"), (Issuer::Unknown, Range::EMPTY));
    }

    #[test]
    fn test_identify_stops_at_first_terminal() {
        let rules = [
            IssuerRule::new(Issuer::Visa, Range::single(4), Range::single(16)),
            IssuerRule::new(Issuer::MasterCard, Range::single(45), Range::single(16)),
        ];
        let table = IssuerTable::build(&rules).unwrap();
        assert_eq!(table.identify("4500000000000000").0, Issuer::Visa);
    }

    #[test]
    fn test_identify_prefix_shorter_than_rule() {
        let table = default_table();
        // "601" walks toward 6011 but runs out of input first
        assert_eq!(table.identify("601"), (Issuer::Unknown, Range::EMPTY));
        assert_eq!(table.identify("6011").0, Issuer::Discover);
    }

    #[test]
    fn test_identify_card_checks_length() {
        let table = default_table();
        assert_eq!(table.identify_card("4111111111111111"), Issuer::Visa);
        assert_eq!(table.identify_card("4222222222222"), Issuer::Unknown);
        assert_eq!(table.identify_card("6200000000000"), Issuer::UnionPay);
        assert_eq!(table.identify_card("6200000000000000000"), Issuer::UnionPay);
        assert_eq!(table.identify_card("9999999999999999"), Issuer::Unknown);
    }

    #[test]
    fn test_range_rules_expand_to_every_prefix() {
        let table = default_table();
        for prefix in 3528..=3589u64 {
            let number = format!("{}000000000000", prefix);
            assert_eq!(table.identify(&number).0, Issuer::Jcb, "{}", number);
        }
        assert_eq!(table.identify("3527000000000000").0, Issuer::Unknown);
        assert_eq!(table.identify("3590000000000000").0, Issuer::Unknown);
    }

    #[test]
    fn test_len() {
        let table = default_table();
        // 2 + 4 + (1 + 6 + 1) + 62 + (5 + 500) + 1 + 1
        assert_eq!(table.len(), 583);
        assert!(!table.is_empty());
        assert!(IssuerTable::build(&[] as &[IssuerRule]).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_prefix_is_rejected() {
        let rules = [
            IssuerRule::new(Issuer::MasterCard, Range::new(51, 55), Range::single(16)),
            IssuerRule::new(Issuer::Visa, Range::new(55, 56), Range::single(16)),
        ];
        let err = IssuerTable::build(&rules).unwrap_err();
        assert_eq!(
            err,
            TableError::DuplicatePrefix {
                prefix: "55".to_string(),
                existing: Issuer::MasterCard,
                conflicting: Issuer::Visa,
            }
        );
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        let reversed = [IssuerRule::new(
            Issuer::Discover,
            Range::new(649, 644),
            Range::single(16),
        )];
        assert!(matches!(
            IssuerTable::build(&reversed),
            Err(TableError::InvalidRange { issuer: Issuer::Discover, .. })
        ));

        let unknown = [IssuerRule::new(
            Issuer::Unknown,
            Range::single(1),
            Range::single(16),
        )];
        assert!(matches!(
            IssuerTable::build(&unknown),
            Err(TableError::UnknownIssuerRule { .. })
        ));
    }

    #[test]
    fn test_lengths_outside_card_bounds_are_rejected() {
        for length in [Range::new(4, 16), Range::new(16, 20), Range::single(0)] {
            let rules = [IssuerRule::new(Issuer::Visa, Range::single(4), length)];
            assert_eq!(
                IssuerTable::build(&rules).unwrap_err(),
                TableError::LengthOutOfBounds {
                    issuer: Issuer::Visa,
                    length,
                }
            );
        }
    }

    #[test]
    fn test_unreachable_prefix_is_rejected() {
        // 20 digits, longer than any card number
        let rules = [IssuerRule::new(
            Issuer::Visa,
            Range::single(10_000_000_000_000_000_000),
            Range::single(16),
        )];
        assert_eq!(
            IssuerTable::build(&rules).unwrap_err(),
            TableError::PrefixTooLong {
                issuer: Issuer::Visa,
                prefix: 10_000_000_000_000_000_000,
                max_length: 16,
            }
        );

        // 15 digits cannot fit in a number of at most 14
        let rules = [IssuerRule::new(
            Issuer::DinersClub,
            Range::single(300_000_000_000_000),
            Range::single(14),
        )];
        assert!(matches!(
            IssuerTable::build(&rules),
            Err(TableError::PrefixTooLong { .. })
        ));

        // A prefix as long as the whole number is still reachable
        let rules = [IssuerRule::new(
            Issuer::Visa,
            Range::single(4_111_111_111_111_111),
            Range::single(16),
        )];
        let table = IssuerTable::build(&rules).unwrap();
        assert_eq!(table.identify_card("4111111111111111"), Issuer::Visa);
    }

    #[test]
    fn test_huge_prefix_range_is_rejected() {
        let rules = [IssuerRule::new(
            Issuer::UnionPay,
            Range::new(0, 9_999_999_999_999),
            Range::new(8, 19),
        )];
        assert_eq!(
            IssuerTable::build(&rules).unwrap_err(),
            TableError::PrefixRangeTooLarge {
                issuer: Issuer::UnionPay,
                range: Range::new(0, 9_999_999_999_999),
                limit: MAX_PREFIXES_PER_RULE,
            }
        );

        let widest = [IssuerRule::new(
            Issuer::UnionPay,
            Range::new(100_000, 100_000 + MAX_PREFIXES_PER_RULE - 1),
            Range::new(8, 19),
        )];
        let table = IssuerTable::build(&widest).unwrap();
        assert_eq!(table.len() as u64, MAX_PREFIXES_PER_RULE);
    }

    #[test]
    fn test_decimal_digits() {
        assert_eq!(decimal_digits(0), 1);
        assert_eq!(decimal_digits(9), 1);
        assert_eq!(decimal_digits(10), 2);
        assert_eq!(decimal_digits(u64::MAX), 20);
    }

    #[test]
    fn test_table_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IssuerTable>();
    }
}

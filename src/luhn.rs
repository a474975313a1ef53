//! Luhn (mod 10) checksum.
//!
//! Digits are processed from the rightmost one leftward. Every digit at an
//! odd position (counting the rightmost as position 0) is doubled, with 9
//! subtracted when the result exceeds 9. The number passes when the sum of
//! all transformed digits is divisible by 10.

/// Doubled digit values with 9 subtracted above 9, indexed by digit.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Computes the Luhn sum (not reduced modulo 10) of digit values 0-9.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum()
}

/// Validates a sequence of digit values (0-9, not ASCII).
///
/// An empty slice is rejected.
///
/// # Example
///
/// ```
/// use cardvalidate::luhn::validate;
///
/// assert!(validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]));
/// assert!(!validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 1]));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    !digits.is_empty() && compute_checksum(digits) % 10 == 0
}

/// Validates a string of ASCII digits.
///
/// Returns false for an empty string or one containing any non-digit byte.
///
/// # Example
///
/// ```
/// use cardvalidate::luhn::passes;
///
/// assert!(passes("4111111111111111"));
/// assert!(!passes("4111111111111121"));
/// assert!(!passes("4111 1111 1111 1111"));
/// ```
pub fn passes(number: &str) -> bool {
    let bytes = number.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let digits: Vec<u8> = bytes.iter().map(|b| b - b'0').collect();
    compute_checksum(&digits) % 10 == 0
}

/// Computes the check digit that makes `digits` followed by it pass.
///
/// # Example
///
/// ```
/// use cardvalidate::luhn::generate_check_digit;
///
/// let partial = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
/// assert_eq!(generate_check_digit(&partial), 1);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Appending the check digit shifts every position by one, so the
    // rightmost existing digit becomes position 1 and is doubled.
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_numbers() {
        for number in [
            "4111111111111111",
            "4012888888881881",
            "5500000000000004",
            "5105105105105100",
            "378282246310005",
            "6011111111111117",
            "30569309025904",
            "3530111333300000",
        ] {
            assert!(passes(number), "{}", number);
        }
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(!passes("4111111111111121"));
        assert!(!passes("4111111111111112"));
        assert!(!passes("1234567890123456"));
    }

    #[test]
    fn test_passes_rejects_non_digits() {
        assert!(!passes(""));
        assert!(!passes("4111-1111-1111-1111"));
        assert!(!passes("abcd"));
    }

    #[test]
    fn test_passes_matches_validate() {
        let number = "4012888888881881";
        let digits: Vec<u8> = number.bytes().map(|b| b - b'0').collect();
        assert_eq!(passes(number), validate(&digits));
        assert_eq!(compute_checksum(&digits) % 10, 0);
    }

    #[test]
    fn test_leading_zeros_do_not_change_result() {
        assert!(passes("0004111111111111111"));
        assert!(passes("00000000"));
    }

    #[test]
    fn test_generate_check_digit() {
        assert_eq!(generate_check_digit(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]), 1);
        assert_eq!(generate_check_digit(&[5, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]), 4);
        assert_eq!(generate_check_digit(&[3, 7, 8, 2, 8, 2, 2, 4, 6, 3, 1, 0, 0, 0]), 5);
    }

    #[test]
    fn test_empty_input() {
        assert!(!validate(&[]));
    }

    #[test]
    fn test_double_table_values() {
        for (i, &value) in DOUBLE_TABLE.iter().enumerate() {
            let doubled = i * 2;
            let expected = if doubled > 9 { doubled - 9 } else { doubled };
            assert_eq!(value as usize, expected);
        }
    }
}

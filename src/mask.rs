//! Log-safe masking of card numbers.
//!
//! Full card numbers must never reach logs or error output. These helpers
//! keep only the last four characters.

/// Masks all but the last four characters.
///
/// Inputs of four characters or fewer are masked completely.
///
/// # Example
///
/// ```
/// use cardvalidate::mask::mask_number;
///
/// assert_eq!(mask_number("4111111111111111"), "************1111");
/// assert_eq!(mask_number("123"), "***");
/// ```
pub fn mask_number(number: &str) -> String {
    let len = number.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }

    let mut masked = "*".repeat(len - 4);
    masked.extend(number.chars().skip(len - 4));
    masked
}

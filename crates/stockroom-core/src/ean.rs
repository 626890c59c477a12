//! # EAN-13 Barcodes
//!
//! Check-digit validation for EAN-13 (GS1) retail barcodes.
//!
//! ## Check Digit Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EAN:      4  0  0  6  3  8  1  3  3  3  9  3  │ 1                      │
//! │  Weight:   1  3  1  3  1  3  1  3  1  3  1  3  │ (check digit)          │
//! │            ──────────────────────────────────                          │
//! │  Sum:      4+0+0+18+3+24+1+9+3+9+9+9 = 89                              │
//! │                                                                         │
//! │  Check:    (10 - 89 % 10) % 10 = 1   ✓ matches the 13th digit          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Whitespace anywhere in the input is ignored, so `"400 6381 333931"` is the
//! same barcode as `"4006381333931"`. Every function here is total: no input
//! makes them panic.

use thiserror::Error;

/// Number of digits in an EAN-13 barcode, check digit included.
pub const EAN13_LEN: usize = 13;

/// Why a string was rejected as an EAN-13 barcode.
///
/// Variants are listed in the order [`explain_ean_error`] checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EanError {
    #[error("EAN is required")]
    Empty,

    #[error("EAN must contain only digits")]
    NonNumeric,

    #[error("EAN must have exactly 13 digits")]
    WrongLength,

    #[error("Invalid EAN (incorrect checksum)")]
    BadChecksum,
}

/// Removes every whitespace character from `input`.
pub fn normalize_ean(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Computes the check digit for the first 12 digits of an EAN-13.
///
/// Returns `None` unless `first12` is exactly 12 ASCII digits.
///
/// ## Example
/// ```rust
/// use stockroom_core::ean::check_digit;
///
/// assert_eq!(check_digit("400638133393"), Some(1));
/// assert_eq!(check_digit("40063813339"), None);
/// ```
pub fn check_digit(first12: &str) -> Option<u8> {
    let bytes = first12.as_bytes();
    if bytes.len() != EAN13_LEN - 1 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let sum: u32 = bytes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 0 {
                digit
            } else {
                digit * 3
            }
        })
        .sum();

    Some(((10 - sum % 10) % 10) as u8)
}

/// Returns true when `input` (whitespace ignored) is a valid EAN-13.
///
/// ## Example
/// ```rust
/// use stockroom_core::ean::is_valid_ean13;
///
/// assert!(is_valid_ean13("4006381333931"));
/// assert!(!is_valid_ean13("4006381333930"));
/// assert!(!is_valid_ean13("400638133393"));
/// ```
pub fn is_valid_ean13(input: &str) -> bool {
    let cleaned = normalize_ean(input);
    let bytes = cleaned.as_bytes();

    if bytes.len() != EAN13_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    match check_digit(&cleaned[..EAN13_LEN - 1]) {
        Some(expected) => expected == bytes[EAN13_LEN - 1] - b'0',
        None => false,
    }
}

/// Explains why `input` is not a valid EAN-13, or `None` when it is.
///
/// ## Check Order
/// 1. Empty input (nothing typed at all)
/// 2. Contains a non-digit, or only whitespace
/// 3. Not exactly 13 digits
/// 4. Check digit mismatch
///
/// The first failing check wins. Only the first check looks at the raw
/// input; the rest run on the whitespace-stripped string.
pub fn explain_ean_error(input: &str) -> Option<EanError> {
    if input.is_empty() {
        return Some(EanError::Empty);
    }

    let cleaned = normalize_ean(input);

    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return Some(EanError::NonNumeric);
    }

    if cleaned.len() != EAN13_LEN {
        return Some(EanError::WrongLength);
    }

    if !is_valid_ean13(&cleaned) {
        return Some(EanError::BadChecksum);
    }

    None
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_barcodes() {
        assert!(is_valid_ean13("4006381333931"));
        assert!(is_valid_ean13("1234567890128"));
        assert!(is_valid_ean13("5901234123457"));
        assert!(!is_valid_ean13("4006381333930"));
        assert!(!is_valid_ean13("1234567890123"));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert!(is_valid_ean13(" 4006381333931 "));
        assert!(is_valid_ean13("400 6381 33393 1"));
        assert!(is_valid_ean13("4006381333931\n"));
    }

    #[test]
    fn test_shape_rejections() {
        assert!(!is_valid_ean13(""));
        assert!(!is_valid_ean13("   "));
        assert!(!is_valid_ean13("400638133393"));
        assert!(!is_valid_ean13("40063813339310"));
        assert!(!is_valid_ean13("400638133393A"));
        assert!(!is_valid_ean13("-400638133393"));
        // Non-ASCII digits are not barcode digits
        assert!(!is_valid_ean13("٤٠٠٦٣٨١٣٣٣٩٣١"));
    }

    #[test]
    fn test_explain_priority_order() {
        assert_eq!(explain_ean_error(""), Some(EanError::Empty));
        // Blank is not empty: nothing left to be digits
        assert_eq!(explain_ean_error("  \t "), Some(EanError::NonNumeric));
        assert_eq!(explain_ean_error(" "), Some(EanError::NonNumeric));
        assert_eq!(explain_ean_error("12AB"), Some(EanError::NonNumeric));
        // Non-numeric wins over wrong length
        assert_eq!(explain_ean_error("12345678901234X"), Some(EanError::NonNumeric));
        assert_eq!(explain_ean_error("123"), Some(EanError::WrongLength));
        assert_eq!(explain_ean_error("4006381333930"), Some(EanError::BadChecksum));
        assert_eq!(explain_ean_error("4006381333931"), None);
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(check_digit("400638133393"), Some(1));
        assert_eq!(check_digit("123456789012"), Some(8));
        assert_eq!(check_digit("000000000000"), Some(0));
        assert_eq!(check_digit("12345678901A"), None);
        assert_eq!(check_digit(""), None);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(EanError::Empty.to_string(), "EAN is required");
        assert_eq!(
            EanError::BadChecksum.to_string(),
            "Invalid EAN (incorrect checksum)"
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: exactly one of the ten possible last digits is valid.
        #[test]
        fn only_the_gs1_check_digit_validates(first12 in "[0-9]{12}", last in 0u8..10) {
            let expected = check_digit(&first12).unwrap();
            let candidate = format!("{first12}{last}");
            prop_assert_eq!(is_valid_ean13(&candidate), last == expected);
            prop_assert_eq!(explain_ean_error(&candidate).is_none(), last == expected);
        }

        /// Property: anything that is not 13 digits is rejected.
        #[test]
        fn wrong_length_is_never_valid(digits in "[0-9]{0,30}") {
            prop_assume!(digits.len() != EAN13_LEN);
            prop_assert!(!is_valid_ean13(&digits));
        }

        /// Property: the validator never panics, whatever it is fed.
        #[test]
        fn validator_is_total(input in "\\PC*") {
            let _ = is_valid_ean13(&input);
            let _ = explain_ean_error(&input);
        }
    }
}

//! Common validation utilities.

use chrono::NaiveDate;
use validator::ValidationError;

/// Minimum digits in a phone number (country code plus at least one digit).
const PHONE_MIN_DIGITS: usize = 2;

/// Maximum digits in a phone number (E.164 limit).
const PHONE_MAX_DIGITS: usize = 15;

/// Validates that a phone number has a plausible E.164 shape: an optional
/// leading `+`, a first digit of 1-9, and 2 to 15 digits total.
///
/// This is a shape check on user input, applied before normalization. The
/// normalizer itself accepts anything.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);

    let valid = digits.len() >= PHONE_MIN_DIGITS
        && digits.len() <= PHONE_MAX_DIGITS
        && !digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Invalid phone number format".into());
        Err(err)
    }
}

/// Validates that a date string is a real calendar date in `YYYY-MM-DD` form.
///
/// Gathering dates are stored as strings and compared lexicographically, so
/// the zero-padded shape matters as much as the date being real.
pub fn validate_calendar_date(date: &str) -> Result<(), ValidationError> {
    let bytes = date.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && date
            .chars()
            .enumerate()
            .all(|(i, c)| matches!(i, 4 | 7) || c.is_ascii_digit());

    if shaped && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_format");
        err.message = Some("Date must be a valid YYYY-MM-DD date".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Phone number tests
    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("+15551234567").is_ok());
        assert!(validate_phone_number("15551234567").is_ok());
        assert!(validate_phone_number("+442079460958").is_ok());
        assert!(validate_phone_number("+12").is_ok());
    }

    #[test]
    fn test_validate_phone_number_rejects_leading_zero() {
        assert!(validate_phone_number("+05551234567").is_err());
        assert!(validate_phone_number("05551234567").is_err());
    }

    #[test]
    fn test_validate_phone_number_rejects_non_digits() {
        assert!(validate_phone_number("+1 555 123 4567").is_err());
        assert!(validate_phone_number("(555) 123-4567").is_err());
        assert!(validate_phone_number("+1555abc4567").is_err());
    }

    #[test]
    fn test_validate_phone_number_length_bounds() {
        // 15 digits is the E.164 maximum
        assert!(validate_phone_number("+123456789012345").is_ok());
        assert!(validate_phone_number("+1234567890123456").is_err());
        // A lone digit is too short
        assert!(validate_phone_number("+1").is_err());
        assert!(validate_phone_number("").is_err());
        assert!(validate_phone_number("+").is_err());
    }

    #[test]
    fn test_validate_phone_number_error_message() {
        let err = validate_phone_number("not a phone").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Invalid phone number format"
        );
    }

    // Calendar date tests
    #[test]
    fn test_validate_calendar_date() {
        assert!(validate_calendar_date("2025-01-15").is_ok());
        assert!(validate_calendar_date("2025-12-31").is_ok());
        assert!(validate_calendar_date("2024-02-29").is_ok()); // Leap year
    }

    #[test]
    fn test_validate_calendar_date_rejects_impossible_dates() {
        assert!(validate_calendar_date("2025-02-29").is_err()); // Not a leap year
        assert!(validate_calendar_date("2025-13-01").is_err());
        assert!(validate_calendar_date("2025-00-10").is_err());
        assert!(validate_calendar_date("2025-04-31").is_err());
    }

    #[test]
    fn test_validate_calendar_date_requires_zero_padding() {
        assert!(validate_calendar_date("2025-1-5").is_err());
        assert!(validate_calendar_date("2025-01-5").is_err());
        assert!(validate_calendar_date("25-01-05").is_err());
    }

    #[test]
    fn test_validate_calendar_date_rejects_other_shapes() {
        assert!(validate_calendar_date("").is_err());
        assert!(validate_calendar_date("01/15/2025").is_err());
        assert!(validate_calendar_date("2025-01-15T00:00:00Z").is_err());
        assert!(validate_calendar_date("tomorrow").is_err());
    }

    #[test]
    fn test_validate_calendar_date_error_message() {
        let err = validate_calendar_date("not a date").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Date must be a valid YYYY-MM-DD date"
        );
    }
}

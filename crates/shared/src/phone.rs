//! Phone number normalization.
//!
//! User-entered phone numbers arrive in every imaginable shape: with spaces,
//! dashes, parentheses, or nothing but digits. Everything is canonicalized to
//! an E.164-style string before it touches the database or the SMS provider,
//! so one person always maps to one account.

/// Normalize a free-form phone number into E.164-style form.
///
/// Rules, in order:
/// 1. Strip everything except ASCII digits, remembering whether the input
///    started with `+`.
/// 2. Input started with `+`: return `+` followed by the digits.
/// 3. Exactly 10 digits: assume US/Canada and prefix `+1`.
/// 4. Exactly 11 digits starting with `1`: prefix `+`.
/// 5. More than 11 digits: prefix `+`.
/// 6. Anything else: return the bare digits unchanged.
///
/// The function is total (never fails) and idempotent, so it is safe to call
/// on values that may already be normalized.
pub fn normalize_phone_number(input: &str) -> String {
    let has_plus = input.trim_start().starts_with('+');
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    if has_plus {
        return format!("+{digits}");
    }

    match digits.len() {
        10 => format!("+1{digits}"),
        11 if digits.starts_with('1') => format!("+{digits}"),
        n if n > 11 => format!("+{digits}"),
        _ => digits,
    }
}

//! E.164 phone number helpers.
//!
//! Numbers are normalized before storage so the dialer always receives a
//! `+<country><subscriber>` destination.

/// Check E.164 shape: leading `+`, country code starting 1-9, 10 to 15
/// digits in total.
pub fn is_valid_e164(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    if !(10..=15).contains(&digits.len()) {
        return false;
    }
    let mut chars = digits.chars();
    if !matches!(chars.next(), Some('1'..='9')) {
        return false;
    }
    chars.all(|c| c.is_ascii_digit())
}

/// Normalize free-form input towards E.164: keep only digits, drop one
/// leading zero, prepend `+`. Input with an implausible digit count is
/// returned trimmed but otherwise untouched, so validation can reject it.
pub fn normalize_phone(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if (10..=15).contains(&digits.len()) {
        let digits = digits.strip_prefix('0').unwrap_or(&digits);
        format!("+{digits}")
    } else {
        input.trim().to_string()
    }
}

//! Subscriber phone number validation and normalization.
//!
//! The processor only accepts Kenyan mobile numbers in the international
//! `254XXXXXXXXX` form, while callers typically type the local `07XX` or
//! `01XX` form. Everything is normalized here, before any money moves.

use thiserror::Error;

/// Validation errors for subscriber phone numbers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    /// Number is empty or whitespace.
    #[error("Phone number is required")]
    Empty,
    /// Number does not match a recognized Kenyan mobile format.
    #[error("Phone number must be 07XXXXXXXX, 01XXXXXXXX or 254XXXXXXXXX")]
    InvalidFormat,
}

/// Normalizes a phone number to the international `254` form.
///
/// Accepted inputs:
/// - `07XXXXXXXX` / `01XXXXXXXX` (10 digits, local form)
/// - `2547XXXXXXXX` / `2541XXXXXXXX` (12 digits)
/// - the 12-digit form with a leading `+`
///
/// Surrounding whitespace is ignored. The leading `+` is only valid on the
/// international form.
///
/// # Errors
///
/// Returns [`PhoneError::Empty`] for blank input and
/// [`PhoneError::InvalidFormat`] for anything else that does not match.
pub fn normalize_phone(input: &str) -> Result<String, PhoneError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PhoneError::Empty);
    }

    let has_plus = trimmed.starts_with('+');
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PhoneError::InvalidFormat);
    }

    match digits.len() {
        10 if !has_plus && (digits.starts_with("07") || digits.starts_with("01")) => {
            Ok(format!("254{}", &digits[1..]))
        }
        12 if digits.starts_with("2547") || digits.starts_with("2541") => Ok(digits.to_string()),
        _ => Err(PhoneError::InvalidFormat),
    }
}

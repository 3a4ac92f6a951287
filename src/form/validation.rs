//! Field validation rules.
//!
//! Rules are evaluated one field at a time and never block typing; they
//! only annotate the form so submission can be gated.

use crate::schema::TextField;
use once_cell::sync::Lazy;
use regex::Regex;

pub const INVALID_EMAIL: &str = "Invalid email format";
pub const INVALID_PIN: &str = "Pin must be exactly 6 digits.";

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const INVALID_EMAIL_ADDRESS: &str = "Invalid email address";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long";

/// Minimum password length accepted by the login form.
pub const MIN_PASSWORD_LEN: usize = 6;

// local@domain.tld, no whitespace and a single '@'
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

// ASCII digits only; `\d` would also accept other Unicode digits
static PIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("pin pattern compiles"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_pin(value: &str) -> bool {
    PIN_PATTERN.is_match(value)
}

/// Check a project field; `Some(message)` when the value is rejected.
pub fn validate(field: TextField, value: &str) -> Option<&'static str> {
    match field {
        TextField::Email if !is_valid_email(value) => Some(INVALID_EMAIL),
        TextField::Pin if !is_valid_pin(value) => Some(INVALID_PIN),
        _ => None,
    }
}

/// Check the login email field.
pub fn validate_login_email(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some(EMAIL_REQUIRED)
    } else if !is_valid_email(value) {
        Some(INVALID_EMAIL_ADDRESS)
    } else {
        None
    }
}

/// Check the login password field.
pub fn validate_password(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some(PASSWORD_REQUIRED)
    } else if value.chars().count() < MIN_PASSWORD_LEN {
        Some(PASSWORD_TOO_SHORT)
    } else {
        None
    }
}

//! Client-side input validation
//!
//! Validation runs before any network submission so obviously malformed
//! input never reaches the backend. Failures here are recoverable: the
//! caller redisplays the message and the user corrects the field.

use regex::Regex;
use std::sync::OnceLock;

/// Checks whether a string looks like an email address
///
/// # Examples
///
/// ```
/// use echoledger::validate::validate_email;
///
/// assert!(validate_email("a@b.com"));
/// assert!(!validate_email("not-an-email"));
/// ```
pub fn validate_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex compiles"))
        .is_match(email)
}

/// Checks whether a string is a well-formed 6-digit verification code
pub fn validate_otp_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// Validates password complexity
///
/// Requirements: at least 8 characters, one uppercase letter, one
/// lowercase letter, one digit, and one special character.
///
/// # Returns
///
/// Returns the list of unmet requirements; empty means the password is
/// acceptable.
///
/// # Examples
///
/// ```
/// use echoledger::validate::validate_password;
///
/// assert!(validate_password("Str0ng!pass").is_empty());
/// assert!(!validate_password("weak").is_empty());
/// ```
pub fn validate_password(password: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit".to_string());
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        errors.push("Password must contain at least one special character".to_string());
    }

    errors
}

//! Credential validation.
//!
//! Pure checks over raw user input. Nothing here touches the network,
//! the session file, or the terminal - callers decide how to surface
//! each result.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Outcome of a password policy check.
///
/// The rules run in a fixed priority order and the first failing rule
/// wins, so a password that is missing both an uppercase letter and a
/// digit reports `MissingUppercase` alone. Callers branch on the single
/// returned code to pick the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Ok,
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
}

impl PasswordCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, PasswordCheck::Ok)
    }

    /// User-facing message for this result.
    pub fn message(&self) -> &'static str {
        match self {
            PasswordCheck::Ok => "Strong Password",
            PasswordCheck::TooShort => {
                "Password must be at least 8 characters long"
            }
            PasswordCheck::MissingUppercase => {
                "Password must contain an uppercase letter"
            }
            PasswordCheck::MissingLowercase => {
                "Password must contain a lowercase letter"
            }
            PasswordCheck::MissingDigit => "Password must contain a digit",
        }
    }
}

/// Checks a password against the account policy.
///
/// A password must be at least 8 characters long and contain at least
/// one uppercase ASCII letter, one lowercase ASCII letter, and one
/// decimal digit. Non-ASCII letters do not satisfy the letter rules.
///
/// # Arguments
/// * `password` - The candidate password, any string including empty
///
/// # Returns
/// * The first violated rule in priority order, or `PasswordCheck::Ok`
pub fn validate_password(password: &str) -> PasswordCheck {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return PasswordCheck::TooShort;
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return PasswordCheck::MissingUppercase;
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return PasswordCheck::MissingLowercase;
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return PasswordCheck::MissingDigit;
    }
    PasswordCheck::Ok
}

/// Checks that the repeated password matches the first entry exactly.
/// Ordinal comparison - no trimming, no normalization.
pub fn validate_repeat(password: &str, repeat: &str) -> bool {
    password == repeat
}

static USERNAME_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]").expect("username pattern"));

/// Checks that a username starts with an ASCII letter. This is an
/// account-name rule, not part of the password policy.
pub fn validate_username(username: &str) -> bool {
    USERNAME_START.is_match(username)
}

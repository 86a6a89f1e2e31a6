//! Sign-in boundary.
//!
//! No backend exists yet: [`Authenticator`] is the seam a real provider will
//! plug into, and [`stub::StubAuthenticator`] stands in for it.

pub mod stub;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub use stub::StubAuthenticator;

/// An E.164 number, stored with its leading '+'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalise user input. Separators are dropped; input without a leading
    /// '+' is assumed local to `default_dial_code`.
    pub fn parse(input: &str, default_dial_code: &str) -> Result<Self, AuthError> {
        let trimmed = input.trim();
        let cleaned: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();

        let digits = match cleaned.strip_prefix('+') {
            Some(rest) => rest.to_string(),
            None => format!("{}{}", default_dial_code.trim_start_matches('+'), cleaned),
        };

        if !digits.chars().all(|c| c.is_ascii_digit()) || !(7..=15).contains(&digits.len()) {
            return Err(AuthError::InvalidPhone(trimmed.to_string()));
        }
        Ok(PhoneNumber(format!("+{}", digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub phone: PhoneNumber,
    pub password: String,
}

impl Credentials {
    pub fn new(phone: &str, password: &str, default_dial_code: &str) -> Result<Self, AuthError> {
        let phone = PhoneNumber::parse(phone, default_dial_code)?;
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }
        Ok(Self {
            phone,
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phone: PhoneNumber,
    pub signed_in_at: DateTime<Utc>,
}

pub trait Authenticator {
    fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;
    fn register(&self, credentials: &Credentials) -> Result<Session, AuthError>;
}

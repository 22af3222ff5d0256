//! Domain value objects representing immutable concepts

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Maximum length of an email address (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern is a valid regex")
});

/// Store-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// An email address as supplied by the client.
///
/// Equality between addresses is case-insensitive; use [`EmailAddress::normalized`]
/// wherever a uniqueness key is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and validate an email address, trimming surrounding whitespace
    pub fn parse(email: &str) -> Result<Self, String> {
        let email = email.trim();

        if email.is_empty() {
            return Err("email is required.".to_string());
        }

        if email.chars().count() > MAX_EMAIL_LENGTH {
            return Err(format!(
                "email must be at most {} characters.",
                MAX_EMAIL_LENGTH
            ));
        }

        if !EMAIL_PATTERN.is_match(email) {
            return Err("email is not a valid email address.".to_string());
        }

        Ok(Self(email.to_string()))
    }

    /// Wrap an address that was validated before it was stored
    pub(crate) fn from_stored(email: String) -> Self {
        Self(email)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used as the uniqueness key
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive comparison against another address
    pub fn matches(&self, other: &EmailAddress) -> bool {
        self.normalized() == other.normalized()
    }
}

impl PartialEq for EmailAddress {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for EmailAddress {}

impl FromStr for EmailAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

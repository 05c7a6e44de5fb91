//! Validated postal code (Brazilian CEP).

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Accepts `01310100` and `01310-100`.
static POSTAL_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{5})-?([0-9]{3})$").unwrap());

/// Reasons a raw postal code is rejected before any lookup is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostalCodeError {
    #[error("postal code is empty")]
    Empty,

    #[error("postal code '{0}' must contain exactly 8 digits")]
    Malformed(String),
}

/// A postal code in normalized form: exactly 8 ASCII digits.
///
/// Construct with [`PostalCode::parse`]; the inner value can never be
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Normalizes and validates a raw postal code.
    ///
    /// Surrounding whitespace and a single hyphen after the fifth digit are
    /// stripped. Anything else that is not 8 digits is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PostalCodeError::Empty`] for blank input and
    /// [`PostalCodeError::Malformed`] otherwise.
    pub fn parse(raw: &str) -> Result<Self, PostalCodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PostalCodeError::Empty);
        }

        let caps = POSTAL_CODE_REGEX
            .captures(trimmed)
            .ok_or_else(|| PostalCodeError::Malformed(trimmed.to_string()))?;

        Ok(Self(format!("{}{}", &caps[1], &caps[2])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Identifier normalization
//!
//! A DNI typed into a chat can carry spaces and mixed case. Every comparison
//! against the sheet goes through [`normalize`] so both sides share one
//! canonical form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// A canonical identifier: no whitespace, upper-case, `[A-Z0-9-]` only.
///
/// Built only by [`normalize`]; deserializing goes through it too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = DeliveryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        normalize(&raw)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip all whitespace, upper-case, and validate the character set.
pub fn normalize(raw: &str) -> Result<Identifier, DeliveryError> {
    let canonical: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();

    if canonical.is_empty() {
        return Err(DeliveryError::InvalidIdentifier);
    }

    if !canonical
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(DeliveryError::InvalidIdentifier);
    }

    Ok(Identifier(canonical))
}

//! Patient record identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Maximum length of a FHIR logical id.
const MAX_LEN: usize = 64;

/// A server-assigned patient id.
///
/// Follows the FHIR id grammar: 1 to 64 characters from `A-Z`, `a-z`, `0-9`,
/// `-` and `.`. A `RecordId` is obtained from a successful create call (or
/// parsed from operator input) and addresses the query and fetch requests
/// for that patient.
///
/// # Example
///
/// ```
/// use hdx_core::RecordId;
///
/// let id = RecordId::new("e5b1a3c6-1f0b-4d2e-9d9b-7f1d2a3b4c5d").unwrap();
/// assert_eq!(id.query_path(), "Patient/e5b1a3c6-1f0b-4d2e-9d9b-7f1d2a3b4c5d/$query");
/// assert!(RecordId::new("not/an/id").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new record id, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();

        if s.is_empty() || s.len() > MAX_LEN {
            return Err(invalid(s, "must be 1 to 64 characters"));
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(invalid(s, format!("unexpected character '{}'", c)));
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the `$query` operation for this patient, relative to the FHIR root.
    pub fn query_path(&self) -> String {
        format!("Patient/{}/$query", self.0)
    }
}

fn invalid(value: &str, reason: impl Into<String>) -> Error {
    InvalidInputError::RecordId {
        value: value.to_string(),
        reason: reason.into(),
    }
    .into()
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

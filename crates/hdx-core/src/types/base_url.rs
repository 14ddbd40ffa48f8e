//! Base endpoint URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// Path of the auth endpoint, relative to the base URL.
const AUTH_PATH: &str = "auth/";

/// Path of the FHIR R4 root, relative to the base URL.
const FHIR_ROOT: &str = "R4/";

/// A validated base endpoint of the health-data exchange.
///
/// The URL must be absolute and use HTTP or HTTPS. It is normalised to end
/// with `/` so the auth endpoint and the FHIR root can be derived by joining
/// relative paths onto it.
///
/// # Example
///
/// ```
/// use hdx_core::BaseUrl;
///
/// let base = BaseUrl::new("https://sandbox.example.com").unwrap();
/// assert_eq!(base.auth_url().as_str(), "https://sandbox.example.com/auth/");
/// assert_eq!(
///     base.fhir_url("Patient/123/$query").unwrap().as_str(),
///     "https://sandbox.example.com/R4/Patient/123/$query"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl {
    base: Url,
    auth: Url,
    fhir: Url,
}

impl BaseUrl {
    /// Create a new base URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let mut base = Url::parse(s).map_err(|e| invalid(s, e.to_string()))?;

        Self::validate(&base, s)?;

        // Joining replaces the last path segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let auth = base.join(AUTH_PATH).map_err(|e| invalid(s, e.to_string()))?;
        let fhir = base.join(FHIR_ROOT).map_err(|e| invalid(s, e.to_string()))?;

        Ok(Self { base, auth, fhir })
    }

    /// Returns the auth endpoint (`{base}/auth/`).
    pub fn auth_url(&self) -> &Url {
        &self.auth
    }

    /// Returns the FHIR R4 root (`{base}/R4/`).
    pub fn fhir_root(&self) -> &Url {
        &self.fhir
    }

    /// Resolve a FHIR path or link against the FHIR root.
    ///
    /// Relative references such as `Patient/123/$everything` are joined onto
    /// the root; absolute URLs (typical for `next` links) are returned as-is.
    pub fn fhir_url(&self, reference: &str) -> Result<Url, Error> {
        self.fhir.join(reference).map_err(|e| {
            InvalidInputError::Link {
                value: reference.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.base
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.base.host_str()
    }

    /// Returns true if requests to this endpoint are sent unencrypted.
    pub fn is_plaintext(&self) -> bool {
        self.base.scheme() == "http"
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(invalid(original, "must be an absolute URL"));
        }

        if url.host_str().is_none() {
            return Err(invalid(original, "must have a host"));
        }

        if !matches!(url.scheme(), "https" | "http") {
            return Err(invalid(original, "must use HTTP or HTTPS"));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid(original, "must not have a query or fragment"));
        }

        Ok(())
    }
}

fn invalid(value: &str, reason: impl Into<String>) -> Error {
    InvalidInputError::BaseUrl {
        value: value.to_string(),
        reason: reason.into(),
    }
    .into()
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.base.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BaseUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.base.as_str()
    }
}

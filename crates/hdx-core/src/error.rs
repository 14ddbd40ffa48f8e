//! Error types for hdx.
//!
//! One error type covers the whole client, with explicit variants for
//! authentication, query timeout, transport, protocol, and input validation
//! failures so callers can tell them apart.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The unified error type for hdx operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, malformed body).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The auth endpoint refused the client credentials.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The patient query did not complete before the deadline.
    #[error("query timeout: {0}")]
    QueryTimeout(#[from] QueryTimeoutError),

    /// Unexpected HTTP status from a FHIR endpoint.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (base URL, record id, links).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Pagination was capped and the server offered more pages.
    #[error("page limit of {limit} exceeded")]
    PageLimitExceeded { limit: usize },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Response body could not be decoded.
    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The auth endpoint answered with something other than 200.
    #[error("got status code {status}, check that the client id and client secret are valid")]
    Rejected { status: u16 },

    /// The auth endpoint answered 200 with an empty body.
    #[error("auth endpoint returned an empty token")]
    EmptyToken,

    /// The token cannot be sent as an HTTP header value.
    #[error("token contains characters not allowed in a header")]
    InvalidToken,
}

impl AuthError {
    /// Returns the HTTP status the auth endpoint answered with, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Rejected { status } => Some(*status),
            _ => None,
        }
    }
}

/// The query status never reached 200 within the configured wait.
#[derive(Debug, Clone)]
pub struct QueryTimeoutError {
    /// Wall-clock time spent waiting.
    pub waited: Duration,
    /// Number of status checks issued.
    pub attempts: u32,
    /// Last status observed, if any check was issued.
    pub last_status: Option<u16>,
}

impl fmt::Display for QueryTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "query did not complete after {}s ({} status checks",
            self.waited.as_secs(),
            self.attempts
        )?;
        if let Some(status) = self.last_status {
            write!(f, ", last status {}", status)?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for QueryTimeoutError {}

/// Protocol-level errors from FHIR responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Request URL.
    pub url: String,
    /// Diagnostics from an `OperationOutcome` body, or the raw body.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} from {}", self.status, self.url)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, url: impl Into<String>, message: Option<String>) -> Self {
        Self {
            status,
            url: url.into(),
            message,
        }
    }

    /// Check if the server rejected the bearer token.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Invalid FHIR resource id.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// A relative path or link could not be resolved.
    #[error("invalid link '{value}': {reason}")]
    Link { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_rejection_mentions_status() {
        let err = Error::from(AuthError::Rejected { status: 401 });
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn timeout_display_includes_context() {
        let err = QueryTimeoutError {
            waited: Duration::from_secs(900),
            attempts: 31,
            last_status: Some(202),
        };
        let msg = err.to_string();
        assert!(msg.contains("900s"));
        assert!(msg.contains("31 status checks"));
        assert!(msg.contains("last status 202"));
    }

    #[test]
    fn timeout_without_attempts_omits_status() {
        let err = QueryTimeoutError {
            waited: Duration::ZERO,
            attempts: 0,
            last_status: None,
        };
        assert!(!err.to_string().contains("last status"));
    }
}

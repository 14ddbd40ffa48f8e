//! Mapping reqwest and response failures onto the core error type.

use hdx_core::Error;
use hdx_core::error::{ProtocolError, TransportError};
use url::Url;

use crate::endpoints::OperationOutcome;

/// Classify a reqwest failure.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let message = err.to_string();
    let err = if err.is_timeout() {
        TransportError::Timeout { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else {
        TransportError::Http { message }
    };
    Error::Transport(err)
}

/// A body that should have been JSON was not.
pub(crate) fn decode_error(url: &Url, err: serde_json::Error) -> Error {
    Error::Transport(TransportError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })
}

/// Build a protocol error from a non-success response, preferring
/// `OperationOutcome` diagnostics over the raw body.
pub(crate) fn protocol_error(url: &Url, status: u16, body: &str) -> Error {
    let message = match serde_json::from_str::<OperationOutcome>(body) {
        Ok(outcome) if outcome.resource_type == "OperationOutcome" => outcome.diagnostics(),
        _ => {
            let body = body.trim();
            (!body.is_empty()).then(|| body.to_string())
        }
    };
    Error::Protocol(ProtocolError::new(status, url.as_str(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://fhir.test/R4/Patient").unwrap()
    }

    #[test]
    fn operation_outcome_diagnostics_are_joined() {
        let body = r#"{
            "resourceType": "OperationOutcome",
            "issue": [
                { "severity": "error", "code": "required", "diagnostics": "Patient.name is required" },
                { "severity": "error", "code": "value", "diagnostics": "birthDate is invalid" }
            ]
        }"#;
        let Error::Protocol(err) = protocol_error(&url(), 422, body) else {
            panic!("expected protocol error");
        };
        assert_eq!(err.status, 422);
        assert_eq!(
            err.message.as_deref(),
            Some("Patient.name is required; birthDate is invalid")
        );
    }

    #[test]
    fn raw_body_is_kept_when_not_an_outcome() {
        let Error::Protocol(err) = protocol_error(&url(), 502, "Bad Gateway\n") else {
            panic!("expected protocol error");
        };
        assert_eq!(err.message.as_deref(), Some("Bad Gateway"));
    }

    #[test]
    fn empty_body_has_no_message() {
        let Error::Protocol(err) = protocol_error(&url(), 500, "") else {
            panic!("expected protocol error");
        };
        assert!(err.message.is_none());
    }
}

//! Endpoint paths, header names and response types.

use serde::Deserialize;

/// Header carrying the client identifier on the auth request.
pub const CLIENT_ID_HEADER: &str = "client-id";

/// Header carrying the client secret on the auth request.
pub const CLIENT_SECRET_HEADER: &str = "client-secret";

/// Media type of FHIR JSON request and response bodies.
pub const FHIR_JSON: &str = "application/fhir+json";

/// Resource type used for patient records.
pub const PATIENT: &str = "Patient";

/// Body returned by a create. Some servers return an empty body and a
/// `Location` header instead.
#[derive(Debug, Deserialize)]
pub struct CreatedResource {
    #[serde(default)]
    pub id: Option<String>,
}

/// FHIR error body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub resource_type: String,
    #[serde(default)]
    pub issue: Vec<OutcomeIssue>,
}

#[derive(Debug, Deserialize)]
pub struct OutcomeIssue {
    #[serde(default)]
    pub diagnostics: Option<String>,
}

impl OperationOutcome {
    /// All issue diagnostics joined with `; `, if any.
    pub fn diagnostics(&self) -> Option<String> {
        let messages: Vec<&str> = self
            .issue
            .iter()
            .filter_map(|i| i.diagnostics.as_deref())
            .collect();
        (!messages.is_empty()).then(|| messages.join("; "))
    }
}

/// Extract the logical id from a `Location` header such as
/// `https://host/R4/Patient/123/_history/1`.
pub fn id_from_location<'a>(location: &'a str, resource_type: &str) -> Option<&'a str> {
    let mut segments = location.split(['/', '?']);
    segments.find(|s| *s == resource_type)?;
    segments.next().filter(|s| !s.is_empty())
}

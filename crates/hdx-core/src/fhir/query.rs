//! Patient query (`$query`) payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Purpose of use declared when submitting a patient query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Purpose {
    #[default]
    Treatment,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Treatment => "TREATMENT",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Parameters` resource posted to `Patient/{id}/$query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    pub resource_type: String,
    pub parameter: Vec<QueryParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameter {
    pub name: String,
    pub value_string: String,
}

impl QueryParameters {
    /// Build the request body for the given purpose of use.
    pub fn for_purpose(purpose: Purpose) -> Self {
        Self {
            resource_type: "Parameters".to_string(),
            parameter: vec![QueryParameter {
                name: "purpose".to_string(),
                value_string: purpose.as_str().to_string(),
            }],
        }
    }
}

/// Body of a completed `$query` status response.
///
/// Lists the resource URLs produced by the query. Servers may omit it;
/// readiness is decided by the status code alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryManifest {
    #[serde(default)]
    pub transaction_time: Option<String>,
    #[serde(default)]
    pub request: Option<String>,
    #[serde(default)]
    pub requires_access_token: bool,
    #[serde(default)]
    pub output: Vec<ManifestOutput>,
}

/// One output listed in a [`QueryManifest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestOutput {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub url: String,
}

/// What a single `$query` status check observed.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus {
    /// HTTP 200: results are ready to fetch.
    Ready(Option<QueryManifest>),

    /// Any other status. Pending and failing servers are not distinguished.
    Pending { status: u16 },
}

impl QueryStatus {
    /// Classify an HTTP status; only 200 means ready.
    pub fn from_status(status: u16, manifest: Option<QueryManifest>) -> Self {
        if status == 200 {
            QueryStatus::Ready(manifest)
        } else {
            QueryStatus::Pending { status }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, QueryStatus::Ready(_))
    }

    /// Take the manifest of a ready status.
    pub fn into_manifest(self) -> Option<QueryManifest> {
        match self {
            QueryStatus::Ready(manifest) => manifest,
            QueryStatus::Pending { .. } => None,
        }
    }
}

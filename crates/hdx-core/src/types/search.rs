//! Preset resource-collection URLs.

use std::fmt;

use super::RecordId;

/// A preset resource-collection request for one patient.
///
/// Rendered as a reference relative to the FHIR root; resolve it with
/// [`BaseUrl::fhir_url`](crate::BaseUrl::fhir_url).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchUrl {
    /// `Patient/{id}/$everything`: every resource linked to the patient.
    Everything(RecordId),

    /// `MedicationStatement?patient={id}` plus optional extra parameters.
    ///
    /// The extra parameters are appended verbatim and must start with `&`,
    /// e.g. `&effective=gt2020-04-29T01:00:00&_count=1000`.
    MedicationStatement {
        patient: RecordId,
        params: Option<String>,
    },
}

impl SearchUrl {
    /// Search for medication statements without extra parameters.
    pub fn medication_statements(patient: RecordId) -> Self {
        Self::MedicationStatement {
            patient,
            params: None,
        }
    }

    /// Returns the reference relative to the FHIR root.
    pub fn to_reference(&self) -> String {
        match self {
            SearchUrl::Everything(id) => format!("Patient/{}/$everything", id),
            SearchUrl::MedicationStatement { patient, params } => {
                let mut url = format!("MedicationStatement?patient={}", patient);
                if let Some(params) = params {
                    url.push_str(params);
                }
                url
            }
        }
    }

    /// Short label used in logs and output file names.
    pub fn label(&self) -> &'static str {
        match self {
            SearchUrl::Everything(_) => "everything",
            SearchUrl::MedicationStatement { .. } => "medication-statements",
        }
    }
}

impl fmt::Display for SearchUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_reference())
    }
}

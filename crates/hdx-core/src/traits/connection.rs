//! Authenticated connection trait.

use async_trait::async_trait;
use url::Url;

use crate::fhir::{Page, QueryStatus};
use crate::types::{BaseUrl, RecordId};
use crate::Result;

/// An authenticated connection to a FHIR server.
///
/// The poller and the paginator only use these read operations. The
/// connection is passed explicitly to every operation.
#[async_trait]
pub trait FhirConnection: Send + Sync {
    /// Returns the base URL this connection talks to.
    fn base_url(&self) -> &BaseUrl;

    /// Check once whether the patient's query has completed.
    ///
    /// Any HTTP status is a valid observation; only transport failures are
    /// errors.
    async fn query_status(&self, patient: &RecordId) -> Result<QueryStatus>;

    /// Fetch one bundle page.
    async fn fetch_page(&self, url: &Url) -> Result<Page>;

    /// Resolve a FHIR path or link against the FHIR root.
    fn resolve(&self, reference: &str) -> Result<Url> {
        self.base_url().fhir_url(reference)
    }
}

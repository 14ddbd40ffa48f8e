//! FHIR payload types.
//!
//! Resources are passed through as raw JSON; only the envelope fields the
//! client acts on (bundle entries and links, query parameters and manifests)
//! are modelled. Fetch and query operations live on
//! [`FhirConnection`](crate::FhirConnection) and in [`poll`](crate::poll) /
//! [`paginate`](crate::paginate).

mod bundle;
mod query;

pub use bundle::{BundleEntry, BundleLink, Page, ResourceCollection};
pub use query::{
    ManifestOutput, Purpose, QueryManifest, QueryParameter, QueryParameters, QueryStatus,
};

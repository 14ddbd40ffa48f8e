//! hdx-core - types, query poller and bundle paginator for a health-data
//! exchange client.
//!
//! Transport is abstracted behind [`FhirConnection`]; the `hdx-http` crate
//! provides the HTTP implementation.
//!
//! # Example
//!
//! ```no_run
//! use hdx_core::{FhirConnection, PageLimit, PollConfig, RecordId, SearchUrl};
//!
//! # async fn example(conn: &impl FhirConnection, patient: RecordId) -> hdx_core::Result<()> {
//! hdx_core::poll::wait_for_query(conn, &patient, PollConfig::default()).await?;
//!
//! let everything = SearchUrl::Everything(patient);
//! let resources = hdx_core::paginate::fetch_search(conn, &everything, PageLimit::Unbounded).await?;
//! println!("retrieved {} resources", resources.len());
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod error;
pub mod fhir;
pub mod paginate;
pub mod poll;
pub mod tokens;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_support;

pub use credentials::Credentials;
pub use error::Error;
pub use fhir::{Page, Purpose, QueryManifest, QueryStatus, ResourceCollection};
pub use paginate::PageLimit;
pub use poll::{PollConfig, QueryOutcome};
pub use tokens::AccessToken;
pub use traits::FhirConnection;
pub use types::{BaseUrl, RecordId, SearchUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

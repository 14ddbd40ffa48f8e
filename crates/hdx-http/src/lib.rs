//! hdx-http - reqwest-backed transport for the hdx client.
//!
//! [`Authenticator`] exchanges client credentials for a token;
//! [`HttpConnection`] carries that token into patient creation, query
//! submission, and the [`FhirConnection`](hdx_core::FhirConnection)
//! operations the poller and paginator use.

mod auth;
mod client;
mod connection;
mod endpoints;
mod error;

pub use auth::Authenticator;
pub use connection::{HttpConnection, Submission};

//! Core traits for transport-backed connections.

mod connection;

pub use connection::FhirConnection;

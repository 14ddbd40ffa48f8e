//! Validated types for the health-data exchange client.

mod base_url;
mod record_id;
mod search;

pub use base_url::BaseUrl;
pub use record_id::RecordId;
pub use search::SearchUrl;

//! REST API endpoint implementations.
//!
//! Each endpoint is a free async function taking the HTTP client, base URL,
//! credentials and retry policy explicitly; [`crate::ElasticClient`] wraps
//! them with its own state.

mod info;
mod request;
mod saved_objects;
pub mod url_encoding;
mod watcher;

pub use info::get_cluster_info;
pub use request::{RetryPolicy, send_request_with_retry, with_common_headers};
pub use saved_objects::bulk_create_saved_objects;
pub use watcher::put_watch;

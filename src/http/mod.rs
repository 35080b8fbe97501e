//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the API handlers and the asset
//! server: response builders, `ETag`/cache handling, and MIME detection.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use response::{
    apply_cors, build_304_response, build_405_response, build_413_response,
    build_file_response, build_options_response, json_error, json_response, ErrorBody,
};

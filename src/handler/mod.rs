//! Request handler module
//!
//! Routes requests to the catalog API, the frontend asset tree, or the
//! SPA fallback.

pub mod fallback;
pub mod games;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;

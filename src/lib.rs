//! Games catalog server
//!
//! Read-only JSON API over a SQLite store of games, served next to a
//! single-page frontend bundle.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod provision;
pub mod server;
pub mod storage;

//! Daily Digest - a date-keyed news digest reader
//!
//! This crate provides the session state machine for browsing pre-computed
//! daily digests by date and category tab, and a small proxy server that
//! forwards digest requests to the upstream API with CORS and timeout
//! handling.

pub mod cache;
pub mod config;
pub mod dates;
pub mod digest;
pub mod error;
pub mod fetcher;
pub mod routes;
pub mod session;
pub mod tabs;

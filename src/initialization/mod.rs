//! Shared resource setup.
//!
//! - HTTP client for the provider (timeout and user agent)
//! - DNS resolver used by enrichment
//! - Logger
//!
//! The database pool lives in [`crate::storage`].

mod client;
mod logger;
mod resolver;

pub use client::init_client;
pub use logger::init_logger_with;
pub use resolver::init_resolver;

//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, timeouts, batch sizes, cache lifetimes)
//! - Library configuration types (`ProviderConfig`, `Config`)
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Command, Opt};
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, ProviderConfig};

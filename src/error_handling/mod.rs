//! Error types.
//!
//! - `ProviderError`: a report call failed (transport, HTTP status, envelope code, shape)
//! - `EnrichmentError`: one domain could not be enriched or stored
//! - `DatabaseError`: storage layer failures
//! - `InitializationError`: logger or HTTP client setup failures

mod types;

// Re-export public API
pub use types::{
    DatabaseError, EnrichmentError, EnrichmentErrorKind, InitializationError, ProviderError,
};

//! Error handling and resolver statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, transport, parse, fetch)
//! - Resolver event counters
//!
//! Every fetch-side error is recovered inside the resolver and converted into
//! a deny; only initialization errors reach the caller of `new`.

mod stats;
mod types;

// Re-export public API
pub use stats::ResolverStats;
pub use types::{FetchError, InitializationError, ParseError, ResolverEvent, TransportError};

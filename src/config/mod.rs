//! Resolver configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, retry budget, timeouts, expiry layouts)
//! - Outbound header sets for the redirect page and the batch API
//! - The library configuration struct and the CLI option types

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{LogFormat, LogLevel, Opt, ResolverConfig};

//! entitlement_resolver library: fail-closed license checks against a remote table
//!
//! An entitlement table (identifier -> expiry) is published as an HTML table
//! behind a short-code page. This library fetches it, caches it per resolver,
//! and answers "is this identifier authorized right now?" with a boolean.
//! Any failure along the way (network, markup, unparseable expiry) is a `false`.
//!
//! # Example
//!
//! ```no_run
//! use entitlement_resolver::{EntitlementResolver, ResolverConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ResolverConfig {
//!     source_code: "q7Xk2".to_string(),
//!     password: Some("hunter2".to_string()),
//!     ..Default::default()
//! };
//!
//! let resolver = EntitlementResolver::new(&config)?;
//! println!("authorized: {}", resolver.is_authorized("3F1A9C2").await);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod cache;
pub mod config;
pub mod error_handling;
pub mod expiry;
pub mod fetch;
pub mod initialization;
pub mod markup;
mod models;
mod resolver;
pub mod transport;
mod utils;

// Re-export public API
pub use cache::EntitlementCache;
pub use config::{LogFormat, LogLevel, ResolverConfig};
pub use error_handling::{FetchError, InitializationError, ParseError, TransportError};
pub use models::{EntitlementRecord, EntitlementSet};
pub use resolver::EntitlementResolver;

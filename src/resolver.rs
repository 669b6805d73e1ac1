//! Resolver facade.
//!
//! One `EntitlementResolver` owns the cache and the strategy chain of one
//! remote source. A check reads the cache, fetches only when the cache is
//! empty, and turns every failure into `false`.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::cache::EntitlementCache;
use crate::config::ResolverConfig;
use crate::error_handling::{FetchError, InitializationError, ResolverEvent, ResolverStats};
use crate::expiry::is_unexpired;
use crate::fetch::RecordFetcher;
use crate::initialization::init_client;
use crate::models::EntitlementSet;
use crate::transport::{HttpTransport, Transport};

/// Fail-closed authorization checks against one remote entitlement table.
///
/// Safe to share between tasks (`Arc<EntitlementResolver>`). Concurrent
/// checks that all find the cache empty each run their own fetch and the
/// last successful one wins.
///
/// # Examples
///
/// ```no_run
/// use entitlement_resolver::{EntitlementResolver, ResolverConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = EntitlementResolver::new(&ResolverConfig::for_source("q7Xk2"))?;
/// if resolver.is_authorized("3F1A9C2").await {
///     println!("licensed");
/// }
/// # Ok(())
/// # }
/// ```
pub struct EntitlementResolver {
    cache: EntitlementCache,
    fetcher: RecordFetcher,
    stats: Arc<ResolverStats>,
}

impl EntitlementResolver {
    /// Builds a resolver that talks HTTP through a fresh client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, e.g. because the
    /// configured proxy URL is malformed.
    pub fn new(config: &ResolverConfig) -> Result<Self, InitializationError> {
        let client = init_client(config)?;
        Ok(Self::with_transport(config, Arc::new(HttpTransport::new(client))))
    }

    /// Builds a resolver over an arbitrary transport.
    pub fn with_transport(config: &ResolverConfig, transport: Arc<dyn Transport>) -> Self {
        let stats = Arc::new(ResolverStats::new());
        Self::with_fetcher(RecordFetcher::from_config(config, transport, stats))
    }

    /// Builds a resolver over a prepared strategy chain.
    pub fn with_fetcher(fetcher: RecordFetcher) -> Self {
        let stats = Arc::clone(fetcher.stats());
        EntitlementResolver {
            cache: EntitlementCache::new(),
            fetcher,
            stats,
        }
    }

    /// Checks `identifier` against the current local time.
    pub async fn is_authorized(&self, identifier: &str) -> bool {
        self.is_authorized_at(identifier, Local::now()).await
    }

    /// Checks `identifier` as of `now`.
    ///
    /// Returns `false` if the records cannot be fetched, the identifier is
    /// absent, or its expiry is unparseable or before `now`.
    pub async fn is_authorized_at(&self, identifier: &str, now: DateTime<Local>) -> bool {
        let snapshot = self.cache.read();
        let records = if snapshot.is_empty() {
            self.stats.record(ResolverEvent::CacheMiss);
            match self.refresh().await {
                Ok(records) => records,
                Err(e) => {
                    log::error!("Denying '{}': {}", identifier, e);
                    self.stats.record(ResolverEvent::Denied);
                    return false;
                }
            }
        } else {
            self.stats.record(ResolverEvent::CacheHit);
            snapshot
        };

        let allowed = match records.find(identifier) {
            Some(record) => is_unexpired(record.expiry_raw(), now),
            None => {
                log::debug!("Identifier '{}' is not in the entitlement table", identifier);
                false
            }
        };

        self.stats.record(if allowed {
            ResolverEvent::Allowed
        } else {
            ResolverEvent::Denied
        });
        allowed
    }

    /// Fetches the records now and replaces the cache on success.
    ///
    /// On failure the cache keeps its previous snapshot.
    pub async fn refresh(&self) -> Result<Arc<EntitlementSet>, FetchError> {
        match self.fetcher.fetch_records().await {
            Ok(set) => {
                self.stats.record(ResolverEvent::FetchSucceeded);
                Ok(self.cache.write(set))
            }
            Err(e) => {
                self.stats.record(ResolverEvent::FetchFailed);
                Err(e)
            }
        }
    }

    /// Current cache snapshot; empty until the first successful fetch.
    pub fn records(&self) -> Arc<EntitlementSet> {
        self.cache.read()
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }
}

//! Entitlement record fetching.
//!
//! This module provides:
//! - The `EntitlementStrategy` seam: one self-contained way to obtain records
//! - `ApiStrategy`: batch API POST, needs the source password
//! - `ScrapeStrategy`: source page -> client-side redirect -> table page
//! - `RecordFetcher`: tries strategies in order until one yields records
//!
//! A strategy that yields zero records has failed. If every strategy fails
//! the fetch fails with `FetchError::NoData`.

mod api;
mod scrape;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ResolverConfig;
use crate::error_handling::{FetchError, ResolverEvent, ResolverStats};
use crate::markup::{PatternTableExtractor, TableExtractor};
use crate::models::EntitlementSet;
use crate::transport::Transport;

pub use api::{build_envelope, extract_fragment, ApiStrategy};
pub use scrape::ScrapeStrategy;

/// One self-contained method of retrieving entitlement records.
#[async_trait]
pub trait EntitlementStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetches and parses records. An empty set counts as a failure upstream.
    async fn try_fetch(&self) -> Result<EntitlementSet, FetchError>;
}

/// Ordered chain of strategies for one remote source.
pub struct RecordFetcher {
    strategies: Vec<Box<dyn EntitlementStrategy>>,
    stats: Arc<ResolverStats>,
}

impl RecordFetcher {
    pub fn new(strategies: Vec<Box<dyn EntitlementStrategy>>) -> Self {
        Self::with_stats(strategies, Arc::new(ResolverStats::new()))
    }

    pub fn with_stats(
        strategies: Vec<Box<dyn EntitlementStrategy>>,
        stats: Arc<ResolverStats>,
    ) -> Self {
        RecordFetcher { strategies, stats }
    }

    /// Builds the standard chain: API strategy first when a password is
    /// configured, scrape strategy always.
    pub fn from_config(
        config: &ResolverConfig,
        transport: Arc<dyn Transport>,
        stats: Arc<ResolverStats>,
    ) -> Self {
        Self::from_config_with_extractor(config, transport, Arc::new(PatternTableExtractor), stats)
    }

    /// Like `from_config`, with a custom table extractor for every strategy.
    pub fn from_config_with_extractor(
        config: &ResolverConfig,
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn TableExtractor>,
        stats: Arc<ResolverStats>,
    ) -> Self {
        let mut strategies: Vec<Box<dyn EntitlementStrategy>> = Vec::new();

        if let Some(password) = config.password.as_deref() {
            strategies.push(Box::new(ApiStrategy::new(
                Arc::clone(&transport),
                config,
                password,
                Arc::clone(&extractor),
            )));
        }

        strategies.push(Box::new(ScrapeStrategy::new(transport, config, extractor)));

        Self::with_stats(strategies, stats)
    }

    pub fn stats(&self) -> &Arc<ResolverStats> {
        &self.stats
    }

    /// Names of the strategies, in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Runs the strategies in order and returns the first non-empty set.
    pub async fn fetch_records(&self) -> Result<EntitlementSet, FetchError> {
        for strategy in &self.strategies {
            match strategy.try_fetch().await {
                Ok(set) if !set.is_empty() => {
                    log::info!(
                        "Fetched {} entitlement records via {} strategy",
                        set.len(),
                        strategy.name()
                    );
                    return Ok(set);
                }
                Ok(_) => {
                    self.stats.record(ResolverEvent::StrategyFailed);
                    log::warn!("{} strategy produced no records", strategy.name());
                }
                Err(e) => {
                    self.stats.record(ResolverEvent::StrategyFailed);
                    log::warn!("{} strategy failed: {}", strategy.name(), e);
                }
            }
        }
        Err(FetchError::NoData)
    }
}

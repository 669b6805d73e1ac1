//! Scrape strategy.
//!
//! The public source page does not carry the table itself; it assigns the
//! real page to `jump_url` in an inline script. Both hops run under their
//! own attempt budget, and a reachable page that lacks the marker or the
//! table is retried like a connection failure. An empty `jump_url` or a
//! request that cannot be built ends the strategy at once.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use super::EntitlementStrategy;
use crate::config::{redirect_headers, ResolverConfig};
use crate::error_handling::{FetchError, ParseError};
use crate::markup::{extract_redirect, TableExtractor, TableMap};
use crate::models::EntitlementSet;
use crate::transport::{retry_with_policy, OutboundRequest, RetryPolicy, Transport};

/// Fetches the record table by following the source page's redirect.
pub struct ScrapeStrategy {
    transport: Arc<dyn Transport>,
    source_url: String,
    user_agent: String,
    policy: RetryPolicy,
    extractor: Arc<dyn TableExtractor>,
}

/// Resolves `target` against the page it was found on.
fn resolve_target(source_url: &str, target: &str) -> String {
    Url::parse(target)
        .or_else(|_| Url::parse(source_url).and_then(|base| base.join(target)))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| target.to_string())
}

impl ScrapeStrategy {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: &ResolverConfig,
        extractor: Arc<dyn TableExtractor>,
    ) -> Self {
        ScrapeStrategy {
            transport,
            source_url: config.source_url(),
            user_agent: config.user_agent.clone(),
            policy: RetryPolicy::new(config.max_attempts, config.retry_delay),
            extractor,
        }
    }

    async fn redirect_once(&self, request: &OutboundRequest) -> Result<String, FetchError> {
        let response = self.transport.execute(request).await?;
        let target = extract_redirect(&response.text()).ok_or(ParseError::RedirectNotFound)?;
        if target.is_empty() {
            return Err(ParseError::EmptyRedirect.into());
        }
        Ok(resolve_target(&self.source_url, &target))
    }

    async fn table_once(&self, request: &OutboundRequest) -> Result<TableMap, FetchError> {
        let response = self.transport.execute(request).await?;
        let table = self.extractor.extract_table(&response.text());
        if table.is_empty() {
            return Err(ParseError::TableNotFound.into());
        }
        Ok(table)
    }
}

#[async_trait]
impl EntitlementStrategy for ScrapeStrategy {
    fn name(&self) -> &'static str {
        "scrape"
    }

    async fn try_fetch(&self) -> Result<EntitlementSet, FetchError> {
        let source = OutboundRequest::get(self.source_url.clone());
        let label = format!("GET {}", self.source_url);
        let target = retry_with_policy(
            &self.policy,
            &label,
            || self.redirect_once(&source),
            FetchError::is_retryable,
        )
        .await?;
        log::debug!("Source page redirects to {}", target);

        let page = OutboundRequest::get(target.clone())
            .with_headers(redirect_headers(&self.user_agent));
        let label = format!("GET {}", target);
        let table = retry_with_policy(
            &self.policy,
            &label,
            || self.table_once(&page),
            FetchError::is_retryable,
        )
        .await?;

        Ok(EntitlementSet::from_table(table))
    }
}

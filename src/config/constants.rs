//! Configuration constants.
//!
//! This module defines the constants used as defaults throughout the resolver,
//! including remote endpoints, the retry budget and the accepted expiry layouts.

use std::time::Duration;

/// Base URL the source code is appended to for the scrape strategy.
pub const DEFAULT_SOURCE_BASE_URL: &str = "https://active.clewm.net/";

/// Batch endpoint used by the API strategy.
pub const DEFAULT_API_ENDPOINT: &str = "https://nc.cli.im/api/batch";

/// Route inside the batch envelope that returns the published record page.
pub const API_RECORD_ROUTE: &str = "/qrcoderoute/qrcodeRouteNew";

/// Origin presented to the batch API.
pub const API_ORIGIN: &str = "https://nc.cli.im";

/// Total attempts per fetch stage (initial attempt included).
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

/// Delay between attempts of one fetch stage.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Overall per-request deadline in seconds, enforced by the HTTP client.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Maximum response body size in bytes (2MB).
/// Larger bodies are treated as a body-read failure.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Default User-Agent string for outbound requests.
///
/// Matches a current desktop Edge build. Some publishing surfaces serve a
/// blocked or empty page to clients that do not look like a browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36 Edg/143.0.0.0";

/// Browser `accept` value sent with the redirect-target request.
pub const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Accepted expiry layouts in priority order.
///
/// The first layout that parses the trimmed expiry string wins. Layouts
/// without a time component resolve to local midnight.
pub const EXPIRY_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d",
];

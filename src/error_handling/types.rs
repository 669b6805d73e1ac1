//! Error type definitions.
//!
//! This module defines the error and event types used throughout the resolver.
//! None of the fetch errors escape `is_authorized`; they are logged and turned
//! into a deny.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configured proxy URL could not be used.
    #[error("Invalid proxy '{proxy}': {reason}")]
    InvalidProxyError { proxy: String, reason: String },
}

/// Failure of a single request attempt.
///
/// Everything except `InvalidRequest` is transient and goes through the
/// bounded retry again.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad header).
    #[error("Invalid request to {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    /// The connection could not be established.
    #[error("Connection to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    /// The per-request deadline elapsed.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Any other failure while sending the request.
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The response body could not be read in full.
    #[error("Reading body from {url} failed: {reason}")]
    Body { url: String, reason: String },
}

impl TransportError {
    /// Categorizes a `reqwest::Error` raised while sending to `url`.
    pub fn from_send(url: &str, error: &ReqwestError) -> Self {
        if error.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                reason: error.to_string(),
            }
        } else if error.is_builder() {
            TransportError::InvalidRequest {
                url: url.to_string(),
                reason: error.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }

    /// Categorizes a `reqwest::Error` raised while reading the body from `url`.
    pub fn from_body(url: &str, error: &ReqwestError) -> Self {
        if error.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else {
            TransportError::Body {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }

    /// Whether another attempt could succeed. A request that could not be
    /// built fails the same way every time.
    pub fn is_transient(&self) -> bool {
        !matches!(self, TransportError::InvalidRequest { .. })
    }
}

/// A reachable response did not have the expected HTML or JSON shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The source page carries no `jump_url` assignment.
    #[error("redirect target not found")]
    RedirectNotFound,

    /// The `jump_url` assignment is present but empty.
    #[error("redirect target is empty")]
    EmptyRedirect,

    /// No table with at least one usable row was found.
    #[error("table not found")]
    TableNotFound,

    /// A body was not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The batch envelope carried no response bodies.
    #[error("batch envelope carried no responses")]
    EmptyEnvelope,

    /// A field was missing somewhere along the nested path.
    #[error("missing field '{0}'")]
    MissingField(String),
}

/// Failure of one strategy or of the whole record fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Every strategy produced zero usable records.
    #[error("no data found")]
    NoData,
}

impl FetchError {
    /// Whether a scrape stage should try again after this error.
    ///
    /// Transient transport failures and pages missing the expected markup
    /// are retried; anything that would fail identically is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(e) => e.is_transient(),
            FetchError::Parse(ParseError::RedirectNotFound | ParseError::TableNotFound) => true,
            FetchError::Parse(_) | FetchError::NoData => false,
        }
    }
}

/// Observable outcomes of resolver operations.
///
/// Counted by `ResolverStats`; the only other externally visible signal is
/// the boolean returned by `is_authorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ResolverEvent {
    /// The cache held records when a check started.
    CacheHit,
    /// The cache was empty and a fetch was triggered.
    CacheMiss,
    /// A fetch produced records and replaced the cache.
    FetchSucceeded,
    /// A fetch produced no records; the cache was left unchanged.
    FetchFailed,
    /// One strategy failed and control moved on.
    StrategyFailed,
    /// A check returned true.
    Allowed,
    /// A check returned false.
    Denied,
}

impl std::fmt::Display for ResolverEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResolverEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolverEvent::CacheHit => "cache hit",
            ResolverEvent::CacheMiss => "cache miss",
            ResolverEvent::FetchSucceeded => "fetch succeeded",
            ResolverEvent::FetchFailed => "fetch failed",
            ResolverEvent::StrategyFailed => "strategy failed",
            ResolverEvent::Allowed => "allowed",
            ResolverEvent::Denied => "denied",
        }
    }
}

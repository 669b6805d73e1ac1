//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and resolver configuration.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_API_ENDPOINT, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_SOURCE_BASE_URL,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// One `ResolverConfig` describes one remote source. Resolvers built from
/// different configs never share state.
///
/// # Examples
///
/// ```no_run
/// use entitlement_resolver::ResolverConfig;
///
/// let config = ResolverConfig {
///     source_code: "q7Xk2".to_string(),
///     password: Some("hunter2".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Opaque route of the published record page (short code or route ID)
    pub source_code: String,

    /// Access password; enables the batch API strategy when present
    pub password: Option<String>,

    /// Base URL the source code is appended to
    pub source_base_url: String,

    /// Batch API endpoint
    pub api_endpoint: String,

    /// Outbound proxy URL applied to every request
    pub proxy: Option<String>,

    /// Overall per-request deadline in seconds
    pub timeout_seconds: u64,

    /// Total attempts per fetch stage
    pub max_attempts: usize,

    /// Delay between attempts of one fetch stage
    pub retry_delay: Duration,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl ResolverConfig {
    /// Builds a config for `source_code` with every other field defaulted.
    pub fn for_source(source_code: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            ..Default::default()
        }
    }

    /// Public page of the configured source.
    pub fn source_url(&self) -> String {
        format!("{}{}", self.source_base_url, self.source_code)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source_code: String::new(),
            password: None,
            source_base_url: DEFAULT_SOURCE_BASE_URL.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            proxy: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Command-line options for a single authorization query.
///
/// # Examples
///
/// ```bash
/// # Scrape strategy only
/// entitlement_resolver --source q7Xk2 --identifier 3F1A9C2
///
/// # Batch API first, password read from ENTITLEMENT_PASSWORD (or .env)
/// ENTITLEMENT_PASSWORD=hunter2 entitlement_resolver --source q7Xk2 --identifier 3F1A9C2
///
/// # Through a proxy
/// entitlement_resolver --source q7Xk2 --identifier 3F1A9C2 --proxy http://127.0.0.1:8080
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "entitlement_resolver",
    about = "Checks whether an identifier is authorized by a remote entitlement table."
)]
pub struct Opt {
    /// Source code of the published record page
    #[arg(long, env = "ENTITLEMENT_SOURCE")]
    pub source: String,

    /// Access password for the batch API
    #[arg(long, env = "ENTITLEMENT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Identifier (serial or machine fingerprint) to check
    #[arg(long)]
    pub identifier: String,

    /// Outbound proxy URL
    #[arg(long, env = "ENTITLEMENT_PROXY")]
    pub proxy: Option<String>,

    /// Base URL of the published record pages
    #[arg(long, default_value = DEFAULT_SOURCE_BASE_URL)]
    pub source_base_url: String,

    /// Batch API endpoint
    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Total attempts per fetch stage
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Delay between attempts in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub retry_delay_ms: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<&Opt> for ResolverConfig {
    fn from(opt: &Opt) -> Self {
        ResolverConfig {
            source_code: opt.source.clone(),
            password: opt.password.clone().filter(|p| !p.is_empty()),
            source_base_url: opt.source_base_url.clone(),
            api_endpoint: opt.api_endpoint.clone(),
            proxy: opt.proxy.clone().filter(|p| !p.is_empty()),
            timeout_seconds: opt.timeout_seconds,
            max_attempts: opt.max_attempts,
            retry_delay: Duration::from_millis(opt.retry_delay_ms),
            user_agent: opt.user_agent.clone(),
        }
    }
}

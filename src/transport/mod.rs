//! Outbound request execution.
//!
//! This module provides:
//! - The `Transport` seam (one request, one response) and its reqwest implementation
//! - The bounded retry primitive shared by every fetch stage
//! - `fetch`, the Transport Fetcher: one request retried on connection/read failure
//!
//! A reachable response with a non-2xx status is data, not an error: it is
//! returned to the caller and never retried here.

mod http;
mod retry;

use async_trait::async_trait;

use crate::error_handling::TransportError;

pub use http::HttpTransport;
pub use retry::{retry_with_policy, RetryPolicy};

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A fully described outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        OutboundRequest {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        OutboundRequest {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// Status and fully read body of a reachable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes exactly one outbound request.
///
/// Implementations must not retry; retrying is the caller's policy.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError>;
}

/// Issues `request`, retrying transient transport failures.
///
/// Makes at most `policy.max_attempts` attempts with `policy.delay` between
/// them. Any reachable response, whatever its status, ends the loop, and so
/// does a request that could not be built.
pub async fn fetch(
    transport: &dyn Transport,
    request: &OutboundRequest,
    policy: &RetryPolicy,
) -> Result<RawResponse, TransportError> {
    let label = format!("{} {}", request.method.as_str(), request.url);
    retry_with_policy(
        policy,
        &label,
        || transport.execute(request),
        TransportError::is_transient,
    )
    .await
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory transport used by unit tests across the crate.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted outcomes per URL and records every request it sees.
    pub(crate) struct ScriptedTransport {
        scripts: Mutex<Vec<(String, VecDeque<Result<RawResponse, TransportError>>)>>,
        seen: Mutex<Vec<OutboundRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new() -> Self {
            ScriptedTransport {
                scripts: Mutex::new(Vec::new()),
                seen: Mutex::new(Vec::new()),
            }
        }

        /// Queues one outcome for `url`. The last queued outcome repeats forever.
        pub(crate) fn push(&self, url: &str, outcome: Result<RawResponse, TransportError>) {
            let mut scripts = self.scripts.lock().expect("lock");
            if let Some((_, queue)) = scripts.iter_mut().find(|(u, _)| u == url) {
                queue.push_back(outcome);
            } else {
                scripts.push((url.to_string(), VecDeque::from([outcome])));
            }
        }

        pub(crate) fn ok(&self, url: &str, status: u16, body: &str) {
            self.push(
                url,
                Ok(RawResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                }),
            );
        }

        pub(crate) fn connect_error(&self, url: &str) {
            self.push(
                url,
                Err(TransportError::Connect {
                    url: url.to_string(),
                    reason: "connection refused".to_string(),
                }),
            );
        }

        /// Drops every outcome still queued for `url`.
        pub(crate) fn reset(&self, url: &str) {
            self.scripts.lock().expect("lock").retain(|(u, _)| u != url);
        }

        pub(crate) fn requests(&self) -> Vec<OutboundRequest> {
            self.seen.lock().expect("lock").clone()
        }

        pub(crate) fn calls_to(&self, url: &str) -> usize {
            self.requests().iter().filter(|r| r.url == url).count()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
            self.seen.lock().expect("lock").push(request.clone());
            let mut scripts = self.scripts.lock().expect("lock");
            let queue = scripts
                .iter_mut()
                .find(|(u, _)| *u == request.url)
                .map(|(_, q)| q);
            match queue {
                Some(queue) if queue.len() > 1 => queue.pop_front().expect("non-empty queue"),
                Some(queue) => match queue.front() {
                    Some(outcome) => outcome.clone(),
                    None => Ok(RawResponse {
                        status: 404,
                        body: Vec::new(),
                    }),
                },
                None => Ok(RawResponse {
                    status: 404,
                    body: Vec::new(),
                }),
            }
        }
    }
}

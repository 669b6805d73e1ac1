//! `reqwest`-backed transport.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

use super::{Method, OutboundRequest, RawResponse, Transport};
use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::TransportError;

/// Transport over a shared `reqwest::Client`.
///
/// Timeouts and the outbound proxy live on the client (see
/// `initialization::init_client`), so they apply to every attempt alike.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<reqwest::Client>,
}

impl HttpTransport {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        HttpTransport { client }
    }

    fn build(&self, request: &OutboundRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TransportError::InvalidRequest {
                    url: request.url.clone(),
                    reason: format!("header name '{}': {}", name, e),
                }
            })?;
            let value =
                HeaderValue::from_str(value).map_err(|e| TransportError::InvalidRequest {
                    url: request.url.clone(),
                    reason: format!("header value for '{}': {}", name, e),
                })?;
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        Ok(builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        let response = self
            .build(request)?
            .send()
            .await
            .map_err(|e| TransportError::from_send(&request.url, &e))?;

        let status = response.status().as_u16();
        if let Some(length) = response.content_length() {
            if length as usize > MAX_RESPONSE_BODY_SIZE {
                return Err(TransportError::Body {
                    url: request.url.clone(),
                    reason: format!("body of {} bytes exceeds limit", length),
                });
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_body(&request.url, &e))?;
        if body.len() > MAX_RESPONSE_BODY_SIZE {
            return Err(TransportError::Body {
                url: request.url.clone(),
                reason: format!("body of {} bytes exceeds limit", body.len()),
            });
        }

        log::debug!(
            "{} {} -> {} ({} bytes)",
            request.method.as_str(),
            request.url,
            status,
            body.len()
        );

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

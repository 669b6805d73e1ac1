//! Batch API strategy.
//!
//! One POST to the batch endpoint carries the form-encoded `{code, password}`
//! payload for the record route. The first response body of the envelope is
//! itself JSON, and the published table is an HTML fragment nested inside it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EntitlementStrategy;
use crate::config::{api_headers, ResolverConfig, API_RECORD_ROUTE};
use crate::error_handling::{FetchError, ParseError};
use crate::markup::TableExtractor;
use crate::models::EntitlementSet;
use crate::transport::{fetch, OutboundRequest, RetryPolicy, Transport};

#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    requests: Vec<BatchCall<'a>>,
}

#[derive(Debug, Serialize)]
struct BatchCall<'a> {
    method: &'a str,
    url: &'a str,
    body: String,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    responses: Vec<BatchItem>,
}

#[derive(Debug, Deserialize)]
struct BatchItem {
    #[serde(default)]
    body: Value,
}

/// One step along the nested path to the HTML fragment.
enum Step {
    Key(&'static str),
    Index(usize),
}

const FRAGMENT_PATH: &[Step] = &[
    Step::Key("data"),
    Step::Key("qrcode_msg"),
    Step::Key("qrcode_component"),
    Step::Index(0),
    Step::Key("attribute_list"),
    Step::Index(0),
    Step::Key("content_html"),
    Step::Key("value"),
];

const FRAGMENT_PATH_LABEL: &str =
    "data.qrcode_msg.qrcode_component[0].attribute_list[0].content_html.value";

/// Serializes the batch envelope for one record-route call.
pub fn build_envelope(source_code: &str, password: &str) -> String {
    let form = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("code", source_code)
        .append_pair("password", password)
        .finish();
    let request = BatchRequest {
        requests: vec![BatchCall {
            method: "POST",
            url: API_RECORD_ROUTE,
            body: form,
        }],
    };
    // Serializing plain strings into a JSON object cannot fail
    serde_json::to_string(&request).unwrap_or_default()
}

fn walk<'v>(root: &'v Value, path: &[Step]) -> Result<&'v Value, ParseError> {
    let mut current = root;
    let mut trail = String::new();
    for step in path {
        let next = match step {
            Step::Key(key) => {
                if !trail.is_empty() {
                    trail.push('.');
                }
                trail.push_str(key);
                current.get(*key)
            }
            Step::Index(index) => {
                trail.push_str(&format!("[{}]", index));
                current.get(*index)
            }
        };
        current = next.ok_or_else(|| ParseError::MissingField(trail.clone()))?;
    }
    Ok(current)
}

/// Locates the HTML fragment inside a batch API response.
///
/// The first envelope body may be a JSON string holding the inner document
/// or the inner document itself.
pub fn extract_fragment(envelope: &str) -> Result<String, ParseError> {
    let outer: BatchResponse =
        serde_json::from_str(envelope).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let first = outer
        .responses
        .into_iter()
        .next()
        .ok_or(ParseError::EmptyEnvelope)?;

    let inner = match first.body {
        Value::String(text) => {
            serde_json::from_str(&text).map_err(|e| ParseError::InvalidJson(e.to_string()))?
        }
        Value::Null => return Err(ParseError::MissingField("responses[0].body".to_string())),
        other => other,
    };

    let fragment = walk(&inner, FRAGMENT_PATH)?;
    fragment
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ParseError::MissingField(FRAGMENT_PATH_LABEL.to_string()))
}

/// Fetches the record table through the batch API.
pub struct ApiStrategy {
    transport: Arc<dyn Transport>,
    endpoint: String,
    source_code: String,
    password: String,
    referer: String,
    user_agent: String,
    policy: RetryPolicy,
    extractor: Arc<dyn TableExtractor>,
}

impl ApiStrategy {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: &ResolverConfig,
        password: &str,
        extractor: Arc<dyn TableExtractor>,
    ) -> Self {
        ApiStrategy {
            transport,
            endpoint: config.api_endpoint.clone(),
            source_code: config.source_code.clone(),
            password: password.to_string(),
            referer: config.source_url(),
            user_agent: config.user_agent.clone(),
            policy: RetryPolicy::new(config.max_attempts, config.retry_delay),
            extractor,
        }
    }

    fn request(&self) -> OutboundRequest {
        OutboundRequest::post(
            self.endpoint.clone(),
            build_envelope(&self.source_code, &self.password),
        )
        .with_headers(api_headers(&self.user_agent, &self.referer))
    }
}

#[async_trait]
impl EntitlementStrategy for ApiStrategy {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn try_fetch(&self) -> Result<EntitlementSet, FetchError> {
        let response = fetch(self.transport.as_ref(), &self.request(), &self.policy).await?;
        if !response.is_success() {
            log::warn!(
                "Batch API answered {} for source {}",
                response.status,
                self.source_code
            );
        }

        let fragment = extract_fragment(&response.text())?;
        let table = self.extractor.extract_table(&fragment);
        if table.is_empty() {
            return Err(ParseError::TableNotFound.into());
        }
        Ok(EntitlementSet::from_table(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::PatternTableExtractor;
    use crate::transport::testing::ScriptedTransport;
    use std::time::Duration;

    const ENDPOINT: &str = "https://api.test/batch";

    fn inner_document(html: &str) -> Value {
        serde_json::json!({
            "data": {
                "qrcode_msg": {
                    "qrcode_component": [{
                        "attribute_list": [{
                            "content_html": { "value": html }
                        }]
                    }]
                }
            }
        })
    }

    fn envelope_with_string_body(html: &str) -> String {
        serde_json::json!({
            "responses": [{ "code": 200, "body": inner_document(html).to_string() }]
        })
        .to_string()
    }

    fn strategy(transport: Arc<ScriptedTransport>) -> ApiStrategy {
        let config = ResolverConfig {
            api_endpoint: ENDPOINT.to_string(),
            retry_delay: Duration::from_millis(1),
            ..ResolverConfig::for_source("q7Xk2")
        };
        ApiStrategy::new(transport, &config, "pw", Arc::new(PatternTableExtractor))
    }

    #[test]
    fn test_envelope_wraps_form_payload() {
        let envelope: Value =
            serde_json::from_str(&build_envelope("q7 Xk2", "p&w")).expect("valid json");
        let call = &envelope["requests"][0];
        assert_eq!(call["method"], "POST");
        assert_eq!(call["url"], API_RECORD_ROUTE);
        assert_eq!(call["body"], "code=q7+Xk2&password=p%26w");
    }

    #[test]
    fn test_fragment_from_string_body() {
        let html = "<table><tr><td>A</td><td>2999-01-01</td></tr></table>";
        let fragment = extract_fragment(&envelope_with_string_body(html)).expect("fragment");
        assert_eq!(fragment, html);
    }

    #[test]
    fn test_fragment_from_object_body() {
        let envelope = serde_json::json!({
            "responses": [{ "body": inner_document("<table></table>") }]
        })
        .to_string();
        assert_eq!(
            extract_fragment(&envelope).expect("fragment"),
            "<table></table>"
        );
    }

    #[test]
    fn test_malformed_outer_json() {
        assert!(matches!(
            extract_fragment("<html>502 Bad Gateway</html>"),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_empty_envelope() {
        assert_eq!(
            extract_fragment(r#"{"responses":[]}"#),
            Err(ParseError::EmptyEnvelope)
        );
        assert_eq!(extract_fragment("{}"), Err(ParseError::EmptyEnvelope));
    }

    #[test]
    fn test_malformed_inner_json() {
        let envelope = r#"{"responses":[{"body":"not json"}]}"#;
        assert!(matches!(
            extract_fragment(envelope),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_field_reports_path() {
        let inner = serde_json::json!({ "data": { "qrcode_msg": { "qrcode_component": [] } } });
        let envelope = serde_json::json!({ "responses": [{ "body": inner.to_string() }] }).to_string();
        assert_eq!(
            extract_fragment(&envelope),
            Err(ParseError::MissingField(
                "data.qrcode_msg.qrcode_component[0]".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_try_fetch_parses_records() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok(
            ENDPOINT,
            200,
            &envelope_with_string_body(
                "<table><tr><td>ABC123</td><td>2999-01-01</td></tr></table>",
            ),
        );

        let set = strategy(Arc::clone(&transport))
            .try_fetch()
            .await
            .expect("records");
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.find("ABC123").map(|r| r.expiry_raw()),
            Some("2999-01-01")
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        assert!(sent.body.as_deref().unwrap_or_default().contains("password=pw"));
        assert!(sent
            .headers
            .iter()
            .any(|(k, v)| k == "referer" && v.ends_with("/q7Xk2")));
    }

    #[tokio::test]
    async fn test_try_fetch_fragment_without_table_fails() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok(ENDPOINT, 200, &envelope_with_string_body("<p>expired</p>"));

        let err = strategy(transport).try_fetch().await.expect_err("no table");
        assert!(matches!(err, FetchError::Parse(ParseError::TableNotFound)));
    }

    #[tokio::test]
    async fn test_try_fetch_retries_transport_failures_only() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.connect_error(ENDPOINT);
        transport.ok(ENDPOINT, 200, "not json");

        let err = strategy(Arc::clone(&transport))
            .try_fetch()
            .await
            .expect_err("malformed");
        assert!(matches!(err, FetchError::Parse(ParseError::InvalidJson(_))));
        // One connection failure, one reachable malformed answer
        assert_eq!(transport.calls_to(ENDPOINT), 2);
    }
}

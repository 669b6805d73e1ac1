//! Outbound header sets.
//!
//! The redirect target and the batch API both reject requests that do not
//! carry browser-like headers, so each stage sends a fixed set.

use super::constants::{API_ORIGIN, BROWSER_ACCEPT};

/// Headers sent with the GET to the redirect target.
pub fn redirect_headers(user_agent: &str) -> Vec<(String, String)> {
    vec![
        ("accept".to_string(), BROWSER_ACCEPT.to_string()),
        ("user-agent".to_string(), user_agent.to_string()),
    ]
}

/// Headers sent with the batch API POST.
///
/// `referer` points at the public page of the source so the request looks
/// like it originates from the published page itself.
pub fn api_headers(user_agent: &str, referer: &str) -> Vec<(String, String)> {
    vec![
        (
            "accept".to_string(),
            "application/json, text/plain, */*".to_string(),
        ),
        (
            "accept-language".to_string(),
            "zh-CN,zh;q=0.9,en;q=0.8".to_string(),
        ),
        (
            "content-type".to_string(),
            "application/json;charset=UTF-8".to_string(),
        ),
        ("origin".to_string(), API_ORIGIN.to_string()),
        ("referer".to_string(), referer.to_string()),
        (
            "sec-ch-ua".to_string(),
            "\"Microsoft Edge\";v=\"143\", \"Chromium\";v=\"143\", \"Not A(Brand\";v=\"24\""
                .to_string(),
        ),
        ("sec-ch-ua-mobile".to_string(), "?0".to_string()),
        ("sec-ch-ua-platform".to_string(), "\"Windows\"".to_string()),
        ("sec-fetch-dest".to_string(), "empty".to_string()),
        ("sec-fetch-mode".to_string(), "cors".to_string()),
        ("sec-fetch-site".to_string(), "same-site".to_string()),
        ("user-agent".to_string(), user_agent.to_string()),
    ]
}

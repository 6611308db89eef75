//! Shared HTTP client for gallery page requests.
//!
//! Provides a configured [`reqwest::Client`] with a browser-like
//! User-Agent and a helper that fetches one HTML page, treating any
//! non-2xx status as a failure.

use crate::config::SearchConfig;
use crate::error::SearchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;

/// Desktop Chrome User-Agent sent when no custom one is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Build a [`reqwest::Client`] configured for gallery scraping.
///
/// The client has:
/// - The configured (or default) User-Agent
/// - `Accept: text/html` on every request
/// - A request timeout only when `timeout_seconds` is set
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("text/html"));

    let mut builder = reqwest::Client::builder()
        .user_agent(ua)
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Fetch `url` and return the response body as text.
///
/// # Errors
///
/// Returns [`SearchError::Http`] for network failures and non-2xx
/// statuses, or [`SearchError::Timeout`] when the client timeout fires.
pub async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<String, SearchError> {
    tracing::trace!(url, "fetching gallery page");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SearchError::from_reqwest(&format!("request to {url} failed"), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Http(format!(
            "HTTP {} fetching {url}",
            status.as_u16()
        )));
    }

    let html = response
        .text()
        .await
        .map_err(|e| SearchError::from_reqwest(&format!("reading {url} failed"), e))?;

    tracing::trace!(url, bytes = html.len(), "gallery page received");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn default_user_agent_is_browser_like() {
        assert!(DEFAULT_USER_AGENT.starts_with("Mozilla/5.0"));
        assert!(DEFAULT_USER_AGENT.contains("Chrome/"));
    }

    #[test]
    fn build_client_with_default_config() {
        assert!(build_client(&SearchConfig::default()).is_ok());
    }

    #[test]
    fn build_client_with_custom_ua_and_timeout() {
        let config = SearchConfig {
            user_agent: Some("DesignScout/1.0".into()),
            timeout_seconds: Some(5),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[tokio::test]
    async fn fetch_sends_identification_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("accept", "text/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_client(&SearchConfig::default()).expect("client");
        let body = fetch_html(&client, &format!("{}/", server.uri()))
            .await
            .expect("fetch should succeed");
        assert_eq!(body, "<html></html>");

        // The UA contains commas, which the header matcher splits on.
        let requests = server.received_requests().await.expect("recording enabled");
        let user_agent = requests[0]
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok());
        assert_eq!(user_agent, Some(DEFAULT_USER_AGENT));
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = build_client(&SearchConfig::default()).expect("client");
        let err = fetch_html(&client, &server.uri()).await.unwrap_err();
        assert!(matches!(err, SearchError::Http(_)));
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn slow_response_hits_configured_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html></html>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = SearchConfig {
            timeout_seconds: Some(1),
            ..Default::default()
        };
        let client = build_client(&config).expect("client");
        let err = fetch_html(&client, &server.uri()).await.unwrap_err();
        assert!(matches!(err, SearchError::Timeout(_)), "got {err:?}");
    }
}

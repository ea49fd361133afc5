use crate::core::config::HttpConfig;
use crate::core::price::PageFetcher;
use crate::providers::util::with_retry;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, instrument};

/// Several vendor sites reject requests that don't look like a browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_VIETNAMESE: &str = "vi-VN,vi;q=0.9,en-US;q=0.8,en;q=0.7";

/// Fetches vendor pages over HTTP with a bounded timeout.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl HttpPageFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_VIETNAMESE));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(name = "VendorPageFetch", skip(self), fields(url = %url))]
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Requesting vendor page");
        let response = with_retry(
            || async { self.client.get(url).send().await?.error_for_status() },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .with_context(|| format!("Request failed for {url}"))?;

        // Pages are read as UTF-8 whatever the response claims
        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;
        debug!(bytes = body.len(), "Received vendor page");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> HttpConfig {
        HttpConfig {
            timeout_secs: 5,
            retries: 0,
            retry_delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_identity() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gia-vang"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<table>Nhẫn</table>"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpPageFetcher::new(&config()).unwrap();
        let body = fetcher
            .fetch_page(&format!("{}/gia-vang", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<table>Nhẫn</table>");

        let requests = mock_server.received_requests().await.unwrap();
        let headers = &requests[0].headers;
        assert_eq!(headers.get("user-agent").unwrap(), USER_AGENT);
        assert_eq!(headers.get("accept-language").unwrap(), ACCEPT_VIETNAMESE);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let fetcher = HttpPageFetcher::new(&config()).unwrap();
        let url = format!("{}/", mock_server.uri());
        let err = fetcher.fetch_page(&url).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Request failed for {url}"));
        assert!(format!("{err:#}").contains("503"));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HttpPageFetcher::new(&HttpConfig {
            timeout_secs: 1,
            ..config()
        })
        .unwrap();
        let started = std::time::Instant::now();
        let err = fetcher.fetch_page(&mock_server.uri()).await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(3));
        assert!(format!("{err:#}").contains("Request failed for"));
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpPageFetcher::new(&HttpConfig {
            retries: 1,
            ..config()
        })
        .unwrap();
        let body = fetcher.fetch_page(&mock_server.uri()).await.unwrap();
        assert_eq!(body, "ok");
    }
}

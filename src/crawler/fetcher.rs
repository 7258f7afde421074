//! HTTP fetcher
//!
//! Builds the engine's HTTP client and fetches single pages. Redirects
//! follow the client's default policy; any non-2xx status or non-HTML
//! content type is reported as a per-page error for the caller to log
//! and move past.

use crate::config::CrawlerConfig;
use crate::ScourError;
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched HTML page
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Raw HTML body
    pub html: String,
}

/// Builds the HTTP client used for pages and robots.txt
///
/// The configured user agent is sent with every request; the configured
/// timeout applies per request.
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one URL, expecting a 2xx HTML response
///
/// # Errors
///
/// * `ScourError::Http` - Network failure or timeout
/// * `ScourError::HttpStatus` - Non-2xx response
/// * `ScourError::ContentType` - 2xx response that is not HTML
pub async fn fetch_html(client: &Client, url: &str) -> Result<FetchedPage, ScourError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ScourError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScourError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // An absent content type is given the benefit of the doubt.
    if !content_type.is_empty() && !content_type.contains("text/html") {
        return Err(ScourError::ContentType {
            url: url.to_string(),
            content_type,
        });
    }

    let final_url = response.url().to_string();
    let html = response.text().await.map_err(|source| ScourError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(FetchedPage {
        final_url,
        status: status.as_u16(),
        html,
    })
}

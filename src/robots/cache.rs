//! Per-origin robots.txt cache
//!
//! Rules are fetched once per origin and cached for the lifetime of the
//! process. Fetch failures and non-success responses degrade to allow-all
//! for that origin.

use crate::robots::parser::RobotsRules;
use crate::url::origin_key;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use url::Url;

/// Cached per-origin robots.txt decisions
pub struct RobotsPolicy {
    client: Client,
    user_agent: String,
    respect: bool,
    cache: Mutex<HashMap<String, Arc<OnceCell<RobotsRules>>>>,
}

impl RobotsPolicy {
    /// Creates a robots policy
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used to fetch `/robots.txt` (carries the
    ///   configured user agent)
    /// * `user_agent` - The agent string matched against `User-agent` groups
    /// * `respect` - When false, every URL is allowed without any fetch
    pub fn new(client: Client, user_agent: String, respect: bool) -> Self {
        Self {
            client,
            user_agent,
            respect,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Decides whether the configured agent may fetch this URL
    ///
    /// The first query for an origin fetches and parses its robots.txt;
    /// concurrent queries for the same origin share that single fetch.
    pub async fn allowed(&self, url: &Url) -> bool {
        if !self.respect {
            return true;
        }

        let origin = origin_key(url);
        let cell = {
            let mut cache = self.cache.lock().unwrap();
            cache
                .entry(origin.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let rules = cell
            .get_or_init(|| self.fetch_rules(origin.clone()))
            .await;

        rules.is_allowed(url.path())
    }

    /// Number of origins with cached rules
    pub fn cached_origins(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    async fn fetch_rules(&self, origin: String) -> RobotsRules {
        let robots_url = format!("{}/robots.txt", origin);
        tracing::debug!("Fetching robots.txt from {}", robots_url);

        match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => {
                    let rules = RobotsRules::parse(&body, &self.user_agent);
                    tracing::debug!(
                        "Parsed robots.txt for {}: {} disallow rules",
                        origin,
                        rules.rule_count()
                    );
                    rules
                }
                Err(e) => {
                    tracing::debug!("Failed to read robots.txt body for {}: {}", origin, e);
                    RobotsRules::allow_all()
                }
            },
            Ok(response) => {
                tracing::debug!(
                    "robots.txt for {} returned {}, allowing all",
                    origin,
                    response.status()
                );
                RobotsRules::allow_all()
            }
            Err(e) => {
                tracing::debug!("Failed to fetch robots.txt for {}: {}", origin, e);
                RobotsRules::allow_all()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_policy(respect: bool) -> RobotsPolicy {
        RobotsPolicy::new(Client::new(), "ScourBot/1.0".to_string(), respect)
    }

    #[tokio::test]
    async fn test_disallowed_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
            )
            .mount(&server)
            .await;

        let policy = test_policy(true);
        let blocked = Url::parse(&format!("{}/private/page", server.uri())).unwrap();
        let open = Url::parse(&format!("{}/public/page", server.uri())).unwrap();

        assert!(!policy.allowed(&blocked).await);
        assert!(policy.allowed(&open).await);
    }

    #[tokio::test]
    async fn test_missing_robots_allows_all() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let policy = test_policy(true);
        let url = Url::parse(&format!("{}/anything", server.uri())).unwrap();
        assert!(policy.allowed(&url).await);
    }

    #[tokio::test]
    async fn test_fetched_once_per_origin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /x"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let policy = test_policy(true);
        for i in 0..5 {
            let url = Url::parse(&format!("{}/page/{}", server.uri(), i)).unwrap();
            policy.allowed(&url).await;
        }
        assert_eq!(policy.cached_origins(), 1);
    }

    #[tokio::test]
    async fn test_respect_disabled_skips_fetch() {
        // No server at this address; a fetch attempt would show up as a
        // long connect failure rather than an instant allow.
        let policy = test_policy(false);
        let url = Url::parse("http://127.0.0.1:9/private").unwrap();
        assert!(policy.allowed(&url).await);
        assert_eq!(policy.cached_origins(), 0);
    }
}

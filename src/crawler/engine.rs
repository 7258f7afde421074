//! Crawl engine: worker pool draining the frontier
//!
//! One invocation runs the state machine idle -> running -> completed or
//! stopped. Workers take URLs from the frontier, consult the robots
//! policy, fetch and parse HTML, persist pages, and feed discovered links
//! back into the frontier. Natural completion is declared only when the
//! queue is empty and no worker holds an in-flight entry, so a transient
//! empty queue while a peer is mid-page never ends the session early.

use crate::config::CrawlerConfig;
use crate::crawler::events::CrawlEvent;
use crate::crawler::fetcher::{build_http_client, fetch_html};
use crate::crawler::parser::parse_page;
use crate::frontier::{Frontier, TakeOutcome};
use crate::robots::RobotsPolicy;
use crate::storage::{NewPage, SessionStatus, Store, StoreError};
use crate::url::{admissible, canonicalize, resolve};
use crate::{Result, ScourError};
use reqwest::Client;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use url::Url;

/// How long an idle worker waits before re-checking for drain
const IDLE_PROBE: Duration = Duration::from_millis(50);

/// Final accounting of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub session_id: i64,
    pub pages_crawled: u64,
    pub status: SessionStatus,
}

/// State shared between the engine handle and its workers
struct Shared {
    frontier: Frontier,
    crawled: AtomicU64,
    stop_requested: AtomicBool,
}

/// Concurrent crawl engine over a shared store
pub struct CrawlEngine {
    config: CrawlerConfig,
    store: Store,
    client: Client,
    robots: Arc<RobotsPolicy>,
    shared: Arc<Shared>,
    events: broadcast::Sender<CrawlEvent>,
    running: AtomicBool,
}

impl CrawlEngine {
    /// Creates an engine; no work starts until [`start`](CrawlEngine::start)
    pub fn new(config: CrawlerConfig, store: Store) -> Result<Self> {
        let client = build_http_client(&config)?;
        let robots = Arc::new(RobotsPolicy::new(
            client.clone(),
            config.user_agent.clone(),
            config.respect_robots_txt,
        ));

        Ok(Self {
            config,
            store,
            client,
            robots,
            shared: Arc::new(Shared {
                frontier: Frontier::new(),
                crawled: AtomicU64::new(0),
                stop_requested: AtomicBool::new(false),
            }),
            events: broadcast::channel(256).0,
            running: AtomicBool::new(false),
        })
    }

    /// Subscribes to progress events
    ///
    /// Events sent while nobody is subscribed are dropped.
    pub fn subscribe(&self) -> broadcast::Receiver<CrawlEvent> {
        self.events.subscribe()
    }

    /// Requests a stop of the running invocation
    ///
    /// Workers observe the flag between steps and exit promptly; blocked
    /// frontier takes are released. The remaining queue is dropped
    /// without processing.
    pub fn stop(&self) {
        self.shared.stop_requested.store(true, Ordering::SeqCst);
        self.shared.frontier.cancel();
    }

    /// Runs one crawl session to completion
    ///
    /// # Arguments
    ///
    /// * `seed` - Starting URL; canonicalization failure is fatal
    /// * `max_depth` - Maximum link depth followed from the seed
    /// * `max_pages` - Per-session page cap; defaults to the configured cap
    ///
    /// # Errors
    ///
    /// * `ScourError::InvalidSeed` - The seed did not canonicalize
    /// * `ScourError::AlreadyRunning` - Another invocation is active
    /// * `ScourError::Store` - The session could not be recorded
    pub async fn start(
        &self,
        seed: &str,
        max_depth: u32,
        max_pages: Option<u64>,
    ) -> Result<CrawlOutcome> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ScourError::AlreadyRunning);
        }

        let result = self.run(seed, max_depth, max_pages).await;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    async fn run(
        &self,
        seed: &str,
        max_depth: u32,
        max_pages: Option<u64>,
    ) -> Result<CrawlOutcome> {
        let seed_url = canonicalize(seed)
            .map_err(|e| ScourError::InvalidSeed(format!("{}: {}", seed, e)))?;
        let max_pages = max_pages.unwrap_or(self.config.max_pages);

        let session_id = self.store.create_session(seed_url.as_str(), max_depth)?;

        self.shared.frontier.reset();
        self.shared.crawled.store(0, Ordering::SeqCst);
        self.shared.stop_requested.store(false, Ordering::SeqCst);
        self.shared.frontier.offer(seed_url.as_str(), 0);

        let _ = self.events.send(CrawlEvent::Started {
            session_id,
            seed: seed_url.to_string(),
        });
        tracing::info!(
            "Crawl session {} started: seed={}, max_depth={}, max_pages={}, workers={}",
            session_id,
            seed_url,
            max_depth,
            max_pages,
            self.config.thread_pool_size
        );

        let mut workers = JoinSet::new();
        for worker_id in 0..self.config.thread_pool_size {
            let worker = Worker {
                id: worker_id,
                store: self.store.clone(),
                client: self.client.clone(),
                robots: self.robots.clone(),
                shared: self.shared.clone(),
                events: self.events.clone(),
                max_depth,
                max_pages,
                politeness: Duration::from_millis(self.config.delay_between_requests_ms),
            };
            workers.spawn(worker.run());
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Crawl worker panicked: {}", e);
            }
        }

        let pages_crawled = self.shared.crawled.load(Ordering::SeqCst);
        let status = if self.shared.stop_requested.load(Ordering::SeqCst) {
            SessionStatus::Stopped
        } else {
            SessionStatus::Completed
        };

        // Anything still queued is discarded with the session.
        self.shared.frontier.clear();

        self.store.update_session(session_id, pages_crawled, status)?;

        let event = match status {
            SessionStatus::Stopped => CrawlEvent::Stopped { pages_crawled },
            _ => CrawlEvent::Completed { pages_crawled },
        };
        let _ = self.events.send(event);

        tracing::info!(
            "Crawl session {} {}: {} pages",
            session_id,
            status.to_db_string(),
            pages_crawled
        );

        Ok(CrawlOutcome {
            session_id,
            pages_crawled,
            status,
        })
    }
}

/// One member of the crawl pool
struct Worker {
    id: usize,
    store: Store,
    client: Client,
    robots: Arc<RobotsPolicy>,
    shared: Arc<Shared>,
    events: broadcast::Sender<CrawlEvent>,
    max_depth: u32,
    max_pages: u64,
    politeness: Duration,
}

impl Worker {
    async fn run(self) {
        tracing::debug!("Worker {} up", self.id);

        loop {
            if self.shared.stop_requested.load(Ordering::SeqCst) {
                break;
            }

            match self.shared.frontier.take_or_idle(IDLE_PROBE).await {
                TakeOutcome::Cancelled => break,
                TakeOutcome::Idle => {
                    if self.shared.frontier.is_drained() {
                        // Natural completion; release the other workers.
                        self.shared.frontier.cancel();
                        break;
                    }
                }
                TakeOutcome::Item(url, depth) => {
                    self.process(&url, depth).await;
                    self.shared.frontier.task_done();
                }
            }
        }

        tracing::debug!("Worker {} down", self.id);
    }

    async fn process(&self, url: &str, depth: u32) {
        let _ = self.events.send(CrawlEvent::PageStart {
            url: url.to_string(),
            depth,
        });

        // The frontier only holds canonical URLs.
        let page_url = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                self.emit_error(url, depth, &e.to_string());
                return;
            }
        };

        if !self.robots.allowed(&page_url).await {
            tracing::debug!("Skipping {} (robots disallowed)", url);
            let _ = self.events.send(CrawlEvent::PageSkipped {
                url: url.to_string(),
                reason: "disallowed".to_string(),
            });
            return;
        }

        let fetched = match fetch_html(&self.client, url).await {
            Ok(f) => f,
            Err(e) => {
                self.emit_error(url, depth, &e.to_string());
                self.politeness_sleep().await;
                return;
            }
        };

        let parsed = parse_page(&fetched.html);

        let page_id = match self.store.insert_page(&NewPage {
            url: url.to_string(),
            title: parsed.title.clone(),
            body: parsed.body.clone(),
            depth,
        }) {
            Ok(id) => id,
            Err(StoreError::UrlExists(_)) => {
                // Another worker won the race for this URL.
                tracing::debug!("Duplicate URL skipped: {}", url);
                self.politeness_sleep().await;
                return;
            }
            Err(e) => {
                tracing::error!("Failed to persist {}: {}", url, e);
                self.emit_error(url, depth, &e.to_string());
                self.politeness_sleep().await;
                return;
            }
        };

        let crawled = self.shared.crawled.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.events.send(CrawlEvent::PageSuccess {
            url: url.to_string(),
            depth,
            page_id,
            crawled,
        });

        if crawled >= self.max_pages {
            tracing::info!("Page cap {} reached, stopping crawl", self.max_pages);
            self.shared.stop_requested.store(true, Ordering::SeqCst);
            self.shared.frontier.cancel();
            return;
        }

        if depth < self.max_depth {
            self.enqueue_links(&page_url, &parsed.links, depth + 1);
        }

        self.politeness_sleep().await;
    }

    /// Resolves, canonicalizes, and admits extracted links into the frontier
    fn enqueue_links(&self, page_url: &Url, hrefs: &[String], next_depth: u32) {
        for href in hrefs {
            let Ok(link) = resolve(page_url, href) else {
                continue;
            };
            if !admissible(link.as_str()) {
                continue;
            }
            // Duplicates drop silently.
            self.shared.frontier.offer(link.as_str(), next_depth);
        }
    }

    fn emit_error(&self, url: &str, depth: u32, error: &str) {
        tracing::warn!("Page error for {}: {}", url, error);
        let _ = self.events.send(CrawlEvent::PageError {
            url: url.to_string(),
            depth,
            error: error.to_string(),
        });
    }

    async fn politeness_sleep(&self) {
        if !self.shared.stop_requested.load(Ordering::SeqCst) {
            tokio::time::sleep(self.politeness).await;
        }
    }
}

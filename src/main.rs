//! Scour command-line interface
//!
//! Crawl a site into the local store, index it, and search it from the
//! terminal.

use anyhow::Context;
use clap::{Parser, Subcommand};
use scour::analyzer::Analyzer;
use scour::config::{load_config_or_default, Config};
use scour::crawler::{CrawlEngine, CrawlEvent};
use scour::index::InvertedIndex;
use scour::indexer::Indexer;
use scour::search::SearchEngine;
use scour::storage::Store;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Scour: a desktop web search engine
#[derive(Parser, Debug)]
#[command(name = "scour")]
#[command(version)]
#[command(about = "Crawl, index, and search a slice of the web locally", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl from a seed URL, then index the stored pages
    Crawl {
        /// Seed URL to start from
        seed: String,

        /// Maximum link depth (defaults to crawler.default-depth)
        #[arg(long)]
        depth: Option<u32>,

        /// Page cap for this session (defaults to crawler.max-pages)
        #[arg(long)]
        max_pages: Option<u64>,
    },

    /// (Re)index every stored page
    Index,

    /// Search the index
    Search {
        /// Query terms
        query: String,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Result page to show (1-based; enables pagination)
        #[arg(long)]
        page: Option<usize>,

        /// Results per page when paginating
        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },

    /// Show store statistics
    Stats,

    /// Delete all stored pages, postings, and sessions
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let store = Store::open(
        Path::new(&config.database.path),
        config.database.connection_pool_size,
    )
    .with_context(|| format!("Failed to open database at {}", config.database.path))?;

    match cli.command {
        Command::Crawl {
            seed,
            depth,
            max_pages,
        } => handle_crawl(&config, store, &seed, depth, max_pages).await,
        Command::Index => handle_index(&config, store),
        Command::Search {
            query,
            limit,
            page,
            page_size,
        } => handle_search(&config, store, &query, limit, page, page_size),
        Command::Stats => handle_stats(store),
        Command::Clear => handle_clear(store),
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scour=info,warn"),
            1 => EnvFilter::new("scour=debug,info"),
            2 => EnvFilter::new("scour=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Runs a crawl session and indexes what it stored
async fn handle_crawl(
    config: &Config,
    store: Store,
    seed: &str,
    depth: Option<u32>,
    max_pages: Option<u64>,
) -> anyhow::Result<()> {
    let depth = depth.unwrap_or(config.crawler.default_depth);

    let engine = CrawlEngine::new(config.crawler.clone(), store.clone())
        .context("Failed to build crawl engine")?;

    // Print progress as it happens.
    let mut events = engine.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                CrawlEvent::Started { session_id, seed } => {
                    println!("Session {} started from {}", session_id, seed);
                }
                CrawlEvent::PageSuccess { url, crawled, .. } => {
                    println!("  [{}] {}", crawled, url);
                }
                CrawlEvent::PageError { url, error, .. } => {
                    println!("  error: {} ({})", url, error);
                }
                CrawlEvent::PageSkipped { url, reason } => {
                    println!("  skipped: {} ({})", url, reason);
                }
                CrawlEvent::Completed { pages_crawled } => {
                    println!("Crawl completed: {} pages", pages_crawled);
                }
                CrawlEvent::Stopped { pages_crawled } => {
                    println!("Crawl stopped: {} pages", pages_crawled);
                }
                CrawlEvent::PageStart { .. } => {}
            }
        }
    });

    let outcome = engine.start(seed, depth, max_pages).await?;
    drop(engine);
    let _ = printer.await;

    println!(
        "\nSession {}: {} pages crawled",
        outcome.session_id, outcome.pages_crawled
    );

    // Make the new pages searchable right away.
    let index = Arc::new(InvertedIndex::new());
    let analyzer = Arc::new(Analyzer::new(&config.indexer));
    let indexer = Indexer::new(store, index, analyzer);
    let indexed = indexer.index_all_pages()?;
    println!("Indexed {} pages", indexed);

    Ok(())
}

/// Re-indexes every stored page
fn handle_index(config: &Config, store: Store) -> anyhow::Result<()> {
    let index = Arc::new(InvertedIndex::new());
    let analyzer = Arc::new(Analyzer::new(&config.indexer));
    let indexer = Indexer::new(store, index, analyzer);

    let indexed = indexer.index_all_pages()?;
    println!("Indexed {} pages", indexed);
    Ok(())
}

/// Rebuilds the in-memory index from the store and runs a query
fn handle_search(
    config: &Config,
    store: Store,
    query: &str,
    limit: Option<usize>,
    page: Option<usize>,
    page_size: usize,
) -> anyhow::Result<()> {
    let index = Arc::new(InvertedIndex::new());
    let analyzer = Arc::new(Analyzer::new(&config.indexer));

    let indexer = Indexer::new(store.clone(), index.clone(), analyzer.clone());
    indexer.rebuild_index()?;

    let engine = SearchEngine::new(index, store, analyzer, config.search.clone());
    let results = match page {
        Some(page) => engine.search_paginated(query, page, page_size),
        None => engine.search_with_limit(query, limit.unwrap_or(config.search.max_results)),
    };

    if results.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    for result in &results {
        println!("{}. {} (score {:.4})", result.rank, result.title, result.score);
        println!("   {}", result.url);
        println!("   {}", result.snippet);
        println!();
    }

    Ok(())
}

/// Prints store statistics
fn handle_stats(store: Store) -> anyhow::Result<()> {
    println!("Pages:    {}", store.count_pages()?);
    println!("Terms:    {}", store.count_words()?);
    println!("Postings: {}", store.count_postings()?);

    let sessions = store.list_sessions()?;
    println!("Sessions: {}", sessions.len());
    for session in sessions.iter().take(5) {
        println!(
            "  #{} {} [{}] {} pages, started {}",
            session.id,
            session.seed,
            session.status.to_db_string(),
            session.pages_crawled,
            session.started_at
        );
    }

    Ok(())
}

/// Wipes the store
fn handle_clear(store: Store) -> anyhow::Result<()> {
    store.clear_all()?;
    println!("Store cleared");
    Ok(())
}

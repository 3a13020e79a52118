//! weibo-spider main entry point
//!
//! This is the command-line interface for the Weibo friend-graph and
//! repost-tree crawler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use weibo_spider::config::{load_config_with_hash, Config};
use weibo_spider::crawler::{friends_spider, repost_spider, run_crawl, Spider};
use weibo_spider::output::print_statistics;
use weibo_spider::seeds::{load_seeds, RedisSeedSource, SeedError, SeedSource, StaticSeeds};

/// weibo-spider: crawls Weibo friend graphs and repost trees
///
/// Each seed id is expanded into one record: a user with all of their friend
/// ids, or a post with all of its reposts. Records are written as JSON Lines.
#[derive(Parser, Debug)]
#[command(name = "weibo-spider")]
#[command(version = "1.0.0")]
#[command(about = "Weibo friend-graph and repost-tree crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Which crawl to run
    #[arg(short, long, value_enum)]
    spider: SpiderKind,

    /// Seed id to crawl instead of the configured seed source (repeatable)
    #[arg(long = "seed", value_name = "ID")]
    seeds: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SpiderKind {
    /// User profiles with their friend ids (`friends_uids`)
    Friends,
    /// Posts with their reposts (`repost_timeline`)
    Reposts,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    match cli.spider {
        SpiderKind::Friends => handle_crawl(friends_spider(&config), &config, &cli).await,
        SpiderKind::Reposts => handle_crawl(repost_spider(&config), &config, &cli).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout may be carrying the records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("weibo_spider=info,warn"),
            1 => EnvFilter::new("weibo_spider=debug,info"),
            2 => EnvFilter::new("weibo_spider=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Picks the seed source: `--seed`, then `[seeds] ids`, then Redis
fn seed_source(cli: &Cli, config: &Config) -> Result<Box<dyn SeedSource>, SeedError> {
    if !cli.seeds.is_empty() {
        return Ok(Box::new(StaticSeeds::new(cli.seeds.clone())));
    }

    if !config.seeds.ids.is_empty() {
        return Ok(Box::new(StaticSeeds::new(config.seeds.ids.clone())));
    }

    match &config.seeds.redis_url {
        Some(url) => Ok(Box::new(RedisSeedSource::new(url)?)),
        None => Err(SeedError::NotConfigured),
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run<S: Spider>(spider: &S, config: &Config, seeds: &[String]) {
    println!("=== weibo-spider Dry Run ===\n");

    println!("Crawl:");
    println!("  Spider: {}", spider.name());
    println!("  Seed key: {}", spider.seed_key());

    println!("\nAPI:");
    println!("  Base URL: {}", config.api.base_url);
    println!(
        "  Access token: {}",
        if config.api.access_token.is_some() {
            "set"
        } else {
            "missing"
        }
    );
    println!("  Timeout: {}s", config.api.timeout_secs);

    println!("\nCrawler:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!(
        "  Retries: {} (entity), {} (empty page)",
        config.retry.entity_max_retries, config.retry.empty_page_max_retries
    );

    println!("\nOutput:");
    println!("  Items: {}", config.output.items_path);

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds.iter().take(20) {
        println!("  - {}", seed);
    }
    if seeds.len() > 20 {
        println!("  ... and {} more", seeds.len() - 20);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl<S: Spider>(
    spider: S,
    config: &Config,
    cli: &Cli,
) -> anyhow::Result<ExitCode> {
    let source = seed_source(cli, config)?;
    let seeds = load_seeds(source.as_ref(), &spider.seed_key())
        .await
        .context("failed to read seeds")?;

    if cli.dry_run {
        handle_dry_run(&spider, config, &seeds);
        return Ok(ExitCode::SUCCESS);
    }

    if config.api.access_token.is_none() {
        tracing::warn!("No access token configured; the API will reject most requests");
    }

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            on_signal.cancel();
        }
    });

    match run_crawl(spider, config, &seeds, shutdown).await {
        Ok(stats) => {
            if !cli.quiet {
                print_statistics(&stats);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_fatal_api_error() => {
            tracing::error!("{}", e);
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(anyhow::Error::new(e).context("crawl failed")),
    }
}

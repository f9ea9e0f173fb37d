//! Kino-Crawler main entry point
//!
//! This is the command-line interface for the Kino-Crawler film catalogue crawler.

use anyhow::Context;
use clap::Parser;
use kino_crawler::config::{load_config_with_hash, Config};
use kino_crawler::crawler::crawl;
use kino_crawler::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kino-Crawler: a chained film catalogue crawler
///
/// Kino-Crawler walks a wiki film category, reads each film's infobox,
/// looks up its rating on the rating site, and writes one CSV row per film
/// until the target number of records is reached.
#[derive(Parser, Debug)]
#[command(name = "kino-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A chained film catalogue crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the number of records to collect
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// Override the CSV output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if let Some(limit) = cli.limit {
        config.crawler.target_records = limit as usize;
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.to_string_lossy().into_owned();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kino_crawler=info,warn"),
            1 => EnvFilter::new("kino_crawler=debug,info"),
            2 => EnvFilter::new("kino_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Kino-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Target records: {}", config.crawler.target_records);
    println!("  Concurrent requests: {}", config.crawler.concurrent_requests);
    println!(
        "  Concurrent requests per domain: {}",
        config.crawler.concurrent_requests_per_domain
    );
    println!("  Download delay: {}ms", config.crawler.download_delay);
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nRetry:");
    println!("  Times: {}", config.retry.times);
    println!("  HTTP codes: {:?}", config.retry.http_codes);
    println!("  Backoff: {}ms", config.retry.backoff);

    println!("\nSites:");
    println!("  Next page label: {}", config.sites.next_page_label);
    println!("  Rating link: {}", config.sites.rating_link);
    println!("  Rating marker: {}", config.sites.rating_marker);
    println!("  Allowed domains ({}):", config.sites.allowed_domains.len());
    for domain in &config.sites.allowed_domains {
        println!("    - {}", domain);
    }

    println!("\nUser Agent:");
    println!("  Pool size: {}", config.user_agent.pool.len());
    println!("  Proxies: {}", config.user_agent.proxies.len());

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\nSeeds ({}):", config.sites.seeds.len());
    for seed in &config.sites.seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, target: {} records, output: {}",
        config.sites.seeds.len(),
        config.crawler.target_records,
        config.output.csv_path
    );

    let stats = crawl(config).await.context("crawl failed")?;

    println!();
    print_statistics(&stats);
    println!("✓ Records written to: {}", config.output.csv_path);

    Ok(())
}

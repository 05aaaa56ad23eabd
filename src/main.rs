use anyhow::Result;
use clap::{Parser, Subcommand};
use naver_keyword_scraper::browser::find_chromium;
use naver_keyword_scraper::{NaverKeywordScraper, ScraperConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "naver-keywords",
    about = "Collect keyword suggestions from Naver search via a headless browser",
    version
)]
struct Cli {
    /// Output the result envelope as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full collection pipeline for one query
    Scrape {
        /// The search term to collect keywords for
        query: String,
        /// Show the browser window instead of running headless
        #[arg(long)]
        no_headless: bool,
        /// Directory result files are written to
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// Navigation and element-wait deadline in milliseconds
        #[arg(long, default_value = "10000")]
        timeout: u64,
        /// Maximum result pages a collector may visit
        #[arg(long, default_value = "2")]
        max_pages: u32,
    },
    /// Check the environment: Chromium install, output directory
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scrape {
            query,
            no_headless,
            output_dir,
            timeout,
            max_pages,
        } => {
            let config = ScraperConfig {
                headless: !no_headless,
                output_dir,
                wait_timeout_ms: timeout,
                max_pages,
                ..Default::default()
            };
            let scraper = NaverKeywordScraper::new(config);
            let outcome = scraper.scrape(&query).await;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if outcome.success {
                println!("collected {} keywords for '{query}'", outcome.data.len());
                if let Some(stats) = &outcome.stats {
                    for (kind, count) in &stats.counts_by_type {
                        println!("  {kind}: {count}");
                    }
                    for issue in &stats.quality_issues {
                        println!("  warning: {issue}");
                    }
                }
                if let Some(path) = &outcome.filepath {
                    println!("results written to {}", path.display());
                }
            } else {
                eprintln!(
                    "scrape failed: {}",
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }

            if !outcome.success {
                std::process::exit(1);
            }
        }
        Commands::Doctor => {
            let config = ScraperConfig::default();
            match find_chromium(&config) {
                Some(path) => println!("chromium: {}", path.display()),
                None => {
                    println!(
                        "chromium: NOT FOUND (set NAVER_KEYWORDS_CHROME_PATH or install chromium)"
                    );
                }
            }
            match std::fs::create_dir_all(&config.output_dir) {
                Ok(()) => println!("output dir: {} (writable)", config.output_dir.display()),
                Err(e) => println!("output dir: {} ({e})", config.output_dir.display()),
            }
        }
    }

    Ok(())
}

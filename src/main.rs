//! Site-Intel main entry point
//!
//! This is the command-line interface for the website intelligence pipeline.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use site_intel::config::{default_config, load_config_with_hash, Config};
use site_intel::pipeline::{AnalysisMode, Pipeline};
use site_intel::storage::{open_storage, warm_cache, RecordStore, SqliteStorage};
use site_intel::url::normalize_seed;
use site_intel::Subject;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Intel: website intelligence pipeline
///
/// Discovers and analyzes the key pages of a company website, and enriches
/// company and person records from public sources.
#[derive(Parser, Debug)]
#[command(name = "site-intel")]
#[command(version)]
#[command(about = "Website intelligence pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the prioritized candidate pages of a site
    Discover {
        url: String,

        /// Maximum number of candidates (defaults to the configured page budget)
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Analyze a website and print the structured result
    Analyze {
        url: String,

        /// Use the fast preset (fewer pages, shorter timeouts)
        #[arg(long)]
        fast: bool,
    },

    /// Enrich a company from its website and public sources
    Enrich {
        website: String,

        /// Company-network page of the company
        #[arg(long)]
        linkedin: Option<String>,

        /// Ignore any cached record
        #[arg(long)]
        refresh: bool,
    },

    /// Scrape a person's public profile page
    Profile { url: String, name: String },

    /// Enrich every subject of a JSON array file
    Batch {
        #[arg(value_name = "SUBJECTS")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (default_config(), None),
    };

    let mut storage = open_configured_storage(&config, config_hash.as_deref())?;
    let pipeline = Pipeline::from_config(config)?;

    if let Some(store) = &storage {
        if pipeline.config().storage.warm_cache {
            warm_cache(store, &pipeline.state().cache).await?;
        }
    }

    match cli.command {
        Command::Discover { url, max_pages } => {
            let max_pages = max_pages.unwrap_or(pipeline.config().analysis.max_pages);
            let candidates = pipeline.discover_candidates(&url, max_pages).await?;
            for candidate in &candidates {
                println!(
                    "{:>3}  {:<8}  {}",
                    candidate.priority_score,
                    format!("{:?}", candidate.discovered_via).to_lowercase(),
                    candidate.url
                );
            }
        }

        Command::Analyze { url, fast } => {
            let result = match pipeline.analyze_website(&url, fast).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Analysis of {} failed: {}", url, e);
                    return Err(e.into());
                }
            };
            if let Some(store) = storage.as_mut() {
                let site = normalize_seed(&url)?;
                store.save_analysis(site.as_str(), AnalysisMode::from_fast(fast), &result)?;
            }
            print_json(&result)?;
        }

        Command::Enrich {
            website,
            linkedin,
            refresh,
        } => {
            let record = pipeline
                .enrich_company(&website, linkedin.as_deref(), refresh)
                .await?;
            if let Some(store) = storage.as_mut() {
                let key = pipeline.subject_key(&website, linkedin.as_deref())?;
                store.save_enrichment(&key, &record)?;
            }
            print_json(&record)?;
        }

        Command::Profile { url, name } => {
            let profile = pipeline.scrape_profile(&url, &name).await?;
            print_json(&profile)?;
        }

        Command::Batch { file } => {
            let subjects = read_subjects(&file)?;
            let result = pipeline
                .run_batch(&subjects, |done, total, failed| {
                    tracing::info!("Progress: {}/{} ({} failed)", done, total, failed);
                })
                .await?;

            if let Some(store) = storage.as_mut() {
                for item in result.items.iter().filter(|item| item.error.is_none()) {
                    let key = pipeline.subject_key(
                        &item.subject.website_url,
                        item.subject.company_linkedin_url.as_deref(),
                    )?;
                    store.save_enrichment(&key, &item.record.company_only())?;
                }
            }
            print_json(&result)?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_intel=info,warn"),
            1 => EnvFilter::new("site_intel=debug,info"),
            2 => EnvFilter::new("site_intel=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open_configured_storage(
    config: &Config,
    config_hash: Option<&str>,
) -> anyhow::Result<Option<SqliteStorage>> {
    let Some(path) = config.storage.database_path.as_deref() else {
        return Ok(None);
    };

    tracing::info!("Persisting results to {}", path);
    let storage = open_storage(Path::new(path))
        .with_context(|| format!("failed to open database {}", path))?;

    Ok(Some(match config_hash {
        Some(hash) => storage.with_config_hash(hash),
        None => storage,
    }))
}

fn read_subjects(path: &Path) -> anyhow::Result<Vec<Subject>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid subjects in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

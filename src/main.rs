//! Medimage main entry point
//!
//! Serves the image-resolution API, or resolves a single name from the
//! command line with `--resolve`.

use clap::Parser;
use medimage::config::load_config_with_hash;
use medimage::{api, Resolver};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Medimage: a rate-limited product image resolver
///
/// Medimage crawls a search engine's image results for named items, extracts
/// a plausible product image URL through layered heuristics, and caches
/// outcomes for 24 hours to respect the upstream rate limit.
#[derive(Parser, Debug)]
#[command(name = "medimage")]
#[command(version = "1.0.0")]
#[command(about = "A rate-limited product image resolver", long_about = None)]
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

    /// Resolve a single item name, print the result as JSON, and exit
    #[arg(long, value_name = "NAME")]
    resolve: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let resolver = Arc::new(Resolver::from_config(&config)?);

    match cli.resolve {
        Some(name) => {
            let resolution = resolver.resolve(&name).await?;
            println!(
                "{}",
                json!({
                    "imageUrl": resolution.image_url,
                    "source": resolution.source.as_str(),
                })
            );
        }
        None => {
            api::serve(&config, resolver).await?;
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
            0 => EnvFilter::new("medimage=info,warn"),
            1 => EnvFilter::new("medimage=debug,info"),
            2 => EnvFilter::new("medimage=trace,debug"),
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

//! nicheboard-admin - store maintenance from the command line
//!
//! **Usage:**
//! ```bash
//! nicheboard-admin [--store-url <URL>] [--access-key <KEY>] seed
//! nicheboard-admin check
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nicheboard_api::admin;
use nicheboard_common::config::StoreConfigResolver;
use nicheboard_common::store;
use tracing::info;

/// Nicheboard store maintenance
#[derive(Parser, Debug)]
#[command(name = "nicheboard-admin")]
#[command(about = "Seed and inspect the Nicheboard store")]
#[command(version)]
struct Args {
    /// Store endpoint URL (sqlite:... or https://...)
    #[arg(long, global = true)]
    store_url: Option<String>,

    /// Store access key
    #[arg(long, global = true)]
    access_key: Option<String>,

    /// TOML config file (default: ~/.config/nicheboard/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the sample niches, ideas, highlights and subreddits
    Seed,
    /// Print row counts and a one-line summary of every row
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "nicheboard-admin v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let mut resolver = StoreConfigResolver::new().with_cli(args.store_url, args.access_key);
    if let Some(path) = args.config {
        resolver = resolver.with_config_file(path);
    }
    let config = resolver.resolve()?;
    let store = store::connect(&config)
        .await
        .context("Failed to open store")?;

    match args.command {
        Command::Seed => {
            let summary = admin::seed(store.as_ref())
                .await
                .context("Seeding failed")?;
            println!(
                "Seeded {} niches, {} ideas, {} highlights, {} subreddits",
                summary.niches, summary.ideas, summary.highlights, summary.subreddits
            );
        }
        Command::Check => {
            let lines = admin::report(store.as_ref())
                .await
                .context("Failed to read store")?;
            for line in lines {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

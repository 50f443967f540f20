//! Pinakos CLI
//!
//! Administration entry point: serve the HTTP API, optionally seeding the
//! catalog from a JSON export first, or validate an export file on its own.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod import;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pinakos_api::{AppState, Config};
use pinakos_catalog::CatalogStore;
use pinakos_search::{Indexer, SearchEngine};
use std::path::PathBuf;
use std::sync::Arc;

/// Pinakos - art collection catalog and search service
#[derive(Parser, Debug)]
#[command(name = "pinakos")]
#[command(about = "Pinakos catalog and search administration tool", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "PINAKOS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve {
        /// Bind address override
        #[arg(long)]
        addr: Option<String>,

        /// Seed the catalog from a JSON export before serving
        #[arg(long)]
        import: Option<PathBuf>,
    },
    /// Load a JSON export, rebuild the index, and report what it contains
    Import {
        /// Export file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };

    match args.command {
        Command::Serve { addr, import } => {
            if let Some(addr) = addr {
                config.bind_addr = addr;
            }

            let catalog = Arc::new(CatalogStore::new());
            if let Some(path) = import {
                let stats = import::load_seed_file(&catalog, &path)?;
                tracing::info!("imported {stats}");
            }

            let engine = Arc::new(SearchEngine::new(catalog));
            engine.reindex_all();
            let indexer = Indexer::attach(engine.clone());

            let state =
                AppState::new(engine, config).with_indexer_state(indexer.state_receiver());
            pinakos_api::serve(state).await?;

            indexer.shutdown().await;
        }
        Command::Import { file } => {
            let catalog = Arc::new(CatalogStore::new());
            let stats = import::load_seed_file(&catalog, &file)?;

            let engine = SearchEngine::new(catalog);
            engine.reindex_all();

            tracing::info!("import ok: {stats}");
            tracing::info!("{} artworks indexed", engine.indexed_count());
        }
    }

    Ok(())
}

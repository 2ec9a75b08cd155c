//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_scout` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Wiring the scanner and serving the API
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use domain_scout::attribution::{AttributionCache, IpAttributor, NetworkOwnerSource};
use domain_scout::ct::{CertSpotterSource, CrtShSource, CtSource};
use domain_scout::initialization::{
    init_client, init_crypto_provider, init_logger_with, init_resolver,
};
use domain_scout::server::{start_api_server, AppState, ServerStats};
use domain_scout::{Config, ScanOptions, ScanStats, Scanner};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env (if present) before anything
    // reads RUST_LOG
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    if let Err(e) = run_server(config).await {
        eprintln!("domain_scout error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let client = init_client(&config.user_agent).context("Failed to initialize HTTP client")?;
    let resolver = init_resolver().context("Failed to initialize DNS resolver")?;

    // The attribution cache lives for the whole process: subdomains share
    // CDN/cloud infrastructure heavily, across scans as well as within one
    let cache = Arc::new(AttributionCache::new());
    let attributor = Arc::new(IpAttributor::new(
        Arc::new(NetworkOwnerSource::new(
            Arc::clone(&resolver),
            Arc::clone(&client),
        )),
        Arc::clone(&cache),
    ));

    let sources: Vec<Arc<dyn CtSource>> = vec![
        Arc::new(CrtShSource::new(Arc::clone(&client))),
        Arc::new(CertSpotterSource::new(Arc::clone(&client))),
    ];

    if config.no_owner_lookup {
        log::info!("IP ownership lookup disabled");
    }

    let options = ScanOptions {
        deadline: Duration::from_secs(config.scan_deadline_secs),
        owner_lookup: !config.no_owner_lookup,
        ..ScanOptions::default()
    };
    let scanner = Arc::new(Scanner::new(
        sources,
        resolver,
        attributor,
        Arc::new(ScanStats::new()),
        options,
    ));

    let state = AppState {
        scanner,
        server_stats: Arc::new(ServerStats::new()),
        cache,
    };
    start_api_server(&config.bind, config.port, state).await
}

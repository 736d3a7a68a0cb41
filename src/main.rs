//! Relay locator service.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                  RELAY LOCATOR                    │
//!                     │                                                   │
//!   GET /locate?...   │  ┌─────────┐    ┌──────────────┐    ┌──────────┐ │
//!   ──────────────────┼─▶│  http   │───▶│ QueryBuilder │───▶│  Query   │ │
//!                     │  │ server  │    │  (defaults)  │    │ Matcher  │ │
//!                     │  └────▲────┘    └──────────────┘    └────┬─────┘ │
//!                     │       │                                  │       │
//!   JSON response     │  ┌────┴─────┐                      ┌─────▼─────┐ │
//!   ◀─────────────────┼──│ response │                      │ snapshot  │◀┼── routers.json
//!                     │  │ encoder  │                      │ (ArcSwap) │ │   (watched)
//!                     │  └──────────┘                      └───────────┘ │
//!                     │                                                   │
//!                     │   config · logging · metrics · lifecycle          │
//!                     └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use relay_locator::config::{load_config, LocatorConfig};
use relay_locator::lifecycle::{signals, startup, Shutdown};
use relay_locator::observability::logging;
use relay_locator::LocatorServer;

#[derive(Parser)]
#[command(name = "relay-locator")]
#[command(about = "Finds the nearest routers offering a transport", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => LocatorConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("relay-locator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routers_path = %config.availability.path,
        watch = config.availability.watch,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let started = startup::start(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    let server = LocatorServer::new(&config, started.store.clone());
    server.run(listener, server_shutdown).await?;

    drop(started);
    tracing::info!("Shutdown complete");
    Ok(())
}

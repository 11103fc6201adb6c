//! Standalone webmock server.
//!
//! Serves cassettes from disk so non-Rust test suites can use the same
//! stub registry over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                   WEBMOCK                      │
//!                         │                                                │
//!     Client Request      │  ┌─────────┐    ┌────────────┐    ┌─────────┐  │
//!     ────────────────────┼─▶│  http   │───▶│ dispatcher │───▶│registry │  │
//!                         │  │ server  │    └─────┬──────┘    └────┬────┘  │
//!                         │  └─────────┘          │                │       │
//!     Client Response     │                       ▼                ▼       │
//!     ◀───────────────────┼──────────────── stub response    stub matcher  │
//!                         │                   or 404                       │
//!                         │                                                │
//!                         │  ┌──────────┐  ┌──────────┐  ┌──────────────┐  │
//!                         │  │ cassette │  │  admin   │  │ observability│  │
//!                         │  │ + watch  │  │   API    │  │              │  │
//!                         │  └──────────┘  └──────────┘  └──────────────┘  │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use webmock::config::{load_config, validate_config, ServerConfig};
use webmock::observability::{logging, metrics};
use webmock::MockServer;

#[derive(Parser)]
#[command(name = "webmock")]
#[command(about = "Serve canned HTTP responses from cassette files", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overrides the config file.
    #[arg(short, long)]
    bind: Option<String>,

    /// Cassette file or directory; repeat for several. Replaces configured paths.
    #[arg(long = "cassettes")]
    cassettes: Vec<PathBuf>,

    /// Reload cassettes when they change.
    #[arg(long)]
    watch: bool,

    /// Enable the admin API.
    #[arg(long)]
    admin: bool,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if !self.cassettes.is_empty() {
            config.cassettes.paths = self.cassettes;
        }
        config.cassettes.watch |= self.watch;
        config.admin.enabled |= self.admin;

        if let Err(errors) = validate_config(&config) {
            for e in &errors {
                eprintln!("invalid configuration: {}", e);
            }
            return Err("invalid configuration".into());
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(&config.observability.log_filter)?;
    tracing::info!("webmock v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let mut server = MockServer::with_config(config)?;
    server.start()?;

    tracing::info!(
        url = %server.url(),
        stubs = server.stubs().len(),
        "Listening for requests"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.stop().await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

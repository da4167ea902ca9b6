//! Upstream API relay (v1)
//!
//! Forwards caller-described requests to a fixed upstream REST API and fronts
//! an LLM completion service.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │                   API RELAY                    │
//!   POST /relay          │  ┌─────────┐   ┌──────────┐   ┌────────────┐  │
//!   ─────────────────────┼─▶│  http   │──▶│  relay   │──▶│  upstream  │──┼──▶ Upstream
//!                        │  │ server  │   │ handler  │   │   client   │  │    REST API
//!                        │  └────┬────┘   └──────────┘   └────────────┘  │
//!   POST /generate       │       │        ┌──────────┐   ┌────────────┐  │
//!   POST /greet ─────────┼───────┴───────▶│ prompts  │──▶│ completion │──┼──▶ LLM
//!                        │                └──────────┘   │  service   │  │
//!                        │                               └────────────┘  │
//!                        │  config · observability · lifecycle · security │
//!                        └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use api_relay::config::{load_config, ObservabilityConfig};
use api_relay::http::HttpServer;
use api_relay::lifecycle::{signals, Shutdown};
use api_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "api-relay")]
#[command(about = "Relay for an upstream REST API and an LLM completion service", long_about = None)]
struct Args {
    /// Path to a TOML config file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    logging::init_logging(&config.observability);

    tracing::info!("api-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        llm_enabled = config.llm.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

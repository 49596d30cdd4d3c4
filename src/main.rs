//! Booking platform API gateway.
//!
//! The admission and routing edge of a cinema ticket-booking platform,
//! built with Tokio and Axum.
//!
//! # Request Flow
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                     GATEWAY                       │
//!                    │                                                   │
//!  Client Request    │  request ID → trace → origin admission            │
//!  ──────────────────┼─▶   → access log → sanitize ──┐                   │
//!                    │                               ▼                   │
//!                    │     health ◀─────────── route table ──▶ 404       │
//!                    │                               │                   │
//!                    │                    /api/<group>, /<group>         │
//!                    │                               ▼                   │
//!  Client Response   │                        upstream forward           │
//!  ◀─────────────────┼───────────────────────  resource service          │
//!                    │                                                   │
//!                    └──────────────────────────────────────────────────┘
//! ```
//!
//! Rejected origins, malformed input and upstream failures all terminate in
//! the single error responder.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use booking_gateway::config::loader;
use booking_gateway::observability::{logging, metrics};
use booking_gateway::{GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "booking-gateway")]
#[command(about = "API gateway for the cinema booking platform", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults plus environment
    /// overrides are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Resolved once; immutable for the rest of the process lifetime.
    let config = loader::resolve_config(cli.config.as_deref())?;

    logging::init_tracing(&config.observability, config.environment);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "booking-gateway starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        allowed_origins = ?config.cors.allowed_origins,
        resources = config.resources.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = GatewayServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

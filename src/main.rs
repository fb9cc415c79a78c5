//! Text encryption service.
//!
//! A small HTTP service with two responsibilities:
//! - gate every request on the caller's network address (exact IPs and
//!   CIDR ranges from configuration, deny by default)
//! - encrypt and decrypt short text payloads under a server-held key
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request ──▶ ip_restriction middleware ──▶ encrypt/decrypt handlers
//!                              │                              │
//!                        security::AccessGuard          crypto::CipherService
//!
//!     Cross-cutting: config (TOML, validated at startup),
//!                    observability (tracing + Prometheus metrics)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use crypto_server::config::loader::load_config;
use crypto_server::config::ServerConfig;
use crypto_server::http::HttpServer;
use crypto_server::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "crypto-server", about = "IP-gated text encryption service")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before logging init so the configured level applies.
    let config = match args.config {
        Some(path) => load_config(&path)?,
        None => ServerConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!("crypto-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        allowed_entries = config.access.allowed_ips.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

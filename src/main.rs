//! Hello service (Consul watch + TTL check variant)
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                    HELLO SERVICE                      │
//!                  │                                                       │
//!   GET /hello     │  ┌─────────┐  read lock   ┌──────────────┐            │
//!   ───────────────┼─▶│  http   │─────────────▶│              │            │
//!   PUT /health/*  │  │ server  │  write lock  │ SharedConfig │            │
//!                  │  └─────────┘─────────────▶│              │            │
//!                  │                           └──────▲───────┘            │
//!                  │                    field writes  │   read lock        │
//!                  │  ┌──────────────────────┐        │   ┌─────────────┐  │
//!   Consul KV  ◀───┼──│ BlockingWatcher × N  │────────┘   │TtlHeartbeat │──┼──▶ Consul agent
//!   (long poll)    │  │ limiter + cursor     │            └─────────────┘  │    (check pass)
//!                  │  └──────────────────────┘                             │
//!                  └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use hello_service::config::{load_config, ConfigFile, ConfigWatcher, SharedConfig};
use hello_service::http::HttpServer;
use hello_service::lifecycle::signals::{reload_on_hangup, shutdown_on_signal};
use hello_service::lifecycle::{spawn_engine, Shutdown};
use hello_service::observability::logging::init_logging;
use hello_service::observability::metrics::init_metrics;
use hello_service::store::ConsulClient;

#[derive(Parser)]
#[command(name = "hello-service")]
#[command(about = "Hello service with Consul KV watches and a TTL check", long_about = None)]
struct Args {
    /// Hello service address.
    #[arg(long, default_value = "localhost:8080")]
    addr: String,

    /// Path to config file (JSON, or TOML with a .toml extension).
    #[arg(long = "cfg-file", default_value = "config.json")]
    cfg_file: PathBuf,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    metrics_addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load before logging so debug_mode can pick the level
    let loaded = load_config(&args.cfg_file);
    let settings = match &loaded {
        Ok(file) => file.clone().finalize(),
        Err(_) => ConfigFile::default().finalize(),
    };

    init_logging(settings.debug_mode);
    tracing::info!("hello-service v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = loaded {
        tracing::warn!(
            path = %args.cfg_file.display(),
            error = %e,
            "Failed to load config from file, using default"
        );
    }

    tracing::info!(
        consul_addr = %settings.consul_addr,
        kv_path = %settings.kv_path,
        keys = ?settings.keys_to_watch,
        ttl_interval = ?settings.ttl_interval,
        enable_checks = settings.enable_checks,
        "Configuration loaded"
    );

    if let Some(addr) = args.metrics_addr {
        init_metrics(addr);
    }

    let config = SharedConfig::new(settings);
    let shutdown = Shutdown::new();

    let consul = Arc::new(ConsulClient::new()?);
    let engine = spawn_engine(consul.clone(), consul, config.clone(), &shutdown);

    tokio::spawn(shutdown_on_signal(shutdown.clone()));
    tokio::spawn(reload_on_hangup(
        args.cfg_file.clone(),
        config.clone(),
        shutdown.subscribe(),
    ));

    // Dropping the watcher stops it, so keep it alive for the whole run
    let _config_watcher = match ConfigWatcher::new(&args.cfg_file, config.clone()).run() {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!(error = %e, "Config file watcher not started, reload with SIGHUP only");
            None
        }
    };

    let listener = match TcpListener::bind(&args.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %args.addr, error = %e, "Failed to bind listener");
            shutdown.trigger();
            engine.join().await;
            return Err(e.into());
        }
    };
    tracing::info!(address = %args.addr, "Hello service with TTL check listening");

    let served = HttpServer::new(config).run(listener, shutdown.subscribe()).await;

    shutdown.trigger();
    engine.join().await;
    served?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! Hello World web application with CSRF-protected forms.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ timeout ─▶ body limit
//!                                                          │
//!                                                          ▼
//!                                   session middleware (cookie → SessionStore)
//!                                                          │
//!                                                          ▼
//!                     ┌──────────────┬─────────────────────┴─────────────┐
//!                     │ GET /        │ GET /pretty         │ /contact    │
//!                     │ plain text   │ Tera template       │ Form + CSRF │
//!                     └──────────────┴─────────────────────┴─────────────┘
//!
//!     Cross-cutting: config (TOML, hot reload), observability (tracing, metrics),
//!                    lifecycle (graceful shutdown)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use hello_forms::config::{load_config, AppConfig, ConfigWatcher};
use hello_forms::observability::{logging, metrics};
use hello_forms::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "hello-forms")]
#[command(about = "Hello World web app with CSRF-protected forms", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload the configuration file when it changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("hello-forms v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        csrf_tokens = config.forms.csrf_tokens,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );
    if config.forms.csrf_tokens <= 0 {
        tracing::warn!(
            csrf_tokens = config.forms.csrf_tokens,
            "csrf_tokens retains no tokens; protected forms will always fail"
        );
    }

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

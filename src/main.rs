//! Exercise tracker web front.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                 EXERCISE-WEB                 │
//!   Client Request    │  ┌─────────┐   ┌──────────┐   ┌──────────┐   │
//!   ──────────────────┼─▶│  http   │──▶│ routing  │──▶│  views   │   │
//!                     │  │ server  │   │  table   │   │  render  │   │
//!                     │  └─────────┘   └──────────┘   └────┬─────┘   │
//!   Client Response   │                                    │         │
//!   ◀─────────────────┼────────────────────────────────────┘         │
//!                     │                                              │
//!                     │  config (toml + watcher)   observability     │
//!                     │  lifecycle (signals, shutdown)               │
//!                     └──────────────────────────────────────────────┘
//! ```
//!
//! Default routes: `/exercises` → NewExercise, `/` → Home.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use exercise_web::config::{load_config, watcher::ConfigWatcher, AppConfig};
use exercise_web::http::HttpServer;
use exercise_web::lifecycle::{signals, Shutdown};
use exercise_web::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "exercise-web")]
#[command(about = "Serves the exercise tracker's pages", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload routes when the config file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,

    /// Print the route table as JSON and exit.
    #[arg(long)]
    print_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "exercise-web starting");

    let server = HttpServer::new(config.clone())?;

    if cli.print_routes {
        println!("{}", serde_json::to_string_pretty(&server.site().routes)?);
        return Ok(());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
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

    // The watcher must outlive the server for reloads to keep flowing.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), rx)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::forward_to(shutdown.clone()));

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

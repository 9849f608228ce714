//! ringside-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), creates the
//! in-memory event store, and serves the webhook, status, and booking
//! endpoints over HTTP.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use ringside_server::{AppState, ServerConfig, router};
use ringside_store_memory::MemoryStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Ringside booking-call server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration. Environment variables override the file, e.g.
  // RINGSIDE_VENDOR__API_KEY for the vendor key.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("RINGSIDE").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // The store lives for the life of the process; both endpoint handlers
  // share this one instance by reference.
  let store = Arc::new(MemoryStore::with_capacity(server_cfg.store_capacity));

  let http = reqwest::Client::builder()
    .timeout(Duration::from_secs(30))
    .build()
    .context("failed to build HTTP client")?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState {
    http,
    config: Arc::new(server_cfg),
  };

  let app = router(store, state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

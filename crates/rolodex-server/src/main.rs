//! rolodex server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP.
//!
//! ```
//! cargo run -p rolodex-server -- --config config.toml
//! ROLODEX_PORT=9000 cargo run -p rolodex-server
//! ```

use std::path::PathBuf;

use clap::Parser;
use rolodex_server::ServerConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rolodex contact API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the listening port from the config file.
  #[arg(short, long)]
  port: Option<u16>,
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

  let mut config = ServerConfig::load(&cli.config)?;
  if let Some(port) = cli.port {
    config.port = port;
  }
  tracing::debug!(?config, "loaded configuration");

  rolodex_server::run(config).await
}

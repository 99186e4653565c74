//! gym-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus `GYM_*`
//! environment variables, opens the spreadsheet store under `data_root`, and
//! serves the JSON API and chat over HTTP.
//!
//! ```text
//! GYM_PORT=8080 GYM_OPENAI_API_KEY=sk-... gym-server --config config.toml
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use gym_chat::Backend;
use gym_server::{AppState, ServerConfig};
use gym_store_xlsx::XlsxStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Gym admin backend server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override `data_root` from the configuration.
  #[arg(long)]
  data_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("GYM"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if let Some(root) = cli.data_root {
    server_cfg.data_root = root;
  }
  server_cfg.data_root = expand_tilde(&server_cfg.data_root);
  // The conventional variable works as well as the prefixed one.
  if server_cfg.openai_api_key.is_none() {
    server_cfg.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
  }

  if !server_cfg.data_root.is_dir() {
    tracing::warn!(
      data_root = %server_cfg.data_root.display(),
      "data root does not exist; every category will read as empty"
    );
  }

  let backend = Backend::from_config(server_cfg.openai())
    .context("failed to build assistant client")?;
  let label = backend.describe();
  tracing::info!(assistant = %label, "chat backend ready");

  let store = Arc::new(XlsxStore::new(server_cfg.data_root.clone()));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let app = gym_server::router(AppState::new(store, backend, label, server_cfg));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

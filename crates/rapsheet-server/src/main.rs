//! rapsheet server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for an `[[accounts]]` entry:
//!
//! ```sh
//! cargo run -p rapsheet-server -- --hash-password
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rapsheet_api::AppState;
use rapsheet_core::{CriminalRecord, FlatRecord, Record};
use rapsheet_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{Schema, ServerConfig};

#[derive(Parser)]
#[command(author, version, about = "rapsheet record server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
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

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config)?;
  let store_path = server_cfg.resolved_store_path();

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match server_cfg.schema {
    Schema::Structured => serve::<CriminalRecord>(&server_cfg, store).await,
    Schema::Flat => serve::<FlatRecord>(&server_cfg, store).await,
  }
}

async fn serve<R: Record>(cfg: &ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  let owner = cfg.owner_identity()?;
  tracing::info!(%owner, schema = R::KIND, "registry initialised");

  let state: AppState<R, SqliteStore> = AppState::new(store, owner, cfg.auth());
  let app = rapsheet_api::api_router(state);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

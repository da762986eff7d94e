//! Server configuration, deserialised from `config.toml` and `RAPSHEET_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rapsheet_api::{Account, AuthConfig};
use rapsheet_core::Identity;
use serde::Deserialize;

/// Which record schema this server instance stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
  /// Personal, crime and prison details.
  #[default]
  Structured,
  /// Name, id, CNIC and sensitivity.
  Flat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
  pub username:      String,
  pub password_hash: String,
}

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub schema:     Schema,
  /// Username of the single account allowed to mutate records.
  pub owner:      String,
  #[serde(default)]
  pub accounts:   Vec<AccountConfig>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

impl ServerConfig {
  /// Read `path` (optional) layered under `RAPSHEET_*` environment variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("RAPSHEET"))
      .build()
      .context("failed to read config file")?;

    let cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.validate()?;
    Ok(cfg)
  }

  fn validate(&self) -> anyhow::Result<()> {
    if !self.accounts.iter().any(|a| a.username == self.owner) {
      anyhow::bail!(
        "owner {:?} has no entry in [[accounts]] and could never authenticate",
        self.owner
      );
    }
    Ok(())
  }

  pub fn owner_identity(&self) -> anyhow::Result<Identity> {
    Identity::new(self.owner.clone()).context("invalid owner identity")
  }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      accounts: self
        .accounts
        .iter()
        .map(|a| Account {
          username:      a.username.clone(),
          password_hash: a.password_hash.clone(),
        })
        .collect(),
    }
  }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
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

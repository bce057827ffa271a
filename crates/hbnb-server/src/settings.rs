//! Server settings, read from `config.toml` and `HBNB_*` variables.

use std::path::PathBuf;

use anyhow::{anyhow, ensure};
use chrono::TimeDelta;
use hbnb_store::{BackendKind, StorageConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub repository:      BackendKind,
  pub file_path:       PathBuf,
  pub blob_path:       PathBuf,
  pub database_url:    String,
  pub token_ttl_hours: i64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    let storage = StorageConfig::default();
    Self {
      host:            "127.0.0.1".to_owned(),
      port:            5000,
      repository:      storage.backend,
      file_path:       storage.file_path,
      blob_path:       storage.blob_path,
      database_url:    storage.database_url,
      token_ttl_hours: 24,
    }
  }
}

impl ServerConfig {
  pub fn storage(&self) -> StorageConfig {
    StorageConfig {
      backend:      self.repository,
      file_path:    self.file_path.clone(),
      blob_path:    self.blob_path.clone(),
      database_url: self.database_url.clone(),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// Token lifetime, rejecting values that are not positive or do not fit.
  pub fn token_ttl(&self) -> anyhow::Result<TimeDelta> {
    ensure!(
      self.token_ttl_hours > 0,
      "token_ttl_hours must be positive, got {}",
      self.token_ttl_hours
    );
    TimeDelta::try_hours(self.token_ttl_hours).ok_or_else(|| {
      anyhow!("token_ttl_hours is too large: {}", self.token_ttl_hours)
    })
  }
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_gives_defaults() {
    let cfg = parse("");
    assert_eq!(cfg.address(), "127.0.0.1:5000");
    assert_eq!(cfg.repository, BackendKind::Db);
    assert_eq!(cfg.database_url, "hbnb_dev.db");
    assert_eq!(cfg.token_ttl_hours, 24);
  }

  #[test]
  fn repository_names_are_parsed() {
    assert_eq!(parse("repository = \"pickle\"").repository, BackendKind::Blob);
    assert_eq!(parse("repository = \"file\"").storage().backend, BackendKind::File);
  }

  #[test]
  fn token_ttl_is_validated() {
    assert_eq!(parse("").token_ttl().unwrap(), TimeDelta::hours(24));
    assert!(parse("token_ttl_hours = 0").token_ttl().is_err());
    assert!(
      parse("token_ttl_hours = 9223372036854775807")
        .token_ttl()
        .is_err()
    );
  }

  #[test]
  fn unknown_repository_is_rejected() {
    let result = Config::builder()
      .add_source(File::from_str("repository = \"redis\"", FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize::<ServerConfig>();
    assert!(result.is_err());
  }
}

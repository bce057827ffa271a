//! Backend selection: [`BackendKind`], [`StorageConfig`] and [`Backend`].

use std::{fmt, path::PathBuf, str::FromStr, sync::Arc};

use hbnb_core::{record::Record, registry::TypeRegistry, repository::Repository};
use hbnb_store_sqlite::SqliteRepository;
use serde::Deserialize;
use tracing::info;

use crate::{
  BlobRepository, Error, FileRepository, MemoryRepository, Result,
};

/// Which storage strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
  /// Relational (SQLite).
  #[default]
  Db,
  /// One JSON document.
  File,
  /// One `bincode` blob.
  Blob,
  /// Process memory only.
  Memory,
}

impl FromStr for BackendKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "db" => Ok(Self::Db),
      "file" => Ok(Self::File),
      "pickle" | "blob" => Ok(Self::Blob),
      "memory" => Ok(Self::Memory),
      _ => Err(Error::UnknownBackend(s.to_owned())),
    }
  }
}

impl BackendKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Db => "db",
      Self::File => "file",
      Self::Blob => "pickle",
      Self::Memory => "memory",
    }
  }
}

impl fmt::Display for BackendKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for BackendKind {
  fn deserialize<D: serde::Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

/// Where each backend keeps its data.
#[derive(Debug, Clone)]
pub struct StorageConfig {
  pub backend:      BackendKind,
  pub file_path:    PathBuf,
  pub blob_path:    PathBuf,
  pub database_url: String,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      backend:      BackendKind::default(),
      file_path:    PathBuf::from("data.json"),
      blob_path:    PathBuf::from("data.pkl"),
      database_url: "hbnb_dev.db".to_owned(),
    }
  }
}

// ─── Backend ─────────────────────────────────────────────────────────────────

/// The configured repository, whichever kind it is.
pub enum Backend {
  Memory(MemoryRepository),
  File(FileRepository),
  Blob(BlobRepository),
  Sqlite(SqliteRepository),
}

impl Backend {
  /// Construct and load the backend named by `config.backend`.
  pub async fn open(
    config: &StorageConfig,
    registry: Arc<TypeRegistry>,
  ) -> Result<Self> {
    let backend = match config.backend {
      BackendKind::Memory => Self::Memory(MemoryRepository::new(registry)),
      BackendKind::File => {
        Self::File(FileRepository::open(&config.file_path, registry).await?)
      }
      BackendKind::Blob => {
        Self::Blob(BlobRepository::open(&config.blob_path, registry).await?)
      }
      BackendKind::Db => {
        Self::Sqlite(SqliteRepository::open(&config.database_url).await?)
      }
    };
    info!(backend = %config.backend, "repository opened");
    Ok(backend)
  }

  pub fn kind(&self) -> BackendKind {
    match self {
      Self::Memory(_) => BackendKind::Memory,
      Self::File(_) => BackendKind::File,
      Self::Blob(_) => BackendKind::Blob,
      Self::Sqlite(_) => BackendKind::Db,
    }
  }
}

impl Repository for Backend {
  type Error = Error;

  async fn reload(&self) -> Result<()> {
    match self {
      Self::Memory(r) => Ok(r.reload().await?),
      Self::File(r) => r.reload().await,
      Self::Blob(r) => r.reload().await,
      Self::Sqlite(r) => Ok(r.reload().await?),
    }
  }

  async fn get_all(&self, type_name: &str) -> Result<Vec<Record>> {
    match self {
      Self::Memory(r) => Ok(r.get_all(type_name).await?),
      Self::File(r) => r.get_all(type_name).await,
      Self::Blob(r) => r.get_all(type_name).await,
      Self::Sqlite(r) => Ok(r.get_all(type_name).await?),
    }
  }

  async fn get(&self, type_name: &str, id: &str) -> Result<Option<Record>> {
    match self {
      Self::Memory(r) => Ok(r.get(type_name, id).await?),
      Self::File(r) => r.get(type_name, id).await,
      Self::Blob(r) => r.get(type_name, id).await,
      Self::Sqlite(r) => Ok(r.get(type_name, id).await?),
    }
  }

  async fn save(&self, record: Record) -> Result<()> {
    match self {
      Self::Memory(r) => Ok(r.save(record).await?),
      Self::File(r) => r.save(record).await,
      Self::Blob(r) => r.save(record).await,
      Self::Sqlite(r) => Ok(r.save(record).await?),
    }
  }

  async fn update(&self, record: Record) -> Result<Option<Record>> {
    match self {
      Self::Memory(r) => Ok(r.update(record).await?),
      Self::File(r) => r.update(record).await,
      Self::Blob(r) => r.update(record).await,
      Self::Sqlite(r) => Ok(r.update(record).await?),
    }
  }

  async fn delete(&self, record: &Record) -> Result<bool> {
    match self {
      Self::Memory(r) => Ok(r.delete(record).await?),
      Self::File(r) => r.delete(record).await,
      Self::Blob(r) => r.delete(record).await,
      Self::Sqlite(r) => Ok(r.delete(record).await?),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn backend_names_parse() {
    assert_eq!("db".parse::<BackendKind>().unwrap(), BackendKind::Db);
    assert_eq!("file".parse::<BackendKind>().unwrap(), BackendKind::File);
    assert_eq!("pickle".parse::<BackendKind>().unwrap(), BackendKind::Blob);
    assert_eq!("blob".parse::<BackendKind>().unwrap(), BackendKind::Blob);
    assert_eq!(" Memory ".parse::<BackendKind>().unwrap(), BackendKind::Memory);
  }

  #[test]
  fn unknown_backend_is_rejected() {
    assert!(matches!(
      "postgres".parse::<BackendKind>(),
      Err(Error::UnknownBackend(name)) if name == "postgres"
    ));
  }

  #[test]
  fn default_is_relational() {
    let config = StorageConfig::default();
    assert_eq!(config.backend, BackendKind::Db);
    assert_eq!(config.file_path, PathBuf::from("data.json"));
  }
}

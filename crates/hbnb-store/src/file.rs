//! [`FileRepository`]: the whole table as one JSON document on disk.

use std::{path::PathBuf, sync::Arc};

use hbnb_core::{record::Record, registry::TypeRegistry, repository::Repository};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
  Result,
  io::{read_if_exists, write_replace},
  table::Table,
};

/// Persists to a single JSON file, rewritten on every mutation.
///
/// The write lock is held across serialization and the file write, so
/// concurrent mutations are applied and persisted one at a time. A mutation
/// becomes visible only once the file write has succeeded.
pub struct FileRepository {
  path:     PathBuf,
  registry: Arc<TypeRegistry>,
  table:    RwLock<Table>,
}

impl FileRepository {
  /// Open the document at `path`, creating an empty one if it is absent.
  pub async fn open(
    path: impl Into<PathBuf>,
    registry: Arc<TypeRegistry>,
  ) -> Result<Self> {
    let repo = Self {
      path: path.into(),
      table: RwLock::new(Table::new(&registry)),
      registry,
    };
    repo.reload().await?;
    Ok(repo)
  }

  async fn persist(&self, table: &Table) -> Result<()> {
    let doc = serde_json::to_vec_pretty(&table.to_json()?)?;
    write_replace(&self.path, &doc).await
  }
}

impl Repository for FileRepository {
  type Error = crate::Error;

  async fn reload(&self) -> Result<()> {
    let mut table = self.table.write().await;
    match read_if_exists(&self.path).await? {
      Some(bytes) => {
        let doc = serde_json::from_slice(&bytes)?;
        *table = Table::from_json(doc, &self.registry)?;
        info!(path = %self.path.display(), "loaded storage file");
      }
      None => {
        *table = Table::new(&self.registry);
        self.persist(&table).await?;
        info!(path = %self.path.display(), "created empty storage file");
      }
    }
    Ok(())
  }

  async fn get_all(&self, type_name: &str) -> Result<Vec<Record>> {
    Ok(self.table.read().await.all(type_name))
  }

  async fn get(&self, type_name: &str, id: &str) -> Result<Option<Record>> {
    Ok(self.table.read().await.find(type_name, id))
  }

  async fn save(&self, record: Record) -> Result<()> {
    let mut table = self.table.write().await;
    let mut next = table.clone();
    if next.insert(record) {
      self.persist(&next).await?;
      *table = next;
    }
    Ok(())
  }

  async fn update(&self, record: Record) -> Result<Option<Record>> {
    let mut table = self.table.write().await;
    let mut next = table.clone();
    let stored = next.replace(record);
    if stored.is_some() {
      self.persist(&next).await?;
      *table = next;
    }
    Ok(stored)
  }

  async fn delete(&self, record: &Record) -> Result<bool> {
    let mut table = self.table.write().await;
    let mut next = table.clone();
    let removed = next.remove(record);
    if removed {
      self.persist(&next).await?;
      *table = next;
      debug!(type_name = record.type_name(), id = record.key(), "removed row");
    }
    Ok(removed)
  }
}

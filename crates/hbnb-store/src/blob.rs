//! [`BlobRepository`]: the whole table as one binary blob on disk.

use std::{path::PathBuf, sync::Arc};

use hbnb_core::{record::Record, registry::TypeRegistry, repository::Repository};
use tokio::sync::RwLock;
use tracing::info;

use crate::{
  Result,
  io::{read_if_exists, write_replace},
  table::Table,
};

/// Persists the table with `bincode`, instance tokens included, so a
/// reopened repository still recognises values saved before the restart.
/// Mutations are staged on a copy of the table and swapped in after the
/// blob is written.
pub struct BlobRepository {
  path:     PathBuf,
  registry: Arc<TypeRegistry>,
  table:    RwLock<Table>,
}

impl BlobRepository {
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
    write_replace(&self.path, &table.to_blob()?).await
  }
}

impl Repository for BlobRepository {
  type Error = crate::Error;

  async fn reload(&self) -> Result<()> {
    let mut table = self.table.write().await;
    match read_if_exists(&self.path).await? {
      Some(bytes) => {
        *table = Table::from_blob(&bytes, &self.registry)?;
        info!(path = %self.path.display(), "loaded storage blob");
      }
      None => {
        *table = Table::new(&self.registry);
        self.persist(&table).await?;
        info!(path = %self.path.display(), "created empty storage blob");
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
    let Some(stored) = next.replace(record) else {
      return Ok(None);
    };
    self.persist(&next).await?;
    *table = next;
    Ok(Some(stored))
  }

  async fn delete(&self, record: &Record) -> Result<bool> {
    let mut table = self.table.write().await;
    let mut next = table.clone();
    if !next.remove(record) {
      return Ok(false);
    }
    self.persist(&next).await?;
    *table = next;
    Ok(true)
  }
}

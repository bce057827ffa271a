//! [`MemoryRepository`]: volatile storage, seeded with one country.

use std::{convert::Infallible, sync::Arc};

use hbnb_core::{
  country::Country,
  entity::{InstanceId, Model},
  record::Record,
  registry::TypeRegistry,
  repository::Repository,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::table::Table;

/// Keeps everything in process memory; lost on restart.
pub struct MemoryRepository {
  registry: Arc<TypeRegistry>,
  table:    RwLock<Table>,
}

impl MemoryRepository {
  pub fn new(registry: Arc<TypeRegistry>) -> Self {
    let table = RwLock::new(seeded(&registry));
    Self { registry, table }
  }
}

fn seeded(registry: &TypeRegistry) -> Table {
  let mut table = Table::new(registry);
  table.insert(
    Country {
      name:     "Uruguay".to_owned(),
      code:     "UY".to_owned(),
      instance: InstanceId::fresh(),
    }
    .into_record(),
  );
  table
}

impl Repository for MemoryRepository {
  type Error = Infallible;

  /// Drop everything and seed the fixture again.
  async fn reload(&self) -> Result<(), Infallible> {
    *self.table.write().await = seeded(&self.registry);
    debug!("memory repository reset");
    Ok(())
  }

  async fn get_all(&self, type_name: &str) -> Result<Vec<Record>, Infallible> {
    Ok(self.table.read().await.all(type_name))
  }

  async fn get(
    &self,
    type_name: &str,
    id: &str,
  ) -> Result<Option<Record>, Infallible> {
    Ok(self.table.read().await.find(type_name, id))
  }

  async fn save(&self, record: Record) -> Result<(), Infallible> {
    self.table.write().await.insert(record);
    Ok(())
  }

  async fn update(&self, record: Record) -> Result<Option<Record>, Infallible> {
    Ok(self.table.write().await.replace(record))
  }

  async fn delete(&self, record: &Record) -> Result<bool, Infallible> {
    Ok(self.table.write().await.remove(record))
  }
}

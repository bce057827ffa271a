//! [`RepositoryManager`]: the single access point to the active backend.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::{
  Error, Result,
  entity::{Entity, IdOr, Model},
  record::Record,
  registry::TypeRegistry,
  repository::Repository,
};

/// Owns the type registry and the active backend.
///
/// Constructed once at startup and shared behind an `Arc`; every domain
/// operation takes `&RepositoryManager<R>` instead of reaching for a global.
/// Only registered types can be read or written through it.
pub struct RepositoryManager<R> {
  registry: Arc<TypeRegistry>,
  repo:     R,
  writes:   Mutex<()>,
}

impl<R: Repository> RepositoryManager<R> {
  pub fn new(registry: Arc<TypeRegistry>, repo: R) -> Self {
    Self {
      registry,
      repo,
      writes: Mutex::new(()),
    }
  }

  /// Serialises check-then-write sequences such as uniqueness checks
  /// followed by a save. Hold the guard across the whole sequence.
  pub async fn write_guard(&self) -> MutexGuard<'_, ()> { self.writes.lock().await }

  fn ensure_registered(&self, type_name: &str) -> Result<()> {
    if self.registry.contains(type_name) {
      Ok(())
    } else {
      Err(Error::UnknownType(type_name.to_owned()))
    }
  }

  // ── Raw contract ──────────────────────────────────────────────────────────

  /// Absent for an unregistered type name.
  pub async fn get(&self, type_name: &str, id: &str) -> Result<Option<Record>> {
    if !self.registry.contains(type_name) {
      return Ok(None);
    }
    self.repo.get(type_name, id).await.map_err(Error::storage)
  }

  /// Empty for an unregistered type name.
  pub async fn get_all(&self, type_name: &str) -> Result<Vec<Record>> {
    if !self.registry.contains(type_name) {
      return Ok(Vec::new());
    }
    self.repo.get_all(type_name).await.map_err(Error::storage)
  }

  pub async fn reload(&self) -> Result<()> {
    self.repo.reload().await.map_err(Error::storage)
  }

  pub async fn save<M: Model>(&self, model: &M) -> Result<()> {
    self.ensure_registered(M::TYPE_NAME)?;
    debug!(type_name = M::TYPE_NAME, id = model.key(), "save");
    self
      .repo
      .save(model.clone().into_record())
      .await
      .map_err(Error::storage)
  }

  /// Refresh `updated_at` and hand the entity to the backend. `None` when
  /// the backend holds no record with this id.
  pub async fn update<M: Entity>(&self, mut entity: M) -> Result<Option<M>> {
    self.ensure_registered(M::TYPE_NAME)?;
    debug!(type_name = M::TYPE_NAME, id = entity.key(), "update");
    entity.touch();
    let stored = self
      .repo
      .update(entity.into_record())
      .await
      .map_err(Error::storage)?;
    Ok(stored.and_then(M::from_record))
  }

  pub async fn delete<M: Model>(&self, model: &M) -> Result<bool> {
    debug!(type_name = M::TYPE_NAME, id = model.key(), "delete");
    self
      .repo
      .delete(&model.clone().into_record())
      .await
      .map_err(Error::storage)
  }

  // ── Typed helpers ─────────────────────────────────────────────────────────

  pub async fn find<M: Model>(&self, id: &str) -> Result<Option<M>> {
    Ok(self.get(M::TYPE_NAME, id).await?.and_then(M::from_record))
  }

  pub async fn all<M: Model>(&self) -> Result<Vec<M>> {
    Ok(
      self
        .get_all(M::TYPE_NAME)
        .await?
        .into_iter()
        .filter_map(M::from_record)
        .collect(),
    )
  }

  /// Look up an id, or pass an instance through unchanged.
  pub async fn resolve<M: Model>(&self, target: IdOr<M>) -> Result<Option<M>> {
    match target {
      IdOr::Id(id) => self.find(&id).await,
      IdOr::Instance(model) => Ok(Some(model)),
    }
  }

  /// Delete by id or instance. `false` when the id matches nothing.
  pub async fn remove<M: Model>(&self, target: impl Into<IdOr<M>>) -> Result<bool> {
    match self.resolve(target.into()).await? {
      Some(model) => self.delete(&model).await,
      None => Ok(false),
    }
  }
}

//! The `Repository` trait: the storage contract every backend implements.
//!
//! Backends live in `hbnb-store` (in-memory, JSON file, blob) and
//! `hbnb-store-sqlite` (relational). The domain layer only ever talks to a
//! [`RepositoryManager`](crate::manager::RepositoryManager) wrapping one of
//! them, so switching backend is a configuration change.

use std::future::Future;

use crate::record::Record;

/// Abstraction over one storage strategy.
///
/// Lookups never fail for missing data: an unknown type name or id yields
/// `None` or an empty `Vec`. Errors are reserved for storage failures and are
/// propagated unchanged.
///
/// A repository is dumb storage. It does not check uniqueness or references;
/// the domain `create`/`update` functions do.
pub trait Repository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// (Re)populate from stable storage. Run once when the backend is opened.
  fn reload(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Every stored record of `type_name`. In-process backends return
  /// insertion order; the relational backend makes no ordering promise.
  fn get_all<'a>(
    &'a self,
    type_name: &'a str,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// The record of `type_name` whose key is `id`, if any.
  fn get<'a>(
    &'a self,
    type_name: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + 'a;

  /// Insert `record`.
  ///
  /// In-process backends ignore a second save of the same instance (same
  /// [`InstanceId`](crate::entity::InstanceId)) but accept distinct instances
  /// that share an id.
  fn save(
    &self,
    record: Record,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace the stored record with the same type and key. Returns the
  /// stored value, or `None` when nothing matched.
  ///
  /// In-process backends refresh `updated_at`; the relational backend writes
  /// the row exactly as given.
  fn update(
    &self,
    record: Record,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Remove the stored record with the same type and key. Returns whether
  /// anything was removed.
  fn delete<'a>(
    &'a self,
    record: &'a Record,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

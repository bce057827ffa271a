//! The entity base contract.
//!
//! Every persisted domain type implements [`Model`]: a stable type name, a
//! primary key, an [`InstanceId`], and a conversion to and from [`Record`].
//! All of them except `Country` additionally implement [`Entity`], which adds
//! the timestamp pair and the `touch` refresh used by updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, Result, record::Record};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Names one constructed value, independently of its field values.
///
/// Assigned when a value is built and shared by its clones, so saving the
/// same value twice can be told apart from saving two values that happen to
/// carry the same id. Never written to JSON or SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
  pub fn fresh() -> Self { Self(Uuid::new_v4()) }
}

/// A new entity id: a hyphenated UUID-v4 string.
pub fn new_id() -> String { Uuid::new_v4().to_string() }

/// `updated_at` after a refresh: now, but never earlier than either stamp.
pub fn refreshed(
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
) -> DateTime<Utc> {
  Utc::now().max(created_at).max(updated_at)
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A domain type that can be stored through a
/// [`Repository`](crate::repository::Repository).
pub trait Model:
  Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
  /// The literal type identifier used as the repository table key.
  const TYPE_NAME: &'static str;

  /// The primary key: a UUID string for entities, the code for countries.
  fn key(&self) -> &str;

  fn instance(&self) -> InstanceId;

  fn into_record(self) -> Record;

  /// Unwrap a record of this type; `None` for any other variant.
  fn from_record(record: Record) -> Option<Self>;
}

/// A model with generated identity and timestamps.
pub trait Entity: Model {
  fn id(&self) -> &str { self.key() }

  fn created_at(&self) -> DateTime<Utc>;

  fn updated_at(&self) -> DateTime<Utc>;

  /// Refresh `updated_at`. Keeps `created_at <= updated_at`.
  fn touch(&mut self);
}

/// An entity whose fields can be assigned from a partial field mapping.
pub trait Updatable: Entity {
  /// Assign one allow-listed field through its typed setter.
  ///
  /// Keys outside the allow-list yield [`Error::UnknownField`].
  fn set_field(&mut self, field: &str, value: Value) -> Result<()>;
}

/// Apply every entry of `fields`, stopping at the first rejected one.
pub fn apply_fields<M: Updatable>(
  entity: &mut M,
  fields: Map<String, Value>,
) -> Result<()> {
  for (field, value) in fields {
    entity.set_field(&field, value)?;
  }
  Ok(())
}

// ─── Id-or-instance ──────────────────────────────────────────────────────────

/// Addresses an entity either by id or by an instance already in hand.
#[derive(Debug, Clone)]
pub enum IdOr<M> {
  Id(String),
  Instance(M),
}

impl<M> From<&str> for IdOr<M> {
  fn from(id: &str) -> Self { Self::Id(id.to_owned()) }
}

impl<M> From<String> for IdOr<M> {
  fn from(id: String) -> Self { Self::Id(id) }
}

/// Implements [`Model`], [`Entity`], `From<T> for IdOr<T>` and `T::delete`
/// for a struct with `id`, `created_at`, `updated_at` and `instance` fields.
macro_rules! impl_entity {
  ($ty:ident) => {
    impl $crate::entity::Model for $ty {
      const TYPE_NAME: &'static str = stringify!($ty);

      fn key(&self) -> &str { &self.id }

      fn instance(&self) -> $crate::entity::InstanceId { self.instance }

      fn into_record(self) -> $crate::record::Record {
        $crate::record::Record::$ty(self)
      }

      fn from_record(record: $crate::record::Record) -> Option<Self> {
        match record {
          $crate::record::Record::$ty(inner) => Some(inner),
          _ => None,
        }
      }
    }

    impl $crate::entity::Entity for $ty {
      fn created_at(&self) -> chrono::DateTime<chrono::Utc> { self.created_at }

      fn updated_at(&self) -> chrono::DateTime<chrono::Utc> { self.updated_at }

      fn touch(&mut self) {
        self.updated_at =
          $crate::entity::refreshed(self.created_at, self.updated_at);
      }
    }

    impl From<$ty> for $crate::entity::IdOr<$ty> {
      fn from(entity: $ty) -> Self { Self::Instance(entity) }
    }

    impl $ty {
      /// Delete by id or instance. `false` when nothing was removed.
      pub async fn delete<R: $crate::repository::Repository>(
        repo: &$crate::manager::RepositoryManager<R>,
        target: impl Into<$crate::entity::IdOr<Self>>,
      ) -> $crate::Result<bool> {
        repo.remove::<Self>(target).await
      }
    }
  };
}

pub(crate) use impl_entity;

// ─── Field setters ───────────────────────────────────────────────────────────

pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Error {
  Error::InvalidField {
    field:  field.to_owned(),
    reason: reason.into(),
  }
}

pub(crate) fn text(field: &str, value: Value) -> Result<String> {
  match value {
    Value::String(s) => Ok(s),
    other => Err(invalid(field, format!("expected a string, got {other}"))),
  }
}

pub(crate) fn number(field: &str, value: Value) -> Result<f64> {
  value
    .as_f64()
    .ok_or_else(|| invalid(field, format!("expected a number, got {value}")))
}

pub(crate) fn count(field: &str, value: Value) -> Result<u32> {
  value
    .as_u64()
    .and_then(|n| u32::try_from(n).ok())
    .ok_or_else(|| {
      invalid(field, format!("expected a non-negative integer, got {value}"))
    })
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// ISO-8601 (de)serialization for entity timestamps.
///
/// Written as RFC 3339 UTC with as many fractional digits as needed, so a
/// round-trip is lossless. Read back from RFC 3339, or from a naive ISO-8601
/// datetime, which is taken as UTC.
pub mod timestamp {
  use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
  }

  pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(s) {
      Ok(dt) => Ok(dt.with_timezone(&Utc)),
      Err(e) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| e),
    }
  }

  pub fn serialize<S: Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(dt))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(D::Error::custom)
  }
}

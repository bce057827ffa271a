//! [`SqliteRepository`]: the relational implementation of [`Repository`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value as SqlValue};
use tracing::debug;

use hbnb_core::{
  amenity::Amenity,
  city::City,
  country::Country,
  place::Place,
  record::Record,
  repository::Repository,
  review::Review,
  user::User,
};

use crate::{
  Result,
  encode::{
    RawRow, SqlModel, delete_sql, insert_sql, select_one_sql, select_sql,
    update_sql,
  },
  schema::SCHEMA,
};

/// Run `$body` with `$m` bound to the model type registered as `$type_name`,
/// or evaluate `$fallback` for names with no table.
macro_rules! for_type {
  ($type_name:expr, $m:ident => $body:expr, _ => $fallback:expr) => {
    match $type_name {
      "Country" => {
        type $m = Country;
        $body
      }
      "City" => {
        type $m = City;
        $body
      }
      "User" => {
        type $m = User;
        $body
      }
      "Amenity" => {
        type $m = Amenity;
        $body
      }
      "Place" => {
        type $m = Place;
        $body
      }
      "Review" => {
        type $m = Review;
        $body
      }
      _ => $fallback,
    }
  };
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// An HBnB repository backed by a single SQLite file, one table per type.
///
/// Every call is one autocommitted statement. Cloning is cheap; the inner
/// connection is reference-counted.
#[derive(Clone)]
pub struct SqliteRepository {
  conn: tokio_rusqlite::Connection,
}

impl SqliteRepository {
  /// Open (or create) a database at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let repo = Self { conn };
    repo.init_schema().await?;
    Ok(repo)
  }

  /// Open an in-memory database.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let repo = Self { conn };
    repo.init_schema().await?;
    Ok(repo)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Statements ────────────────────────────────────────────────────────────

  async fn select_all<M: SqlModel>(&self) -> Result<Vec<Record>> {
    let sql = select_sql::<M>();
    let width = M::COLUMNS.len();

    let rows: Vec<Vec<SqlValue>> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            (0..width)
              .map(|i| row.get::<_, SqlValue>(i))
              .collect::<rusqlite::Result<Vec<_>>>()
          })?
          .collect::<rusqlite::Result<Vec<Vec<SqlValue>>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|values| {
        M::decode(&mut RawRow::new(M::TABLE, values)).map(M::into_record)
      })
      .collect()
  }

  async fn select_one<M: SqlModel>(&self, key: &str) -> Result<Option<Record>> {
    let sql = select_one_sql::<M>();
    let key = key.to_owned();
    let width = M::COLUMNS.len();

    let row: Option<Vec<SqlValue>> = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(&sql, [key], |row| {
            (0..width)
              .map(|i| row.get::<_, SqlValue>(i))
              .collect::<rusqlite::Result<Vec<_>>>()
          })
          .optional()?;
        Ok(row)
      })
      .await?;

    row
      .map(|values| {
        M::decode(&mut RawRow::new(M::TABLE, values)).map(M::into_record)
      })
      .transpose()
  }

  async fn insert<M: SqlModel>(&self, model: &M) -> Result<()> {
    let sql = insert_sql::<M>();
    let values = model.encode();

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn update_row<M: SqlModel>(&self, model: M) -> Result<Option<Record>> {
    let sql = update_sql::<M>();
    let values = model.encode();

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?))
      .await?;

    Ok((changed > 0).then(|| model.into_record()))
  }

  async fn delete_row<M: SqlModel>(&self, key: &str) -> Result<bool> {
    let sql = delete_sql::<M>();
    let key = key.to_owned();

    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, [key])?))
      .await?;

    Ok(removed > 0)
  }
}

impl Repository for SqliteRepository {
  type Error = crate::Error;

  /// The database is the source of truth; there is nothing to reload.
  async fn reload(&self) -> Result<()> { Ok(()) }

  async fn get_all(&self, type_name: &str) -> Result<Vec<Record>> {
    for_type!(type_name, M => self.select_all::<M>().await, _ => Ok(Vec::new()))
  }

  async fn get(&self, type_name: &str, id: &str) -> Result<Option<Record>> {
    for_type!(type_name, M => self.select_one::<M>(id).await, _ => Ok(None))
  }

  async fn save(&self, record: Record) -> Result<()> {
    debug!(type_name = record.type_name(), key = record.key(), "insert row");
    match &record {
      Record::Country(m) => self.insert(m).await,
      Record::City(m) => self.insert(m).await,
      Record::User(m) => self.insert(m).await,
      Record::Amenity(m) => self.insert(m).await,
      Record::Place(m) => self.insert(m).await,
      Record::Review(m) => self.insert(m).await,
    }
  }

  async fn update(&self, record: Record) -> Result<Option<Record>> {
    match record {
      Record::Country(m) => self.update_row(m).await,
      Record::City(m) => self.update_row(m).await,
      Record::User(m) => self.update_row(m).await,
      Record::Amenity(m) => self.update_row(m).await,
      Record::Place(m) => self.update_row(m).await,
      Record::Review(m) => self.update_row(m).await,
    }
  }

  async fn delete(&self, record: &Record) -> Result<bool> {
    let key = record.key();
    for_type!(record.type_name(), M => self.delete_row::<M>(key).await, _ => Ok(false))
  }
}

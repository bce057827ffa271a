//! Encoding and decoding between domain types and SQLite rows.
//!
//! Timestamps are stored as RFC 3339 UTC strings, booleans as integers and
//! counts as integers. Each table's column list starts with its primary key.

use chrono::{DateTime, Utc};
use hbnb_core::{
  amenity::Amenity,
  city::City,
  country::Country,
  entity::{InstanceId, Model, timestamp},
  place::Place,
  review::Review,
  user::User,
};
use rusqlite::types::Value as SqlValue;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> SqlValue {
  SqlValue::Text(timestamp::format(&dt))
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  timestamp::parse(s).map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row cursor ──────────────────────────────────────────────────────────────

/// Column values of one row, consumed left to right.
pub struct RawRow {
  table:  &'static str,
  values: std::vec::IntoIter<SqlValue>,
}

impl RawRow {
  pub fn new(table: &'static str, values: Vec<SqlValue>) -> Self {
    Self { table, values: values.into_iter() }
  }

  fn bad(&self, detail: String) -> Error {
    Error::Column { table: self.table, detail }
  }

  fn next(&mut self) -> Result<SqlValue> {
    self
      .values
      .next()
      .ok_or_else(|| self.bad("row ended early".into()))
  }

  pub fn text(&mut self) -> Result<String> {
    match self.next()? {
      SqlValue::Text(s) => Ok(s),
      other => Err(self.bad(format!("expected TEXT, got {other:?}"))),
    }
  }

  pub fn real(&mut self) -> Result<f64> {
    match self.next()? {
      SqlValue::Real(f) => Ok(f),
      SqlValue::Integer(i) => Ok(i as f64),
      other => Err(self.bad(format!("expected REAL, got {other:?}"))),
    }
  }

  pub fn count(&mut self) -> Result<u32> {
    match self.next()? {
      SqlValue::Integer(i) => u32::try_from(i)
        .map_err(|_| self.bad(format!("{i} does not fit a count"))),
      other => Err(self.bad(format!("expected INTEGER, got {other:?}"))),
    }
  }

  pub fn flag(&mut self) -> Result<bool> {
    match self.next()? {
      SqlValue::Integer(i) => Ok(i != 0),
      other => Err(self.bad(format!("expected INTEGER, got {other:?}"))),
    }
  }

  pub fn dt(&mut self) -> Result<DateTime<Utc>> { decode_dt(&self.text()?) }
}

// ─── Table mapping ───────────────────────────────────────────────────────────

/// How one domain type maps onto its table.
pub trait SqlModel: Model {
  const TABLE: &'static str;
  /// Column names; the first is the primary key.
  const COLUMNS: &'static [&'static str];

  /// Values in [`Self::COLUMNS`] order.
  fn encode(&self) -> Vec<SqlValue>;

  fn decode(row: &mut RawRow) -> Result<Self>;
}

fn text(s: &str) -> SqlValue { SqlValue::Text(s.to_owned()) }

fn count(n: u32) -> SqlValue { SqlValue::Integer(i64::from(n)) }

impl SqlModel for Country {
  const TABLE: &'static str = "countries";
  const COLUMNS: &'static [&'static str] = &["code", "name"];

  fn encode(&self) -> Vec<SqlValue> { vec![text(&self.code), text(&self.name)] }

  fn decode(row: &mut RawRow) -> Result<Self> {
    Ok(Self {
      code:     row.text()?,
      name:     row.text()?,
      instance: InstanceId::fresh(),
    })
  }
}

impl SqlModel for User {
  const TABLE: &'static str = "users";
  const COLUMNS: &'static [&'static str] = &[
    "id",
    "email",
    "password",
    "first_name",
    "last_name",
    "is_admin",
    "created_at",
    "updated_at",
  ];

  fn encode(&self) -> Vec<SqlValue> {
    vec![
      text(&self.id),
      text(&self.email),
      text(&self.password),
      text(&self.first_name),
      text(&self.last_name),
      SqlValue::Integer(i64::from(self.is_admin)),
      encode_dt(self.created_at),
      encode_dt(self.updated_at),
    ]
  }

  fn decode(row: &mut RawRow) -> Result<Self> {
    Ok(Self {
      id:         row.text()?,
      email:      row.text()?,
      password:   row.text()?,
      first_name: row.text()?,
      last_name:  row.text()?,
      is_admin:   row.flag()?,
      created_at: row.dt()?,
      updated_at: row.dt()?,
      instance:   InstanceId::fresh(),
    })
  }
}

impl SqlModel for City {
  const TABLE: &'static str = "cities";
  const COLUMNS: &'static [&'static str] =
    &["id", "name", "country_code", "created_at", "updated_at"];

  fn encode(&self) -> Vec<SqlValue> {
    vec![
      text(&self.id),
      text(&self.name),
      text(&self.country_code),
      encode_dt(self.created_at),
      encode_dt(self.updated_at),
    ]
  }

  fn decode(row: &mut RawRow) -> Result<Self> {
    Ok(Self {
      id:           row.text()?,
      name:         row.text()?,
      country_code: row.text()?,
      created_at:   row.dt()?,
      updated_at:   row.dt()?,
      instance:     InstanceId::fresh(),
    })
  }
}

impl SqlModel for Amenity {
  const TABLE: &'static str = "amenities";
  const COLUMNS: &'static [&'static str] =
    &["id", "name", "created_at", "updated_at"];

  fn encode(&self) -> Vec<SqlValue> {
    vec![
      text(&self.id),
      text(&self.name),
      encode_dt(self.created_at),
      encode_dt(self.updated_at),
    ]
  }

  fn decode(row: &mut RawRow) -> Result<Self> {
    Ok(Self {
      id:         row.text()?,
      name:       row.text()?,
      created_at: row.dt()?,
      updated_at: row.dt()?,
      instance:   InstanceId::fresh(),
    })
  }
}

impl SqlModel for Place {
  const TABLE: &'static str = "places";
  const COLUMNS: &'static [&'static str] = &[
    "id",
    "name",
    "description",
    "address",
    "latitude",
    "longitude",
    "host_id",
    "city_id",
    "price_per_night",
    "number_of_rooms",
    "number_of_bathrooms",
    "max_guests",
    "created_at",
    "updated_at",
  ];

  fn encode(&self) -> Vec<SqlValue> {
    vec![
      text(&self.id),
      text(&self.name),
      text(&self.description),
      text(&self.address),
      SqlValue::Real(self.latitude),
      SqlValue::Real(self.longitude),
      text(&self.host_id),
      text(&self.city_id),
      count(self.price_per_night),
      count(self.number_of_rooms),
      count(self.number_of_bathrooms),
      count(self.max_guests),
      encode_dt(self.created_at),
      encode_dt(self.updated_at),
    ]
  }

  fn decode(row: &mut RawRow) -> Result<Self> {
    Ok(Self {
      id:                  row.text()?,
      name:                row.text()?,
      description:         row.text()?,
      address:             row.text()?,
      latitude:            row.real()?,
      longitude:           row.real()?,
      host_id:             row.text()?,
      city_id:             row.text()?,
      price_per_night:     row.count()?,
      number_of_rooms:     row.count()?,
      number_of_bathrooms: row.count()?,
      max_guests:          row.count()?,
      created_at:          row.dt()?,
      updated_at:          row.dt()?,
      instance:            InstanceId::fresh(),
    })
  }
}

impl SqlModel for Review {
  const TABLE: &'static str = "reviews";
  const COLUMNS: &'static [&'static str] = &[
    "id",
    "place_id",
    "user_id",
    "comment",
    "rating",
    "created_at",
    "updated_at",
  ];

  fn encode(&self) -> Vec<SqlValue> {
    vec![
      text(&self.id),
      text(&self.place_id),
      text(&self.user_id),
      text(&self.comment),
      SqlValue::Real(self.rating),
      encode_dt(self.created_at),
      encode_dt(self.updated_at),
    ]
  }

  fn decode(row: &mut RawRow) -> Result<Self> {
    Ok(Self {
      id:         row.text()?,
      place_id:   row.text()?,
      user_id:    row.text()?,
      comment:    row.text()?,
      rating:     row.real()?,
      created_at: row.dt()?,
      updated_at: row.dt()?,
      instance:   InstanceId::fresh(),
    })
  }
}

// ─── Statements ──────────────────────────────────────────────────────────────

pub fn select_sql<M: SqlModel>() -> String {
  format!("SELECT {} FROM {}", M::COLUMNS.join(", "), M::TABLE)
}

pub fn select_one_sql<M: SqlModel>() -> String {
  format!("{} WHERE {} = ?1", select_sql::<M>(), M::COLUMNS[0])
}

pub fn insert_sql<M: SqlModel>() -> String {
  let placeholders: Vec<String> =
    (1..=M::COLUMNS.len()).map(|i| format!("?{i}")).collect();
  format!(
    "INSERT INTO {} ({}) VALUES ({})",
    M::TABLE,
    M::COLUMNS.join(", "),
    placeholders.join(", "),
  )
}

pub fn update_sql<M: SqlModel>() -> String {
  let assignments: Vec<String> = M::COLUMNS
    .iter()
    .enumerate()
    .skip(1)
    .map(|(i, column)| format!("{column} = ?{}", i + 1))
    .collect();
  format!(
    "UPDATE {} SET {} WHERE {} = ?1",
    M::TABLE,
    assignments.join(", "),
    M::COLUMNS[0],
  )
}

pub fn delete_sql<M: SqlModel>() -> String {
  format!("DELETE FROM {} WHERE {} = ?1", M::TABLE, M::COLUMNS[0])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn update_binds_key_first() {
    assert_eq!(
      update_sql::<Amenity>(),
      "UPDATE amenities SET name = ?2, created_at = ?3, updated_at = ?4 \
       WHERE id = ?1"
    );
  }

  #[test]
  fn insert_has_one_placeholder_per_column() {
    assert_eq!(
      insert_sql::<Country>(),
      "INSERT INTO countries (code, name) VALUES (?1, ?2)"
    );
  }

  #[test]
  fn short_rows_are_rejected() {
    let mut row = RawRow::new("cities", vec![SqlValue::Text("id".into())]);
    assert!(City::decode(&mut row).is_err());
  }
}

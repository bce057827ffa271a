//! [`Table`]: the type-name → rows map shared by the in-process backends.

use hbnb_core::{entity::InstanceId, record::Record, registry::TypeRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// One stored value and the instance it was saved from.
///
/// The token is kept beside the record because the record's own copy is not
/// part of its serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Row {
  instance: InstanceId,
  record:   Record,
}

impl From<Record> for Row {
  fn from(record: Record) -> Self {
    Self { instance: record.instance(), record }
  }
}

/// Rows grouped by type name, each group in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
  types: Vec<(String, Vec<Row>)>,
}

impl Table {
  /// An empty group for every registered type.
  pub fn new(registry: &TypeRegistry) -> Self {
    let mut table = Self::default();
    table.ensure_types(registry);
    table
  }

  fn ensure_types(&mut self, registry: &TypeRegistry) {
    for name in registry.type_names() {
      self.rows_mut(name);
    }
  }

  fn rows(&self, type_name: &str) -> &[Row] {
    self
      .types
      .iter()
      .find(|(name, _)| name == type_name)
      .map(|(_, rows)| rows.as_slice())
      .unwrap_or_default()
  }

  fn rows_mut(&mut self, type_name: &str) -> &mut Vec<Row> {
    let index = match self.types.iter().position(|(name, _)| name == type_name) {
      Some(index) => index,
      None => {
        self.types.push((type_name.to_owned(), Vec::new()));
        self.types.len() - 1
      }
    };
    &mut self.types[index].1
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn all(&self, type_name: &str) -> Vec<Record> {
    self
      .rows(type_name)
      .iter()
      .map(|row| row.record.clone())
      .collect()
  }

  /// The first row of `type_name` whose key is `id`.
  pub fn find(&self, type_name: &str, id: &str) -> Option<Record> {
    self
      .rows(type_name)
      .iter()
      .find(|row| row.record.key() == id)
      .map(|row| row.record.clone())
  }

  #[cfg(test)]
  pub fn len(&self, type_name: &str) -> usize { self.rows(type_name).len() }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Append `record` unless this exact instance is already stored. Returns
  /// whether the table changed.
  pub fn insert(&mut self, record: Record) -> bool {
    let rows = self.rows_mut(record.type_name());
    if rows.iter().any(|row| row.instance == record.instance()) {
      return false;
    }
    rows.push(record.into());
    true
  }

  /// Replace the first row with the same type and key, refreshing
  /// `updated_at`. `None` when no row matched.
  pub fn replace(&mut self, mut record: Record) -> Option<Record> {
    let rows = self.rows_mut(record.type_name());
    let row = rows.iter_mut().find(|row| row.record.key() == record.key())?;
    record.touch();
    *row = record.clone().into();
    Some(record)
  }

  /// Remove the first row with the same type and key.
  pub fn remove(&mut self, record: &Record) -> bool {
    let rows = self.rows_mut(record.type_name());
    match rows.iter().position(|row| row.record.key() == record.key()) {
      Some(index) => {
        rows.remove(index);
        true
      }
      None => false,
    }
  }

  // ── JSON document ─────────────────────────────────────────────────────────

  /// `{ "<Type>": [ {fields}, … ], … }`
  pub fn to_json(&self) -> Result<Value> {
    let mut doc = Map::new();
    for (name, rows) in &self.types {
      let fields = rows
        .iter()
        .map(|row| row.record.to_fields())
        .collect::<serde_json::Result<Vec<_>>>()?;
      doc.insert(name.clone(), Value::Array(fields));
    }
    Ok(Value::Object(doc))
  }

  /// Rebuild a table from a document written by [`Table::to_json`]. Every
  /// row gets a fresh instance token.
  pub fn from_json(doc: Value, registry: &TypeRegistry) -> Result<Self> {
    let Value::Object(doc) = doc else {
      return Err(Error::Malformed("top level is not an object".into()));
    };

    let mut table = Self::new(registry);
    for (type_name, rows) in doc {
      let Value::Array(rows) = rows else {
        return Err(Error::Malformed(format!("{type_name:?} is not an array")));
      };
      for fields in rows {
        let record = registry.hydrate(&type_name, fields)?;
        table.rows_mut(&type_name).push(record.into());
      }
    }
    Ok(table)
  }

  // ── Blob ──────────────────────────────────────────────────────────────────

  pub fn to_blob(&self) -> Result<Vec<u8>> { Ok(bincode::serialize(self)?) }

  /// Restore a table written by [`Table::to_blob`], instance tokens included.
  pub fn from_blob(bytes: &[u8], registry: &TypeRegistry) -> Result<Self> {
    let mut table: Self = bincode::deserialize(bytes)?;
    for (_, rows) in &mut table.types {
      for row in rows {
        row.record.set_instance(row.instance);
      }
    }
    table.ensure_types(registry);
    Ok(table)
  }
}

#[cfg(test)]
mod tests {
  use hbnb_core::{amenity::Amenity, country::Country, entity::Model};
  use serde_json::json;

  use super::*;

  fn table() -> Table { Table::new(&TypeRegistry::standard()) }

  #[test]
  fn new_table_has_every_registered_type() {
    let doc = table().to_json().unwrap();
    let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 6);
    assert_eq!(doc["Country"], json!([]));
  }

  #[test]
  fn insert_ignores_the_same_instance() {
    let mut t = table();
    let amenity = Amenity::new("Wifi");
    assert!(t.insert(amenity.clone().into_record()));
    assert!(!t.insert(amenity.clone().into_record()));
    assert_eq!(t.len("Amenity"), 1);

    let mut twin = Amenity::new("Wifi");
    twin.id = amenity.id.clone();
    assert!(t.insert(twin.into_record()));
    assert_eq!(t.len("Amenity"), 2);
  }

  #[test]
  fn json_document_rejects_non_objects() {
    let registry = TypeRegistry::standard();
    assert!(matches!(
      Table::from_json(json!([1, 2]), &registry),
      Err(Error::Malformed(_))
    ));
    assert!(matches!(
      Table::from_json(json!({ "Country": {} }), &registry),
      Err(Error::Malformed(_))
    ));
  }

  #[test]
  fn json_document_rejects_unknown_types() {
    let registry = TypeRegistry::standard();
    let doc = json!({ "Spaceship": [{ "id": "x" }] });
    assert!(matches!(
      Table::from_json(doc, &registry),
      Err(Error::Domain(hbnb_core::Error::UnknownType(_)))
    ));
  }

  #[test]
  fn blob_keeps_instance_tokens() {
    let registry = TypeRegistry::standard();
    let mut t = Table::new(&registry);
    let country = Country::new("Uruguay", "UY").unwrap();
    t.insert(country.clone().into_record());

    let mut restored = Table::from_blob(&t.to_blob().unwrap(), &registry).unwrap();
    assert!(!restored.insert(country.into_record()));
    assert_eq!(restored.len("Country"), 1);
  }
}

//! [`Record`]: one stored value of any registered type.

use serde::{Deserialize, Serialize};

use crate::{
  amenity::Amenity,
  city::City,
  country::Country,
  entity::{Entity, InstanceId, Model},
  place::Place,
  review::Review,
  user::User,
};

/// The unit a [`Repository`](crate::repository::Repository) stores.
///
/// The variant name is the type name used as the table key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Record {
  Country(Country),
  City(City),
  User(User),
  Amenity(Amenity),
  Place(Place),
  Review(Review),
}

impl Record {
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::Country(_) => Country::TYPE_NAME,
      Self::City(_) => City::TYPE_NAME,
      Self::User(_) => User::TYPE_NAME,
      Self::Amenity(_) => Amenity::TYPE_NAME,
      Self::Place(_) => Place::TYPE_NAME,
      Self::Review(_) => Review::TYPE_NAME,
    }
  }

  /// Primary key of the wrapped value.
  pub fn key(&self) -> &str {
    match self {
      Self::Country(m) => m.key(),
      Self::City(m) => m.key(),
      Self::User(m) => m.key(),
      Self::Amenity(m) => m.key(),
      Self::Place(m) => m.key(),
      Self::Review(m) => m.key(),
    }
  }

  pub fn instance(&self) -> InstanceId {
    match self {
      Self::Country(m) => m.instance(),
      Self::City(m) => m.instance(),
      Self::User(m) => m.instance(),
      Self::Amenity(m) => m.instance(),
      Self::Place(m) => m.instance(),
      Self::Review(m) => m.instance(),
    }
  }

  /// Restore an instance token after a round-trip that does not carry it.
  pub fn set_instance(&mut self, instance: InstanceId) {
    match self {
      Self::Country(m) => m.instance = instance,
      Self::City(m) => m.instance = instance,
      Self::User(m) => m.instance = instance,
      Self::Amenity(m) => m.instance = instance,
      Self::Place(m) => m.instance = instance,
      Self::Review(m) => m.instance = instance,
    }
  }

  /// Refresh `updated_at`; countries have no timestamps.
  pub fn touch(&mut self) {
    match self {
      Self::Country(_) => {}
      Self::City(m) => m.touch(),
      Self::User(m) => m.touch(),
      Self::Amenity(m) => m.touch(),
      Self::Place(m) => m.touch(),
      Self::Review(m) => m.touch(),
    }
  }

  /// The flat field mapping written by the JSON backend.
  pub fn to_fields(&self) -> serde_json::Result<serde_json::Value> {
    match self {
      Self::Country(m) => serde_json::to_value(m),
      Self::City(m) => serde_json::to_value(m),
      Self::User(m) => serde_json::to_value(m),
      Self::Amenity(m) => serde_json::to_value(m),
      Self::Place(m) => serde_json::to_value(m),
      Self::Review(m) => serde_json::to_value(m),
    }
  }
}

//! The type registry: type name → how to rebuild a value of that type.

use serde_json::Value;

use crate::{
  Error, Result,
  amenity::Amenity,
  city::City,
  country::Country,
  entity::Model,
  place::Place,
  record::Record,
  review::Review,
  user::User,
};

type Hydrate = fn(Value) -> Result<Record>;

/// Maps each registered type name to a constructor from a flat field
/// mapping. Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
  types: Vec<(&'static str, Hydrate)>,
}

impl TypeRegistry {
  pub fn new() -> Self { Self::default() }

  /// Every domain type, in the order the service registers them.
  pub fn standard() -> Self {
    let mut registry = Self::new();
    registry
      .register::<User>()
      .register::<Country>()
      .register::<City>()
      .register::<Amenity>()
      .register::<Place>()
      .register::<Review>();
    registry
  }

  /// Register `M` under [`Model::TYPE_NAME`]. Registering twice is a no-op.
  pub fn register<M: Model>(&mut self) -> &mut Self {
    if !self.contains(M::TYPE_NAME) {
      self.types.push((M::TYPE_NAME, hydrate::<M>));
    }
    self
  }

  pub fn contains(&self, type_name: &str) -> bool {
    self.types.iter().any(|(name, _)| *name == type_name)
  }

  /// Registered type names in registration order.
  pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.types.iter().map(|(name, _)| *name)
  }

  /// Rebuild a value of `type_name` from its field mapping.
  pub fn hydrate(&self, type_name: &str, fields: Value) -> Result<Record> {
    let (_, hydrate) = self
      .types
      .iter()
      .find(|(name, _)| *name == type_name)
      .ok_or_else(|| Error::UnknownType(type_name.to_owned()))?;
    hydrate(fields)
  }
}

fn hydrate<M: Model>(fields: Value) -> Result<Record> {
  Ok(serde_json::from_value::<M>(fields)?.into_record())
}

//! Cities and the rules for creating and changing them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  country::Country,
  entity::{
    IdOr, InstanceId, Updatable, apply_fields, impl_entity, new_id, text,
    timestamp,
  },
  manager::RepositoryManager,
  repository::Repository,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
  #[serde(default = "new_id")]
  pub id:           String,
  pub name:         String,
  /// Code of the owning [`Country`].
  pub country_code: String,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub created_at:   DateTime<Utc>,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub updated_at:   DateTime<Utc>,
  #[serde(skip, default = "InstanceId::fresh")]
  pub instance:     InstanceId,
}

impl_entity!(City);

/// Input to [`City::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewCity {
  pub name:         String,
  pub country_code: String,
}

impl City {
  pub fn new(name: impl Into<String>, country_code: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      id: new_id(),
      name: name.into(),
      country_code: country_code.into(),
      created_at: now,
      updated_at: now,
      instance: InstanceId::fresh(),
    }
  }

  /// Create and persist a city. The country must exist and no other city in
  /// it may have the same name.
  pub async fn create<R: Repository>(
    repo: &RepositoryManager<R>,
    input: NewCity,
  ) -> Result<Self> {
    let city = Self::new(input.name, input.country_code);
    let _guard = repo.write_guard().await;
    city.validate(repo).await?;
    repo.save(&city).await?;
    Ok(city)
  }

  /// Assign `fields` (`name`, `country_code`) and persist. `None` when the
  /// city does not exist.
  pub async fn update<R: Repository>(
    repo: &RepositoryManager<R>,
    target: impl Into<IdOr<Self>>,
    fields: Map<String, Value>,
  ) -> Result<Option<Self>> {
    let Some(mut city) = repo.resolve(target.into()).await? else {
      return Ok(None);
    };
    apply_fields(&mut city, fields)?;
    let _guard = repo.write_guard().await;
    city.validate(repo).await?;
    repo.update(city).await
  }

  /// Every city of the country with `code`.
  pub async fn in_country<R: Repository>(
    repo: &RepositoryManager<R>,
    code: &str,
  ) -> Result<Vec<Self>> {
    let mut cities = repo.all::<Self>().await?;
    cities.retain(|city| city.country_code == code);
    Ok(cities)
  }

  async fn validate<R: Repository>(&self, repo: &RepositoryManager<R>) -> Result<()> {
    if Country::get(repo, &self.country_code).await?.is_none() {
      return Err(Error::CountryNotFound(self.country_code.clone()));
    }

    let taken = repo.all::<Self>().await?.into_iter().any(|other| {
      other.id != self.id
        && other.name == self.name
        && other.country_code == self.country_code
    });
    if taken {
      return Err(Error::CityExists {
        name:         self.name.clone(),
        country_code: self.country_code.clone(),
      });
    }
    Ok(())
  }
}

impl Updatable for City {
  fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
    match field {
      "name" => self.name = text(field, value)?,
      "country_code" => self.country_code = text(field, value)?,
      _ => {
        return Err(Error::UnknownField {
          type_name: "City",
          field:     field.to_owned(),
        });
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::entity::Model;

  #[test]
  fn allow_list_rejects_identity_fields() {
    let mut city = City::new("Rivera", "UY");
    let id = city.id.clone();

    let mut fields = Map::new();
    fields.insert("id".into(), json!("something-else"));
    let err = apply_fields(&mut city, fields).unwrap_err();

    assert!(matches!(err, Error::UnknownField { type_name: "City", .. }));
    assert_eq!(city.id, id);
  }

  #[test]
  fn set_field_is_typed() {
    let mut city = City::new("Rivera", "UY");
    assert!(city.set_field("name", json!(42)).is_err());
    city.set_field("name", json!("Artigas")).unwrap();
    assert_eq!(city.name, "Artigas");
  }

  #[test]
  fn hydrates_with_generated_identity_when_missing() {
    let city: City =
      serde_json::from_value(json!({ "name": "Rivera", "country_code": "UY" }))
        .unwrap();
    assert_eq!(city.key().len(), 36);
    assert!(city.created_at <= city.updated_at);
  }
}

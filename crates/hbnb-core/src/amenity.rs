//! Amenities: named features a place can offer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  entity::{
    IdOr, InstanceId, Updatable, apply_fields, impl_entity, new_id, text,
    timestamp,
  },
  manager::RepositoryManager,
  repository::Repository,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amenity {
  #[serde(default = "new_id")]
  pub id:         String,
  pub name:       String,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub created_at: DateTime<Utc>,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub updated_at: DateTime<Utc>,
  #[serde(skip, default = "InstanceId::fresh")]
  pub instance:   InstanceId,
}

impl_entity!(Amenity);

/// Input to [`Amenity::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewAmenity {
  pub name: String,
}

impl Amenity {
  pub fn new(name: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      id: new_id(),
      name: name.into(),
      created_at: now,
      updated_at: now,
      instance: InstanceId::fresh(),
    }
  }

  /// Create and persist an amenity with a name no other amenity uses.
  pub async fn create<R: Repository>(
    repo: &RepositoryManager<R>,
    input: NewAmenity,
  ) -> Result<Self> {
    let amenity = Self::new(input.name);
    let _guard = repo.write_guard().await;
    amenity.ensure_unique(repo).await?;
    repo.save(&amenity).await?;
    Ok(amenity)
  }

  pub async fn update<R: Repository>(
    repo: &RepositoryManager<R>,
    target: impl Into<IdOr<Self>>,
    fields: Map<String, Value>,
  ) -> Result<Option<Self>> {
    let Some(mut amenity) = repo.resolve(target.into()).await? else {
      return Ok(None);
    };
    apply_fields(&mut amenity, fields)?;
    let _guard = repo.write_guard().await;
    amenity.ensure_unique(repo).await?;
    repo.update(amenity).await
  }

  async fn ensure_unique<R: Repository>(
    &self,
    repo: &RepositoryManager<R>,
  ) -> Result<()> {
    let taken = repo
      .all::<Self>()
      .await?
      .into_iter()
      .any(|other| other.id != self.id && other.name == self.name);
    if taken {
      return Err(Error::AmenityExists(self.name.clone()));
    }
    Ok(())
  }
}

impl Updatable for Amenity {
  fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
    match field {
      "name" => self.name = text(field, value)?,
      _ => {
        return Err(Error::UnknownField {
          type_name: "Amenity",
          field:     field.to_owned(),
        });
      }
    }
    Ok(())
  }
}

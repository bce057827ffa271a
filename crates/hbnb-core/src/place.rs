//! Places: the listings users host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  city::City,
  entity::{
    IdOr, InstanceId, Updatable, apply_fields, count, impl_entity, new_id,
    number, text, timestamp,
  },
  manager::RepositoryManager,
  repository::Repository,
  user::User,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
  #[serde(default = "new_id")]
  pub id:                  String,
  pub name:                String,
  #[serde(default)]
  pub description:         String,
  #[serde(default)]
  pub address:             String,
  #[serde(default)]
  pub latitude:            f64,
  #[serde(default)]
  pub longitude:           f64,
  /// Id of the hosting [`User`].
  pub host_id:             String,
  pub city_id:             String,
  #[serde(default)]
  pub price_per_night:     u32,
  #[serde(default)]
  pub number_of_rooms:     u32,
  #[serde(default)]
  pub number_of_bathrooms: u32,
  #[serde(default)]
  pub max_guests:          u32,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub created_at:          DateTime<Utc>,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub updated_at:          DateTime<Utc>,
  #[serde(skip, default = "InstanceId::fresh")]
  pub instance:            InstanceId,
}

impl_entity!(Place);

/// Input to [`Place::create`]. Everything but the host and city defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlace {
  pub name:                String,
  #[serde(default)]
  pub description:         String,
  #[serde(default)]
  pub address:             String,
  #[serde(default)]
  pub latitude:            f64,
  #[serde(default)]
  pub longitude:           f64,
  pub host_id:             String,
  pub city_id:             String,
  #[serde(default)]
  pub price_per_night:     u32,
  #[serde(default)]
  pub number_of_rooms:     u32,
  #[serde(default)]
  pub number_of_bathrooms: u32,
  #[serde(default)]
  pub max_guests:          u32,
}

impl Place {
  pub fn new(input: NewPlace) -> Self {
    let now = Utc::now();
    Self {
      id:                  new_id(),
      name:                input.name,
      description:         input.description,
      address:             input.address,
      latitude:            input.latitude,
      longitude:           input.longitude,
      host_id:             input.host_id,
      city_id:             input.city_id,
      price_per_night:     input.price_per_night,
      number_of_rooms:     input.number_of_rooms,
      number_of_bathrooms: input.number_of_bathrooms,
      max_guests:          input.max_guests,
      created_at:          now,
      updated_at:          now,
      instance:            InstanceId::fresh(),
    }
  }

  /// Create and persist a place. Host and city must both exist.
  pub async fn create<R: Repository>(
    repo: &RepositoryManager<R>,
    input: NewPlace,
  ) -> Result<Self> {
    if repo.find::<User>(&input.host_id).await?.is_none() {
      return Err(Error::UserNotFound(input.host_id));
    }
    if repo.find::<City>(&input.city_id).await?.is_none() {
      return Err(Error::CityNotFound(input.city_id));
    }

    let place = Self::new(input);
    repo.save(&place).await?;
    Ok(place)
  }

  /// Assign `fields` and persist. The host cannot be reassigned; a new
  /// `city_id` must name an existing city.
  pub async fn update<R: Repository>(
    repo: &RepositoryManager<R>,
    target: impl Into<IdOr<Self>>,
    fields: Map<String, Value>,
  ) -> Result<Option<Self>> {
    let Some(mut place) = repo.resolve(target.into()).await? else {
      return Ok(None);
    };
    let moves_city = fields.contains_key("city_id");
    apply_fields(&mut place, fields)?;

    if moves_city && repo.find::<City>(&place.city_id).await?.is_none() {
      return Err(Error::CityNotFound(place.city_id));
    }

    repo.update(place).await
  }
}

impl Updatable for Place {
  fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
    match field {
      "name" => self.name = text(field, value)?,
      "description" => self.description = text(field, value)?,
      "address" => self.address = text(field, value)?,
      "latitude" => self.latitude = number(field, value)?,
      "longitude" => self.longitude = number(field, value)?,
      "city_id" => self.city_id = text(field, value)?,
      "price_per_night" => self.price_per_night = count(field, value)?,
      "number_of_rooms" => self.number_of_rooms = count(field, value)?,
      "number_of_bathrooms" => self.number_of_bathrooms = count(field, value)?,
      "max_guests" => self.max_guests = count(field, value)?,
      _ => {
        return Err(Error::UnknownField {
          type_name: "Place",
          field:     field.to_owned(),
        });
      }
    }
    Ok(())
  }
}

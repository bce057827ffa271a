//! Reviews users leave on places.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  entity::{
    IdOr, InstanceId, Updatable, apply_fields, impl_entity, invalid, new_id,
    number, text, timestamp,
  },
  manager::RepositoryManager,
  place::Place,
  repository::Repository,
  user::User,
};

/// Inclusive bounds of a review rating.
pub const RATING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=5.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
  #[serde(default = "new_id")]
  pub id:         String,
  pub place_id:   String,
  /// Id of the authoring [`User`].
  pub user_id:    String,
  pub comment:    String,
  pub rating:     f64,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub created_at: DateTime<Utc>,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub updated_at: DateTime<Utc>,
  #[serde(skip, default = "InstanceId::fresh")]
  pub instance:   InstanceId,
}

impl_entity!(Review);

/// Input to [`Review::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
  pub place_id: String,
  pub user_id:  String,
  pub comment:  String,
  pub rating:   f64,
}

impl Review {
  pub fn new(input: NewReview) -> Self {
    let now = Utc::now();
    Self {
      id:         new_id(),
      place_id:   input.place_id,
      user_id:    input.user_id,
      comment:    input.comment,
      rating:     input.rating,
      created_at: now,
      updated_at: now,
      instance:   InstanceId::fresh(),
    }
  }

  /// Create and persist a review. Author and place must both exist.
  pub async fn create<R: Repository>(
    repo: &RepositoryManager<R>,
    input: NewReview,
  ) -> Result<Self> {
    check_rating(input.rating)?;
    if repo.find::<User>(&input.user_id).await?.is_none() {
      return Err(Error::UserNotFound(input.user_id));
    }
    if repo.find::<Place>(&input.place_id).await?.is_none() {
      return Err(Error::PlaceNotFound(input.place_id));
    }

    let review = Self::new(input);
    repo.save(&review).await?;
    Ok(review)
  }

  /// Assign `fields` (`comment`, `rating`) and persist.
  pub async fn update<R: Repository>(
    repo: &RepositoryManager<R>,
    target: impl Into<IdOr<Self>>,
    fields: Map<String, Value>,
  ) -> Result<Option<Self>> {
    let Some(mut review) = repo.resolve(target.into()).await? else {
      return Ok(None);
    };
    apply_fields(&mut review, fields)?;
    repo.update(review).await
  }

  pub async fn for_place<R: Repository>(
    repo: &RepositoryManager<R>,
    place_id: &str,
  ) -> Result<Vec<Self>> {
    let mut reviews = repo.all::<Self>().await?;
    reviews.retain(|review| review.place_id == place_id);
    Ok(reviews)
  }

  pub async fn by_user<R: Repository>(
    repo: &RepositoryManager<R>,
    user_id: &str,
  ) -> Result<Vec<Self>> {
    let mut reviews = repo.all::<Self>().await?;
    reviews.retain(|review| review.user_id == user_id);
    Ok(reviews)
  }
}

fn check_rating(rating: f64) -> Result<f64> {
  if RATING_RANGE.contains(&rating) {
    Ok(rating)
  } else {
    Err(invalid("rating", format!("{rating} is outside 0 to 5")))
  }
}

impl Updatable for Review {
  fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
    match field {
      "comment" => self.comment = text(field, value)?,
      "rating" => self.rating = check_rating(number(field, value)?)?,
      _ => {
        return Err(Error::UnknownField {
          type_name: "Review",
          field:     field.to_owned(),
        });
      }
    }
    Ok(())
  }
}

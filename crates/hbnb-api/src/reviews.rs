//! Handlers for review endpoints, which hang off `/reviews`, `/places` and
//! `/users`.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hbnb_core::{
  place::Place,
  repository::Repository,
  review::{NewReview, Review},
};
use serde_json::{Map, Value};

use crate::{
  AppState,
  auth::{Admin, CurrentUser},
  error::{ApiError, Result},
};

fn not_found(id: &str) -> ApiError {
  ApiError::NotFound(format!("review with ID {id} not found"))
}

/// `GET /reviews`
pub async fn list<R: Repository + 'static>(
  State(state): State<AppState<R>>,
) -> Result<Json<Vec<Review>>> {
  Ok(Json(state.repo.all::<Review>().await?))
}

/// `GET /reviews/{id}`
pub async fn get_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
) -> Result<Json<Review>> {
  let review = state
    .repo
    .find::<Review>(&id)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(review))
}

/// `PUT /reviews/{id}`: author only; anyone else gets a 404.
pub async fn update_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<String>,
  Json(mut body): Json<Map<String, Value>>,
) -> Result<Json<Review>> {
  let review = state
    .repo
    .find::<Review>(&id)
    .await?
    .filter(|review| review.user_id == user.id)
    .ok_or_else(|| not_found(&id))?;

  body.remove("user_id");
  let review = Review::update(&state.repo, review, body)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(review))
}

/// `DELETE /reviews/{id}`
pub async fn delete_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _user: CurrentUser,
  Path(id): Path<String>,
) -> Result<StatusCode> {
  if !Review::delete(&state.repo, id.as_str()).await? {
    return Err(not_found(&id));
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /places/{id}/reviews`
pub async fn for_place<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  Path(place_id): Path<String>,
) -> Result<Json<Vec<Review>>> {
  Ok(Json(Review::for_place(&state.repo, &place_id).await?))
}

/// `POST /places/{id}/reviews`: the caller is the author. Naming another
/// author is forbidden unless the caller is an admin.
pub async fn create_for_place<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  CurrentUser(user): CurrentUser,
  Path(place_id): Path<String>,
  Json(mut body): Json<Map<String, Value>>,
) -> Result<impl IntoResponse> {
  if let Some(Value::String(author)) = body.get("user_id")
    && *author != user.id
    && !user.is_admin
  {
    return Err(ApiError::Forbidden);
  }
  if state.repo.find::<Place>(&place_id).await?.is_none() {
    return Err(ApiError::NotFound(format!(
      "place with ID {place_id} not found"
    )));
  }
  body.insert("place_id".into(), Value::String(place_id));
  if !user.is_admin || !body.contains_key("user_id") {
    body.insert("user_id".into(), Value::String(user.id));
  }

  let input: NewReview = serde_json::from_value(Value::Object(body))
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let review = Review::create(&state.repo, input).await?;
  Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /users/{id}/reviews`: admin only.
pub async fn by_user<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<Review>>> {
  Ok(Json(Review::by_user(&state.repo, &user_id).await?))
}

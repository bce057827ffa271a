//! Handlers for `/places` endpoints.
//!
//! Any authenticated user may list a place; it is always hosted by the
//! caller. Only the host or an admin may edit it, and only the host may
//! delete it.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hbnb_core::{
  place::{NewPlace, Place},
  repository::Repository,
};
use serde_json::{Map, Value};

use crate::{
  AppState,
  auth::CurrentUser,
  error::{ApiError, Result},
};

fn not_found(id: &str) -> ApiError {
  ApiError::NotFound(format!("place with ID {id} not found"))
}

/// `GET /places`
pub async fn list<R: Repository + 'static>(
  State(state): State<AppState<R>>,
) -> Result<Json<Vec<Place>>> {
  Ok(Json(state.repo.all::<Place>().await?))
}

/// `POST /places`: `host_id` may be omitted; naming another user is
/// forbidden unless the caller is an admin.
pub async fn create<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  CurrentUser(user): CurrentUser,
  Json(mut body): Json<Map<String, Value>>,
) -> Result<impl IntoResponse> {
  if let Some(Value::String(host_id)) = body.get("host_id")
    && *host_id != user.id
    && !user.is_admin
  {
    return Err(ApiError::Forbidden);
  }
  if !user.is_admin || !body.contains_key("host_id") {
    body.insert("host_id".into(), Value::String(user.id));
  }

  let input: NewPlace = serde_json::from_value(Value::Object(body))
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let place = Place::create(&state.repo, input).await?;
  Ok((StatusCode::CREATED, Json(place)))
}

/// `GET /places/{id}`
pub async fn get_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
) -> Result<Json<Place>> {
  let place = state
    .repo
    .find::<Place>(&id)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(place))
}

/// `PUT /places/{id}`: a `host_id` in the body is ignored.
pub async fn update_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<String>,
  Json(mut body): Json<Map<String, Value>>,
) -> Result<Json<Place>> {
  let place = state
    .repo
    .find::<Place>(&id)
    .await?
    .ok_or_else(|| not_found(&id))?;
  if place.host_id != user.id && !user.is_admin {
    return Err(ApiError::Forbidden);
  }

  body.remove("host_id");
  let place = Place::update(&state.repo, place, body)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(place))
}

/// `DELETE /places/{id}`: another user's place looks missing.
pub async fn delete_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<String>,
) -> Result<StatusCode> {
  let place = state
    .repo
    .find::<Place>(&id)
    .await?
    .filter(|place| place.host_id == user.id)
    .ok_or_else(|| not_found(&id))?;

  Place::delete(&state.repo, place).await?;
  Ok(StatusCode::NO_CONTENT)
}

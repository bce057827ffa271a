//! Handlers for `/amenities` endpoints. Writes are admin only.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hbnb_core::{
  amenity::{Amenity, NewAmenity},
  repository::Repository,
};
use serde_json::{Map, Value};

use crate::{
  AppState,
  auth::Admin,
  error::{ApiError, Result},
};

fn not_found(id: &str) -> ApiError {
  ApiError::NotFound(format!("amenity with ID {id} not found"))
}

/// `GET /amenities`
pub async fn list<R: Repository + 'static>(
  State(state): State<AppState<R>>,
) -> Result<Json<Vec<Amenity>>> {
  Ok(Json(state.repo.all::<Amenity>().await?))
}

/// `POST /amenities` with body `{"name":…}`
pub async fn create<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Json(body): Json<NewAmenity>,
) -> Result<impl IntoResponse> {
  let amenity = Amenity::create(&state.repo, body).await?;
  Ok((StatusCode::CREATED, Json(amenity)))
}

/// `GET /amenities/{id}`
pub async fn get_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
) -> Result<Json<Amenity>> {
  let amenity = state
    .repo
    .find::<Amenity>(&id)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(amenity))
}

/// `PUT /amenities/{id}`
pub async fn update_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Path(id): Path<String>,
  Json(body): Json<Map<String, Value>>,
) -> Result<Json<Amenity>> {
  let amenity = Amenity::update(&state.repo, id.as_str(), body)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(amenity))
}

/// `DELETE /amenities/{id}`
pub async fn delete_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Path(id): Path<String>,
) -> Result<StatusCode> {
  if !Amenity::delete(&state.repo, id.as_str()).await? {
    return Err(not_found(&id));
  }
  Ok(StatusCode::NO_CONTENT)
}

//! Handlers for `/cities` endpoints. Writes are admin only.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hbnb_core::{
  city::{City, NewCity},
  repository::Repository,
};
use serde_json::{Map, Value};

use crate::{
  AppState,
  auth::Admin,
  error::{ApiError, Result},
};

fn not_found(id: &str) -> ApiError {
  ApiError::NotFound(format!("city with ID {id} not found"))
}

/// `GET /cities`
pub async fn list<R: Repository + 'static>(
  State(state): State<AppState<R>>,
) -> Result<Json<Vec<City>>> {
  Ok(Json(state.repo.all::<City>().await?))
}

/// `POST /cities` with body `{"name":…,"country_code":…}`
pub async fn create<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Json(body): Json<NewCity>,
) -> Result<impl IntoResponse> {
  let city = City::create(&state.repo, body).await?;
  Ok((StatusCode::CREATED, Json(city)))
}

/// `GET /cities/{id}`
pub async fn get_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
) -> Result<Json<City>> {
  let city = state
    .repo
    .find::<City>(&id)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(city))
}

/// `PUT /cities/{id}`
pub async fn update_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Path(id): Path<String>,
  Json(body): Json<Map<String, Value>>,
) -> Result<Json<City>> {
  let city = City::update(&state.repo, id.as_str(), body)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(city))
}

/// `DELETE /cities/{id}`
pub async fn delete_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Path(id): Path<String>,
) -> Result<StatusCode> {
  if !City::delete(&state.repo, id.as_str()).await? {
    return Err(not_found(&id));
  }
  Ok(StatusCode::NO_CONTENT)
}

//! Handlers for `/countries` endpoints. Countries are read-only over HTTP.

use axum::{
  Json,
  extract::{Path, State},
};
use hbnb_core::{city::City, country::Country, repository::Repository};

use crate::{
  AppState,
  error::{ApiError, Result},
};

/// `GET /countries`
pub async fn list<R: Repository + 'static>(
  State(state): State<AppState<R>>,
) -> Result<Json<Vec<Country>>> {
  Ok(Json(state.repo.all::<Country>().await?))
}

async fn lookup<R: Repository>(state: &AppState<R>, code: &str) -> Result<Country> {
  Country::get(&state.repo, code)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("country {code} not found")))
}

/// `GET /countries/{code}`
pub async fn get_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  Path(code): Path<String>,
) -> Result<Json<Country>> {
  Ok(Json(lookup(&state, &code).await?))
}

/// `GET /countries/{code}/cities`
pub async fn cities<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  Path(code): Path<String>,
) -> Result<Json<Vec<City>>> {
  let country = lookup(&state, &code).await?;
  Ok(Json(City::in_country(&state.repo, &country.code).await?))
}

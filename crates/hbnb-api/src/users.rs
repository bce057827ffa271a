//! Handlers for `/users` endpoints.
//!
//! | Method   | Path          | Notes        |
//! |----------|---------------|--------------|
//! | `GET`    | `/users`      |              |
//! | `POST`   | `/users`      | Admin only   |
//! | `GET`    | `/users/{id}` | 404 if unknown |
//! | `PUT`    | `/users/{id}` | Admin only   |
//! | `DELETE` | `/users/{id}` | Admin only   |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use hbnb_core::{
  entity::timestamp,
  repository::Repository,
  user::{NewUser, User},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
  AppState,
  auth::Admin,
  error::{ApiError, Result},
};

/// A user as the API shows it: everything but the password hash.
#[derive(Debug, Serialize)]
pub struct UserView {
  pub id:         String,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub is_admin:   bool,
  #[serde(with = "timestamp")]
  pub created_at: DateTime<Utc>,
  #[serde(with = "timestamp")]
  pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
  fn from(user: User) -> Self {
    Self {
      id:         user.id,
      email:      user.email,
      first_name: user.first_name,
      last_name:  user.last_name,
      is_admin:   user.is_admin,
      created_at: user.created_at,
      updated_at: user.updated_at,
    }
  }
}

fn not_found(id: &str) -> ApiError {
  ApiError::NotFound(format!("user with ID {id} not found"))
}

/// `GET /users`
pub async fn list<R: Repository + 'static>(
  State(state): State<AppState<R>>,
) -> Result<Json<Vec<UserView>>> {
  let users = state.repo.all::<User>().await?;
  Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// `POST /users`
pub async fn create<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse> {
  let user = User::create(&state.repo, body).await?;
  Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// `GET /users/{id}`
pub async fn get_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
) -> Result<Json<UserView>> {
  let user = state
    .repo
    .find::<User>(&id)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(user.into()))
}

/// `PUT /users/{id}` accepts any of `email`, `first_name`, `last_name`.
pub async fn update_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Path(id): Path<String>,
  Json(body): Json<Map<String, Value>>,
) -> Result<Json<UserView>> {
  let user = User::update(&state.repo, id.as_str(), body)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(user.into()))
}

/// `DELETE /users/{id}`
pub async fn delete_one<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  _admin: Admin,
  Path(id): Path<String>,
) -> Result<StatusCode> {
  if !User::delete(&state.repo, id.as_str()).await? {
    return Err(not_found(&id));
  }
  Ok(StatusCode::NO_CONTENT)
}

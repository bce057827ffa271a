//! Bearer-token authentication.
//!
//! `POST /auth/login` trades an email and password for an opaque token.
//! The token is 32 random bytes, base64url-encoded; only its SHA-256 digest
//! is kept server-side, next to the user id and an expiry. Handlers ask for
//! a [`CurrentUser`] or an [`Admin`] to require a valid token.

use std::collections::HashMap;

use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use hbnb_core::{repository::Repository, user::User};
use rand_core::{OsRng, RngCore};
use serde::Deserialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
  AppState,
  error::{ApiError, Result},
  users::UserView,
};

// ─── Token store ─────────────────────────────────────────────────────────────

struct Session {
  user_id:    String,
  expires_at: DateTime<Utc>,
}

/// Issued tokens, keyed by their SHA-256 hex digest.
pub struct TokenStore {
  ttl:      Duration,
  sessions: RwLock<HashMap<String, Session>>,
}

impl TokenStore {
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl,
      sessions: RwLock::new(HashMap::new()),
    }
  }

  /// Mint a token for `user_id`, valid for the configured lifetime.
  pub async fn issue(&self, user_id: &str) -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);

    let session = Session {
      user_id:    user_id.to_owned(),
      expires_at: Utc::now()
        .checked_add_signed(self.ttl)
        .unwrap_or(DateTime::<Utc>::MAX_UTC),
    };
    let mut sessions = self.sessions.write().await;
    let now = Utc::now();
    sessions.retain(|_, s| s.expires_at > now);
    sessions.insert(digest(&token), session);
    token
  }

  /// The user id `token` was issued to, unless it is unknown or expired.
  pub async fn resolve(&self, token: &str) -> Option<String> {
    let key = digest(token);
    let sessions = self.sessions.read().await;
    sessions
      .get(&key)
      .filter(|s| s.expires_at > Utc::now())
      .map(|s| s.user_id.clone())
  }
}

fn digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

fn bearer(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The user a valid bearer token belongs to.
pub struct CurrentUser(pub User);

impl<R: Repository + 'static> FromRequestParts<AppState<R>> for CurrentUser {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<R>,
  ) -> Result<Self> {
    let token = bearer(&parts.headers).ok_or_else(|| {
      ApiError::Unauthorized("missing authorization header".into())
    })?;
    let user_id = state
      .tokens
      .resolve(token)
      .await
      .ok_or_else(|| ApiError::Unauthorized("invalid or expired token".into()))?;
    let user = state
      .repo
      .find::<User>(&user_id)
      .await?
      .ok_or_else(|| ApiError::Unauthorized("user no longer exists".into()))?;
    Ok(Self(user))
  }
}

/// A [`CurrentUser`] with the admin flag set.
pub struct Admin(pub User);

impl<R: Repository + 'static> FromRequestParts<AppState<R>> for Admin {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<R>,
  ) -> Result<Self> {
    let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
    if !user.is_admin {
      return Err(ApiError::Forbidden);
    }
    Ok(Self(user))
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login` with body `{"email":…,"password":…}`
pub async fn login<R: Repository + 'static>(
  State(state): State<AppState<R>>,
  Json(body): Json<Credentials>,
) -> Result<Json<Value>> {
  let user = User::get_by_email(&state.repo, &body.email).await?;
  match user {
    Some(user) if user.verify_password(&body.password) => {
      let token = state.tokens.issue(&user.id).await;
      info!(user_id = %user.id, "login");
      Ok(Json(json!({ "access_token": token })))
    }
    _ => {
      warn!(email = %body.email, "rejected login");
      Err(ApiError::Unauthorized("invalid email or password".into()))
    }
  }
}

/// `GET /auth/login`: who the bearer token belongs to.
pub async fn whoami(CurrentUser(user): CurrentUser) -> Json<Value> {
  Json(json!({ "logged_in_as": UserView::from(user) }))
}

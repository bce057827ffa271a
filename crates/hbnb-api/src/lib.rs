//! JSON REST API for HBnB.
//!
//! Exposes an axum [`Router`] backed by any [`Repository`] through a shared
//! [`RepositoryManager`]. Errors are rendered as `{"error": "<message>"}`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = hbnb_api::router(AppState::new(manager, tokens));
//! axum::serve(listener, app).await?;
//! ```

pub mod amenities;
pub mod auth;
pub mod cities;
pub mod countries;
pub mod error;
pub mod places;
pub mod reviews;
pub mod users;

use std::sync::Arc;

use axum::{Router, routing::get};
use hbnb_core::{manager::RepositoryManager, repository::Repository};
use tower_http::trace::TraceLayer;

pub use auth::TokenStore;
pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<R> {
  pub repo:   Arc<RepositoryManager<R>>,
  pub tokens: Arc<TokenStore>,
}

impl<R> AppState<R> {
  pub fn new(repo: Arc<RepositoryManager<R>>, tokens: Arc<TokenStore>) -> Self {
    Self { repo, tokens }
  }
}

impl<R> Clone for AppState<R> {
  fn clone(&self) -> Self {
    Self {
      repo:   Arc::clone(&self.repo),
      tokens: Arc::clone(&self.tokens),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
pub fn router<R: Repository + 'static>(state: AppState<R>) -> Router {
  Router::new()
    // Auth
    .route("/auth/login", get(auth::whoami).post(auth::login::<R>))
    // Users
    .route("/users", get(users::list::<R>).post(users::create::<R>))
    .route(
      "/users/{id}",
      get(users::get_one::<R>)
        .put(users::update_one::<R>)
        .delete(users::delete_one::<R>),
    )
    .route("/users/{id}/reviews", get(reviews::by_user::<R>))
    // Countries
    .route("/countries", get(countries::list::<R>))
    .route("/countries/{code}", get(countries::get_one::<R>))
    .route("/countries/{code}/cities", get(countries::cities::<R>))
    // Cities
    .route("/cities", get(cities::list::<R>).post(cities::create::<R>))
    .route(
      "/cities/{id}",
      get(cities::get_one::<R>)
        .put(cities::update_one::<R>)
        .delete(cities::delete_one::<R>),
    )
    // Amenities
    .route(
      "/amenities",
      get(amenities::list::<R>).post(amenities::create::<R>),
    )
    .route(
      "/amenities/{id}",
      get(amenities::get_one::<R>)
        .put(amenities::update_one::<R>)
        .delete(amenities::delete_one::<R>),
    )
    // Places
    .route("/places", get(places::list::<R>).post(places::create::<R>))
    .route(
      "/places/{id}",
      get(places::get_one::<R>)
        .put(places::update_one::<R>)
        .delete(places::delete_one::<R>),
    )
    .route(
      "/places/{id}/reviews",
      get(reviews::for_place::<R>).post(reviews::create_for_place::<R>),
    )
    // Reviews
    .route("/reviews", get(reviews::list::<R>))
    .route(
      "/reviews/{id}",
      get(reviews::get_one::<R>)
        .put(reviews::update_one::<R>)
        .delete(reviews::delete_one::<R>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;

//! Router tests against the in-memory repository.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use chrono::Duration;
use hbnb_core::{
  manager::RepositoryManager,
  registry::TypeRegistry,
  user::{NewUser, User},
};
use hbnb_store::MemoryRepository;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, TokenStore, router};

struct Harness {
  state: AppState<MemoryRepository>,
}

impl Harness {
  fn new() -> Self {
    let registry = Arc::new(TypeRegistry::standard());
    let repo = MemoryRepository::new(registry.clone());
    let state = AppState::new(
      Arc::new(RepositoryManager::new(registry, repo)),
      Arc::new(TokenStore::new(Duration::hours(1))),
    );
    Self { state }
  }

  fn app(&self) -> Router { router(self.state.clone()) }

  async fn user(&self, email: &str, is_admin: bool) -> User {
    User::create(&self.state.repo, NewUser {
      email:      email.to_owned(),
      password:   "secret".to_owned(),
      first_name: "Test".to_owned(),
      last_name:  "User".to_owned(),
      is_admin,
    })
    .await
    .unwrap()
  }

  async fn login(&self, email: &str) -> String {
    let (status, body) = self
      .call(Method::POST, "/auth/login", None, Some(json!({
        "email": email,
        "password": "secret"
      })))
      .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_owned()
  }

  async fn call(
    &self,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };

    let resp = self.app().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  /// Create a city in the seeded country and a place hosted by `host`.
  /// Returns the place id and the host's token.
  async fn place_for(&self, host: &User, admin_token: &str) -> (String, String) {
    let (_, city) = self
      .call(Method::POST, "/cities", Some(admin_token), Some(json!({
        "name": "Montevideo",
        "country_code": "UY"
      })))
      .await;
    let city_id = city["id"].as_str().unwrap().to_owned();

    let host_token = self.login(&host.email).await;
    let (status, place) = self
      .call(Method::POST, "/places", Some(&host_token), Some(json!({
        "name": "Loft",
        "city_id": city_id,
        "price_per_night": 80
      })))
      .await;
    assert_eq!(status, StatusCode::CREATED);
    (place["id"].as_str().unwrap().to_owned(), host_token)
  }
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_and_whoami() {
  let h = Harness::new();
  let user = h.user("a@example.com", false).await;
  let token = h.login("a@example.com").await;

  let (status, body) = h.call(Method::GET, "/auth/login", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["logged_in_as"]["id"], user.id.as_str());
  assert!(body["logged_in_as"].get("password").is_none());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
  let h = Harness::new();
  h.user("a@example.com", false).await;

  let (status, body) = h
    .call(Method::POST, "/auth/login", None, Some(json!({
      "email": "a@example.com",
      "password": "nope"
    })))
    .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn whoami_without_token_is_unauthorized() {
  let h = Harness::new();
  let (status, _) = h.call(Method::GET, "/auth/login", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, _) = h
    .call(Method::GET, "/auth/login", Some("forged"), None)
    .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn only_admins_create_users() {
  let h = Harness::new();
  h.user("admin@example.com", true).await;
  h.user("plain@example.com", false).await;
  let admin = h.login("admin@example.com").await;
  let plain = h.login("plain@example.com").await;

  let new_user = json!({
    "email": "new@example.com",
    "password": "pw",
    "first_name": "New",
    "last_name": "User"
  });

  let (status, _) = h
    .call(Method::POST, "/users", Some(&plain), Some(new_user.clone()))
    .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, body) = h
    .call(Method::POST, "/users", Some(&admin), Some(new_user.clone()))
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["email"], "new@example.com");
  assert!(body.get("password").is_none());

  let (status, _) = h
    .call(Method::POST, "/users", Some(&admin), Some(new_user))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_listing_hides_passwords() {
  let h = Harness::new();
  h.user("a@example.com", false).await;

  let (status, body) = h.call(Method::GET, "/users", None, None).await;
  assert_eq!(status, StatusCode::OK);
  let users = body.as_array().unwrap();
  assert_eq!(users.len(), 1);
  assert!(users[0].get("password").is_none());
}

#[tokio::test]
async fn user_update_and_delete() {
  let h = Harness::new();
  h.user("admin@example.com", true).await;
  let target = h.user("t@example.com", false).await;
  let admin = h.login("admin@example.com").await;
  let uri = format!("/users/{}", target.id);

  let (status, body) = h
    .call(Method::PUT, &uri, Some(&admin), Some(json!({ "first_name": "Renamed" })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["first_name"], "Renamed");

  let (status, _) = h
    .call(Method::PUT, &uri, Some(&admin), Some(json!({ "password": "x" })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = h.call(Method::DELETE, &uri, Some(&admin), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = h.call(Method::DELETE, &uri, Some(&admin), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = h.call(Method::GET, &uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Countries & cities ──────────────────────────────────────────────────────

#[tokio::test]
async fn countries_and_their_cities() {
  let h = Harness::new();
  h.user("admin@example.com", true).await;
  let admin = h.login("admin@example.com").await;

  let (status, body) = h.call(Method::GET, "/countries", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([{ "name": "Uruguay", "code": "UY" }]));

  let (status, _) = h.call(Method::GET, "/countries/ZZ", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = h
    .call(Method::POST, "/cities", Some(&admin), Some(json!({
      "name": "Rivera",
      "country_code": "UY"
    })))
    .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = h.call(Method::GET, "/countries/UY/cities", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
  assert_eq!(body[0]["name"], "Rivera");
}

#[tokio::test]
async fn city_in_unknown_country_is_bad_request() {
  let h = Harness::new();
  h.user("admin@example.com", true).await;
  let admin = h.login("admin@example.com").await;

  let (status, body) = h
    .call(Method::POST, "/cities", Some(&admin), Some(json!({
      "name": "Atlantis",
      "country_code": "ZZ"
    })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("ZZ"));
}

#[tokio::test]
async fn amenity_writes_need_admin() {
  let h = Harness::new();
  let (status, _) = h
    .call(Method::POST, "/amenities", None, Some(json!({ "name": "Wifi" })))
    .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Places & reviews ────────────────────────────────────────────────────────

#[tokio::test]
async fn place_is_hosted_by_the_caller() {
  let h = Harness::new();
  h.user("admin@example.com", true).await;
  let host = h.user("host@example.com", false).await;
  let other = h.user("other@example.com", false).await;
  let admin = h.login("admin@example.com").await;
  let (place_id, host_token) = h.place_for(&host, &admin).await;

  let (_, place) = h
    .call(Method::GET, &format!("/places/{place_id}"), None, None)
    .await;
  assert_eq!(place["host_id"], host.id.as_str());
  assert_eq!(place["price_per_night"], 80);

  let (status, _) = h
    .call(Method::POST, "/places", Some(&host_token), Some(json!({
      "name": "Stolen",
      "host_id": other.id,
      "city_id": place["city_id"]
    })))
    .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_host_or_admin_edit_a_place() {
  let h = Harness::new();
  h.user("admin@example.com", true).await;
  let host = h.user("host@example.com", false).await;
  h.user("other@example.com", false).await;
  let admin = h.login("admin@example.com").await;
  let other = h.login("other@example.com").await;
  let (place_id, host_token) = h.place_for(&host, &admin).await;
  let uri = format!("/places/{place_id}");

  let (status, _) = h
    .call(Method::PUT, &uri, Some(&other), Some(json!({ "name": "Mine" })))
    .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, body) = h
    .call(Method::PUT, &uri, Some(&admin), Some(json!({
      "name": "Renamed",
      "host_id": "someone-else"
    })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Renamed");
  assert_eq!(body["host_id"], host.id.as_str());

  let (status, _) = h.call(Method::DELETE, &uri, Some(&other), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = h.call(Method::DELETE, &uri, Some(&host_token), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn reviews_for_a_place() {
  let h = Harness::new();
  h.user("admin@example.com", true).await;
  let host = h.user("host@example.com", false).await;
  let guest = h.user("guest@example.com", false).await;
  let admin = h.login("admin@example.com").await;
  let guest_token = h.login("guest@example.com").await;
  let (place_id, host_token) = h.place_for(&host, &admin).await;
  let uri = format!("/places/{place_id}/reviews");

  let (status, review) = h
    .call(Method::POST, &uri, Some(&guest_token), Some(json!({
      "comment": "Lovely",
      "rating": 5
    })))
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(review["user_id"], guest.id.as_str());
  assert_eq!(review["place_id"], place_id.as_str());

  let (status, _) = h
    .call(Method::POST, &uri, Some(&guest_token), Some(json!({
      "comment": "Off the charts",
      "rating": 11
    })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, listed) = h.call(Method::GET, &uri, None, None).await;
  assert_eq!(listed.as_array().unwrap().len(), 1);

  let review_uri = format!("/reviews/{}", review["id"].as_str().unwrap());
  let (status, _) = h
    .call(Method::PUT, &review_uri, Some(&host_token), Some(json!({ "comment": "Meh" })))
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = h
    .call(Method::PUT, &review_uri, Some(&guest_token), Some(json!({ "comment": "Great" })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["comment"], "Great");

  let by_user = format!("/users/{}/reviews", guest.id);
  let (status, _) = h.call(Method::GET, &by_user, Some(&guest_token), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  let (status, body) = h.call(Method::GET, &by_user, Some(&admin), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (status, _) = h.call(Method::DELETE, &review_uri, Some(&guest_token), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = h.call(Method::GET, &review_uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_on_missing_place_is_not_found() {
  let h = Harness::new();
  h.user("guest@example.com", false).await;
  let token = h.login("guest@example.com").await;

  let (status, _) = h
    .call(Method::POST, "/places/nowhere/reviews", Some(&token), Some(json!({
      "comment": "?",
      "rating": 3
    })))
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

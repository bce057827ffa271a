//! Users, their credentials, and the unique-email rule.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use chrono::{DateTime, Utc};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  entity::{
    IdOr, InstanceId, Updatable, apply_fields, impl_entity, new_id, text,
    timestamp,
  },
  manager::RepositoryManager,
  repository::Repository,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  #[serde(default = "new_id")]
  pub id:         String,
  pub email:      String,
  /// Argon2 PHC string, e.g. `$argon2id$v=19$…`. Never the raw password.
  pub password:   String,
  pub first_name: String,
  pub last_name:  String,
  #[serde(default)]
  pub is_admin:   bool,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub created_at: DateTime<Utc>,
  #[serde(default = "Utc::now", with = "timestamp")]
  pub updated_at: DateTime<Utc>,
  #[serde(skip, default = "InstanceId::fresh")]
  pub instance:   InstanceId,
}

impl_entity!(User);

/// Input to [`User::create`]. `password` is the raw password; it is hashed
/// before anything is stored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub email:      String,
  pub password:   String,
  pub first_name: String,
  pub last_name:  String,
  #[serde(default)]
  pub is_admin:   bool,
}

impl User {
  /// Build a user, hashing `input.password`.
  pub fn new(input: NewUser) -> Result<Self> {
    let now = Utc::now();
    let mut user = Self {
      id:         new_id(),
      email:      input.email,
      password:   String::new(),
      first_name: input.first_name,
      last_name:  input.last_name,
      is_admin:   input.is_admin,
      created_at: now,
      updated_at: now,
      instance:   InstanceId::fresh(),
    };
    user.set_password(&input.password)?;
    Ok(user)
  }

  /// Replace the stored hash with a freshly salted hash of `password`.
  pub fn set_password(&mut self, password: &str) -> Result<()> {
    let salt = SaltString::generate(&mut OsRng);
    self.password = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| Error::PasswordHash(e.to_string()))?
      .to_string();
    Ok(())
  }

  /// Check `password` against the stored hash. A malformed hash never
  /// verifies.
  pub fn verify_password(&self, password: &str) -> bool {
    PasswordHash::new(&self.password)
      .and_then(|parsed| {
        Argon2::default().verify_password(password.as_bytes(), &parsed)
      })
      .is_ok()
  }

  /// Create and persist a user. The email must not be registered yet.
  pub async fn create<R: Repository>(
    repo: &RepositoryManager<R>,
    input: NewUser,
  ) -> Result<Self> {
    let user = Self::new(input)?;

    let _guard = repo.write_guard().await;
    if Self::get_by_email(repo, &user.email).await?.is_some() {
      return Err(Error::EmailTaken(user.email));
    }
    repo.save(&user).await?;
    Ok(user)
  }

  /// Assign `fields` (`email`, `first_name`, `last_name`) and persist.
  /// `None` when the user does not exist.
  pub async fn update<R: Repository>(
    repo: &RepositoryManager<R>,
    target: impl Into<IdOr<Self>>,
    fields: Map<String, Value>,
  ) -> Result<Option<Self>> {
    let Some(mut user) = repo.resolve(target.into()).await? else {
      return Ok(None);
    };
    apply_fields(&mut user, fields)?;

    let _guard = repo.write_guard().await;
    if let Some(other) = Self::get_by_email(repo, &user.email).await?
      && other.id != user.id
    {
      return Err(Error::EmailTaken(user.email));
    }

    repo.update(user).await
  }

  pub async fn get_by_email<R: Repository>(
    repo: &RepositoryManager<R>,
    email: &str,
  ) -> Result<Option<Self>> {
    Ok(
      repo
        .all::<Self>()
        .await?
        .into_iter()
        .find(|user| user.email == email),
    )
  }
}

impl Updatable for User {
  fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
    match field {
      "email" => self.email = text(field, value)?,
      "first_name" => self.first_name = text(field, value)?,
      "last_name" => self.last_name = text(field, value)?,
      _ => {
        return Err(Error::UnknownField {
          type_name: "User",
          field:     field.to_owned(),
        });
      }
    }
    Ok(())
  }
}

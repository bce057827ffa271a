//! Error types for `hbnb-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("country {0} not found")]
  CountryNotFound(String),

  #[error("city with ID {0} not found")]
  CityNotFound(String),

  #[error("user with ID {0} not found")]
  UserNotFound(String),

  #[error("place with ID {0} not found")]
  PlaceNotFound(String),

  #[error("user with email {0:?} already exists")]
  EmailTaken(String),

  #[error("city {name:?} already exists in {country_code}")]
  CityExists { name: String, country_code: String },

  #[error("amenity {0:?} already exists")]
  AmenityExists(String),

  #[error("country code must be a 2-letter string, got {0:?}")]
  InvalidCountryCode(String),

  #[error("{type_name} has no updatable field {field:?}")]
  UnknownField {
    type_name: &'static str,
    field:     String,
  },

  #[error("invalid value for {field:?}: {reason}")]
  InvalidField { field: String, reason: String },

  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error("unknown entity type: {0:?}")]
  UnknownType(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Whether this error is a rejected request rather than a failure of the
  /// service itself.
  pub fn is_validation(&self) -> bool {
    !matches!(
      self,
      Self::PasswordHash(_)
        | Self::UnknownType(_)
        | Self::Serialization(_)
        | Self::Storage(_)
    )
  }

  pub(crate) fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

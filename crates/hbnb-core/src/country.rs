//! Countries.
//!
//! A country is keyed by its two-letter code instead of a generated UUID and
//! carries no timestamps. Cities reference it by code, so there is no update
//! or delete path.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  entity::{InstanceId, Model},
  manager::RepositoryManager,
  record::Record,
  repository::Repository,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
  pub name:     String,
  /// Two-letter code; the primary key.
  pub code:     String,
  #[serde(skip, default = "InstanceId::fresh")]
  pub instance: InstanceId,
}

impl Country {
  /// Build a country, rejecting codes that are not exactly two letters.
  pub fn new(name: impl Into<String>, code: impl Into<String>) -> Result<Self> {
    let code = code.into();
    if code.chars().count() != 2 || !code.chars().all(char::is_alphabetic) {
      return Err(Error::InvalidCountryCode(code));
    }
    Ok(Self {
      name: name.into(),
      code,
      instance: InstanceId::fresh(),
    })
  }

  pub async fn create<R: Repository>(
    repo: &RepositoryManager<R>,
    name: &str,
    code: &str,
  ) -> Result<Self> {
    let country = Self::new(name, code)?;
    repo.save(&country).await?;
    Ok(country)
  }

  /// Look a country up by code.
  pub async fn get<R: Repository>(
    repo: &RepositoryManager<R>,
    code: &str,
  ) -> Result<Option<Self>> {
    Ok(
      repo
        .all::<Self>()
        .await?
        .into_iter()
        .find(|country| country.code == code),
    )
  }
}

impl Model for Country {
  const TYPE_NAME: &'static str = "Country";

  fn key(&self) -> &str { &self.code }

  fn instance(&self) -> InstanceId { self.instance }

  fn into_record(self) -> Record { Record::Country(self) }

  fn from_record(record: Record) -> Option<Self> {
    match record {
      Record::Country(country) => Some(country),
      _ => None,
    }
  }
}

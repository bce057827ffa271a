//! Startup data for a fresh relational store.

use anyhow::{Context as _, bail};
use hbnb_core::{country::Country, manager::RepositoryManager, repository::Repository};
use tracing::info;

/// `name<TAB>code` per line.
const COUNTRIES: &str = include_str!("countries.tsv");

fn parse_countries(text: &str) -> anyhow::Result<Vec<(&str, &str)>> {
  text
    .lines()
    .enumerate()
    .filter(|(_, line)| !line.trim().is_empty())
    .map(|(n, line)| match line.split_once('\t') {
      Some((name, code)) => Ok((name.trim(), code.trim())),
      None => bail!("countries line {}: expected name<TAB>code", n + 1),
    })
    .collect()
}

/// Insert the built-in country list unless some country already exists.
/// Returns how many were inserted.
pub async fn seed_countries<R: Repository>(
  repo: &RepositoryManager<R>,
) -> anyhow::Result<usize> {
  if !repo.all::<Country>().await?.is_empty() {
    info!("countries already present, skipping seed");
    return Ok(0);
  }

  let countries = parse_countries(COUNTRIES)?;
  for (name, code) in &countries {
    Country::create(repo, name, code)
      .await
      .with_context(|| format!("failed to seed country {code}"))?;
  }
  info!(count = countries.len(), "seeded countries");
  Ok(countries.len())
}

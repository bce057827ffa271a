//! hbnb server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `HBNB_*`
//! environment variables, opens the configured repository and serves the
//! JSON API over HTTP.
//!
//! # Bootstrapping an admin
//!
//! ```
//! cargo run -p hbnb-server -- --create-admin
//! ```

mod seed;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use hbnb_api::{AppState, TokenStore};
use hbnb_core::{
  manager::RepositoryManager,
  registry::TypeRegistry,
  user::{NewUser, User},
};
use hbnb_store::{Backend, BackendKind};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "HBnB rental API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Prompt for an email and password on stdin, create an admin user and
  /// exit.
  #[arg(long)]
  create_admin: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // `REPO` is the older name for the backend setting and wins over both.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("HBNB"))
    .set_override_option("repository", std::env::var("REPO").ok())
    .context("failed to apply REPO override")?
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  let token_ttl = server_cfg.token_ttl()?;

  let registry = Arc::new(TypeRegistry::standard());
  let backend = Backend::open(&server_cfg.storage(), registry.clone())
    .await
    .with_context(|| format!("failed to open {} repository", server_cfg.repository))?;
  let kind = backend.kind();
  let repo = Arc::new(RepositoryManager::new(registry, backend));

  if cli.create_admin {
    let user = create_admin(repo.as_ref()).await?;
    println!("created admin {} ({})", user.email, user.id);
    return Ok(());
  }

  if kind == BackendKind::Db {
    seed::seed_countries(repo.as_ref()).await?;
  }

  let tokens = TokenStore::new(token_ttl);
  let app = hbnb_api::router(AppState::new(repo, Arc::new(tokens)));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn create_admin(
  repo: &RepositoryManager<Backend>,
) -> anyhow::Result<User> {
  let email = prompt("Email")?;
  let password = prompt("Password")?;
  User::create(repo, NewUser {
    email,
    password,
    first_name: "Admin".to_owned(),
    last_name: "User".to_owned(),
    is_admin: true,
  })
  .await
  .context("failed to create admin")
}

/// Read one line from stdin after printing `label`.
fn prompt(label: &str) -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("{label}: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let value = line.trim_end_matches(['\n', '\r']).to_owned();
  anyhow::ensure!(!value.is_empty(), "{label} must not be empty");
  Ok(value)
}

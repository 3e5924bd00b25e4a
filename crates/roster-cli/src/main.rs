//! `roster` — command-line driver for the café roster.
//!
//! Reads `roster.toml` (or the path given with `--config`) and `ROSTER_*`
//! environment variables, opens the SQLite store, runs one command and prints
//! its result as JSON. Logs go to stderr; set `RUST_LOG` to adjust.
//!
//! ```
//! roster cafe add "Brew Lab" --location Orchard
//! roster employee add UI0000001 --name Ada --email ada@example.com --phone 91234567 --gender female
//! roster assign UI0000001 <cafe-id>
//! roster transfer UI0000001 <other-cafe-id> --date 2024-03-01T09:00:00Z
//! ```

mod cli;
mod commands;
mod settings;

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use roster_core::service::AssignmentService;
use roster_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(database) = cli.database {
    settings.database_path = database;
  }

  let store = SqliteStore::open(&settings.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.database_path))?;

  let service = AssignmentService::with_system_clock(Arc::new(store))
    .with_retention(settings.retention);
  tracing::debug!(
    database = %settings.database_path.display(),
    retention = ?service.retention(),
    "store opened"
  );

  let output = commands::run(cli.command, &service).await?;
  println!("{}", serde_json::to_string_pretty(&output)?);

  Ok(())
}

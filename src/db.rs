use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

use crate::catalog::WorkoutCatalog;
use crate::config::PlannerConfig;

pub type DbPool = SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
  #[error("Configuration error: {0}")]
  Config(#[from] crate::config::ConfigError),

  #[error("Catalog error: {0}")]
  Catalog(#[from] crate::catalog::CatalogError),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Application state holding the database pool and the loaded catalog
#[derive(Debug, Clone)]
pub struct AppState {
  pub db: DbPool,
  pub catalog: Arc<WorkoutCatalog>,
}

impl AppState {
  /// Open the database and load the catalog named by `config`
  pub async fn initialize(config: &PlannerConfig) -> Result<Self, InitError> {
    let catalog = config.load_catalog()?;
    let db = initialize_db(config).await?;
    Ok(Self {
      db,
      catalog: Arc::new(catalog),
    })
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &PlannerConfig) -> Result<DbPool, InitError> {
  tracing::info!(
    url = %config.database_url,
    max_connections = config.max_connections,
    "Initializing database"
  );

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .connect(&config.database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}

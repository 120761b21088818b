use std::env;
use std::path::PathBuf;

use serde::Serialize;

use crate::catalog::{CatalogError, WorkoutCatalog};

const DATABASE_URL: &str = "MARATHON_DATABASE_URL";
const DB_MAX_CONNECTIONS: &str = "MARATHON_DB_MAX_CONNECTIONS";
const CATALOG_PATH: &str = "MARATHON_CATALOG_PATH";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid value for {key}: {value}")]
  InvalidValue { key: String, value: String },
}

impl Serialize for ConfigError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// Planner configuration loaded from environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
  pub database_url: String,
  pub max_connections: u32,
  /// JSON catalog to use instead of the embedded default
  pub catalog_path: Option<PathBuf>,
}

impl PlannerConfig {
  /// Load `.env` if present, then read the environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  pub fn from_env() -> Result<Self, ConfigError> {
    let database_url =
      env::var(DATABASE_URL).map_err(|_| ConfigError::MissingConfig(DATABASE_URL.into()))?;

    let max_connections = match env::var(DB_MAX_CONNECTIONS) {
      Ok(value) => value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ConfigError::InvalidValue {
          key: DB_MAX_CONNECTIONS.into(),
          value,
        })?,
      Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    let catalog_path = env::var(CATALOG_PATH)
      .ok()
      .filter(|p| !p.trim().is_empty())
      .map(PathBuf::from);

    Ok(Self {
      database_url,
      max_connections,
      catalog_path,
    })
  }

  /// The configured catalog file, or the embedded default
  pub fn load_catalog(&self) -> Result<WorkoutCatalog, CatalogError> {
    match &self.catalog_path {
      Some(path) => {
        tracing::info!(path = %path.display(), "Loading workout catalog");
        WorkoutCatalog::from_path(path)
      }
      None => WorkoutCatalog::default_catalog(),
    }
  }
}

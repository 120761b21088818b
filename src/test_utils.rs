//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Date helpers
//! - Helper assertions

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::catalog::WorkoutCatalog;
use crate::models::{FitnessTier, RunnerProfile};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub const MOCK_RUNNER_ID: i64 = 42;

/// Create a mock runner racing on `race_date`
pub fn mock_runner(tier: FitnessTier, race_date: NaiveDate) -> RunnerProfile {
  RunnerProfile::new(MOCK_RUNNER_ID, tier, race_date)
}

/// The embedded catalog, which must always validate
pub fn default_catalog() -> WorkoutCatalog {
  WorkoutCatalog::default_catalog().expect("Default catalog should validate")
}

/// ---------------------------------------------------------------------------
/// Date Helpers
/// ---------------------------------------------------------------------------

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("Invalid test date")
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('marathon_plans', 'scheduled_workouts')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected 2 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_runner() {
    let runner = mock_runner(FitnessTier::Advanced, ymd(2024, 7, 1));
    assert_eq!(runner.id, MOCK_RUNNER_ID);
    assert_eq!(runner.fitness_tier, FitnessTier::Advanced);
    assert_eq!(runner.days_until_race(ymd(2024, 1, 1)), 182);
  }

  #[test]
  fn test_assert_approx_eq_macro() {
    let sum: f64 = 0.1 + 0.2;
    assert_approx_eq!(sum, 0.3, 1e-9);
  }
}

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::CatalogError;

pub type PlanResult<T> = std::result::Result<T, PlanError>;

/// ---------------------------------------------------------------------------
/// Plan Generation Errors
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
  /// Race date outside the allowed window; the runner should pick another date
  #[error("Race date is {days} days away, it must be between {min} and {max} days from today")]
  InvalidDateRange { days: i64, min: i64, max: i64 },

  #[error("Not enough time for a phase 3 block: starts {phase3_start}, must end by {phase3_end}")]
  InsufficientPlanDuration {
    phase3_start: NaiveDate,
    phase3_end: NaiveDate,
  },

  #[error("Taper week ends on {taper_end} but race day is {race_day}")]
  TaperMisaligned {
    taper_end: NaiveDate,
    race_day: NaiveDate,
  },

  #[error("Catalog error: {0}")]
  Catalog(#[from] CatalogError),

  #[error("Runner {0} already has a marathon plan")]
  PlanExists(i64),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl PlanError {
  /// Errors the runner can fix by changing their input
  pub fn is_user_error(&self) -> bool {
    matches!(
      self,
      PlanError::InvalidDateRange { .. } | PlanError::PlanExists(_)
    )
  }
}

impl Serialize for PlanError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Fitness Tier
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessTier {
  Beginner,
  Intermediate,
  Advanced,
}

impl FitnessTier {
  pub const ALL: [FitnessTier; 3] = [
    FitnessTier::Beginner,
    FitnessTier::Intermediate,
    FitnessTier::Advanced,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      FitnessTier::Beginner => "beginner",
      FitnessTier::Intermediate => "intermediate",
      FitnessTier::Advanced => "advanced",
    }
  }
}

impl std::fmt::Display for FitnessTier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown fitness tier: {0}")]
pub struct UnknownFitnessTier(pub String);

impl std::str::FromStr for FitnessTier {
  type Err = UnknownFitnessTier;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "beginner" => Ok(Self::Beginner),
      "intermediate" => Ok(Self::Intermediate),
      "advanced" => Ok(Self::Advanced),
      _ => Err(UnknownFitnessTier(s.to_string())),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Runner Profile
/// ---------------------------------------------------------------------------

/// Read-only view of the runner a plan is generated for.
/// Accounts and registration live outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerProfile {
  pub id: i64,
  pub fitness_tier: FitnessTier,
  pub race_date: NaiveDate,
}

impl RunnerProfile {
  pub fn new(id: i64, fitness_tier: FitnessTier, race_date: NaiveDate) -> Self {
    Self {
      id,
      fitness_tier,
      race_date,
    }
  }

  /// Whole days from `today` until race day (negative once the race has passed)
  pub fn days_until_race(&self, today: NaiveDate) -> i64 {
    (self.race_date - today).num_days()
  }
}

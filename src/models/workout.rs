use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::RunTemplate;
use crate::progression::IntervalSet;

/// ---------------------------------------------------------------------------
/// Pace
/// ---------------------------------------------------------------------------

/// Estimated time per distance unit (seconds per km)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pace(u32);

impl Pace {
  pub const ZERO: Pace = Pace(0);

  pub fn from_secs(secs: u32) -> Self {
    Self(secs)
  }

  pub fn from_min_sec(minutes: u32, seconds: u32) -> Self {
    Self(minutes * 60 + seconds)
  }

  /// Pace for covering `distance` in `duration_min` minutes.
  /// A zero distance yields a zero pace.
  pub fn from_duration_and_distance(duration_min: u32, distance: f64) -> Self {
    if distance <= 0.0 {
      return Self::ZERO;
    }
    Self((duration_min as f64 * 60.0 / distance).round() as u32)
  }

  pub fn secs(&self) -> u32 {
    self.0
  }
}

impl From<u32> for Pace {
  fn from(secs: u32) -> Self {
    Self(secs)
  }
}

impl std::fmt::Display for Pace {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
  }
}

/// ---------------------------------------------------------------------------
/// Plan
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Plan {
  pub id: i64,
  pub runner_id: i64,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  pub created_at: DateTime<Utc>,
}

impl Plan {
  /// Days left until race day, negative once it has passed
  pub fn days_to_go(&self, today: NaiveDate) -> i64 {
    (self.end_date - today).num_days()
  }
}

/// ---------------------------------------------------------------------------
/// Scheduled Workouts
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduledWorkout {
  pub id: i64,
  pub plan_id: i64,
  pub run_type: u8,
  pub name: String,
  pub feel: String,
  pub date: NaiveDate,
  pub distance: f64,
  pub est_duration: u32,
  #[sqlx(rename = "est_avg_pace_secs", try_from = "u32")]
  pub est_avg_pace: Pace,
  #[sqlx(rename = "on_minutes")]
  pub on: u32,
  #[sqlx(rename = "off_minutes")]
  pub off: u32,
  pub sets: u32,
}

/// For inserting new workouts (without id, plan_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScheduledWorkout {
  pub run_type: u8,
  pub name: String,
  pub feel: String,
  pub date: NaiveDate,
  pub distance: f64,
  pub est_duration: u32,
  pub est_avg_pace: Pace,
  pub on: u32,
  pub off: u32,
  pub sets: u32,
}

impl NewScheduledWorkout {
  /// A workout carrying only the template's name and feel; every load field is zero.
  pub fn from_template(run_type: u8, template: &RunTemplate, date: NaiveDate) -> Self {
    Self {
      run_type,
      name: template.name.clone(),
      feel: template.feel.clone(),
      date,
      distance: 0.0,
      est_duration: 0,
      est_avg_pace: Pace::ZERO,
      on: 0,
      off: 0,
      sets: 0,
    }
  }

  /// Distance run: pace is derived as duration over distance
  pub fn with_distance(mut self, distance: f64, duration_min: u32) -> Self {
    self.distance = distance;
    self.est_duration = duration_min;
    self.est_avg_pace = Pace::from_duration_and_distance(duration_min, distance);
    self
  }

  /// Interval session: duration is (on + off) x sets, distance stays zero
  pub fn with_intervals(mut self, set: IntervalSet, pace: Pace) -> Self {
    self.distance = 0.0;
    self.on = set.on;
    self.off = set.off;
    self.sets = set.sets;
    self.est_duration = set.duration();
    self.est_avg_pace = pace;
    self
  }

  pub fn is_rest(&self) -> bool {
    self.run_type == crate::catalog::REST
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn template() -> RunTemplate {
    RunTemplate {
      name: "Base Run".to_string(),
      zone: 2,
      feel: "Steady".to_string(),
      distance: None,
      interval: None,
      race_distance: None,
      first_duration: None,
    }
  }

  fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
  }

  #[test]
  fn test_pace_display() {
    assert_eq!(Pace::from_min_sec(5, 30).to_string(), "5:30");
    assert_eq!(Pace::from_secs(245).to_string(), "4:05");
    assert_eq!(Pace::ZERO.to_string(), "0:00");
  }

  #[test]
  fn test_pace_is_time_per_distance() {
    // 50 minutes over 10 km is 5 min/km, not 0.2 km/min
    let pace = Pace::from_duration_and_distance(50, 10.0);
    assert_eq!(pace.secs(), 300);

    // 35 minutes over 22 km rounds to the nearest second
    let pace = Pace::from_duration_and_distance(35, 22.0);
    assert_eq!(pace.secs(), 95);
  }

  #[test]
  fn test_pace_zero_distance() {
    assert_eq!(Pace::from_duration_and_distance(30, 0.0), Pace::ZERO);
  }

  #[test]
  fn test_from_template_is_all_zero() {
    let workout = NewScheduledWorkout::from_template(2, &template(), day());
    assert_eq!(workout.name, "Base Run");
    assert_eq!(workout.distance, 0.0);
    assert_eq!(workout.est_duration, 0);
    assert_eq!(workout.est_avg_pace, Pace::ZERO);
    assert_eq!((workout.on, workout.off, workout.sets), (0, 0, 0));
  }

  #[test]
  fn test_with_intervals_sets_duration() {
    let set = IntervalSet {
      on: 4,
      off: 4,
      sets: 3,
    };
    let workout = NewScheduledWorkout::from_template(5, &template(), day())
      .with_intervals(set, Pace::from_min_sec(4, 30));

    assert_eq!(workout.est_duration, 24);
    assert_eq!(workout.distance, 0.0);
    assert_eq!(workout.est_avg_pace.to_string(), "4:30");
  }

  #[test]
  fn test_plan_days_to_go() {
    let plan = Plan {
      id: 1,
      runner_id: 7,
      start_date: day(),
      end_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
      created_at: Utc::now(),
    };
    assert_eq!(plan.days_to_go(day()), 182);
    assert_eq!(plan.days_to_go(NaiveDate::from_ymd_opt(2024, 7, 2).unwrap()), -1);
  }
}

//! Run scheduling
//!
//! Maps a phase's weekly template onto calendar dates and scales each
//! workout for the week it falls in.

use chrono::{Datelike, Duration, NaiveDate};

use crate::catalog::{CatalogError, WorkoutCatalog, INTERVAL, REST};
use crate::models::{FitnessTier, NewScheduledWorkout};
use crate::partition::{Phase, PhaseId};
use crate::progression::{interval_progression, linear_distance};

/// One workout per (week, weekday) of the phase, in calendar order
pub fn schedule_phase(
  catalog: &WorkoutCatalog,
  tier: FitnessTier,
  phase: &Phase,
) -> Result<Vec<NewScheduledWorkout>, CatalogError> {
  let template = catalog.week_template(tier, phase.id);
  let mut workouts = Vec::with_capacity(phase.weeks as usize * 7);

  for week in 0..phase.weeks {
    for (weekday, &run_type) in template.iter().enumerate() {
      let date = run_date(phase.start, weekday as u32, week);
      workouts.push(build_workout(
        catalog, tier, phase.id, phase.weeks, week, run_type, date,
      )?);
    }
  }

  tracing::debug!(
    phase = %phase.id,
    weeks = phase.weeks,
    workouts = workouts.len(),
    "Scheduled phase"
  );

  Ok(workouts)
}

/// First occurrence of `weekday` (0 = Monday) on/after `phase_start`,
/// shifted by `week` whole weeks
pub fn run_date(phase_start: NaiveDate, weekday: u32, week: u32) -> NaiveDate {
  let start_weekday = phase_start.weekday().num_days_from_monday() as i64;
  let offset = (weekday as i64 - start_weekday).rem_euclid(7);
  phase_start + Duration::days(week as i64 * 7 + offset)
}

fn build_workout(
  catalog: &WorkoutCatalog,
  tier: FitnessTier,
  phase: PhaseId,
  weeks: u32,
  week: u32,
  run_type: u8,
  date: NaiveDate,
) -> Result<NewScheduledWorkout, CatalogError> {
  let template = catalog.run_type(run_type)?;
  let workout = NewScheduledWorkout::from_template(run_type, template, date);

  let workout = match run_type {
    REST => workout,
    INTERVAL => {
      let set = interval_progression(catalog.interval(run_type)?, tier, phase, weeks, week);
      workout.with_intervals(set, catalog.interval_pace(tier))
    }
    _ => {
      let bounds = catalog.distance_bounds(run_type, tier, phase)?;
      let distance = linear_distance(bounds, weeks, week);
      workout.with_distance(distance, catalog.first_duration(run_type, tier)?)
    }
  };

  Ok(workout)
}

//! Taper week
//!
//! The last 7 days before the race come from a fixed template rather than
//! the phase progression. Phase 3 scheduling fills whole weeks, so it may
//! already have written past race_day - 7; those days are replaced.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, TaperSlot, WorkoutCatalog, INTERVAL, RACE_DAY, REST};
use crate::error::{PlanError, PlanResult};
use crate::models::{FitnessTier, NewScheduledWorkout};
use crate::partition::TAPER_DAYS;
use crate::progression::IntervalSet;

/// Inclusive date range the taper deletes before writing its week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacedRange {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl ReplacedRange {
  pub fn is_empty(&self) -> bool {
    self.end < self.start
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaperWeek {
  pub replaced: ReplacedRange,
  pub workouts: Vec<NewScheduledWorkout>,
}

/// Days after `phase3_end` up to the end of its week (Sunday).
/// Empty when phase 3 already ends on a Sunday.
pub fn replaced_range(phase3_end: NaiveDate) -> ReplacedRange {
  let remaining = 6 - phase3_end.weekday().num_days_from_monday() as i64;
  ReplacedRange {
    start: phase3_end + Duration::days(1),
    end: phase3_end + Duration::days(remaining),
  }
}

/// Build the 7 taper workouts for phase3_end + 1 ..= race_day.
///
/// Slots are positional: slot 0 is the template's "Monday" whatever
/// weekday the taper actually starts on.
pub fn taper_week(
  catalog: &WorkoutCatalog,
  tier: FitnessTier,
  phase3_end: NaiveDate,
  race_day: NaiveDate,
) -> PlanResult<TaperWeek> {
  let taper_start = phase3_end + Duration::days(1);
  let taper_end = taper_start + Duration::days(TAPER_DAYS - 1);
  if taper_end != race_day {
    return Err(PlanError::TaperMisaligned {
      taper_end,
      race_day,
    });
  }

  let workouts = catalog
    .taper
    .iter()
    .enumerate()
    .map(|(i, slot)| taper_workout(catalog, tier, slot, taper_start + Duration::days(i as i64)))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(TaperWeek {
    replaced: replaced_range(phase3_end),
    workouts,
  })
}

fn taper_workout(
  catalog: &WorkoutCatalog,
  tier: FitnessTier,
  slot: &TaperSlot,
  date: NaiveDate,
) -> Result<NewScheduledWorkout, CatalogError> {
  let template = catalog.run_type(slot.run_type)?;
  let workout = NewScheduledWorkout::from_template(slot.run_type, template, date);

  let workout = match slot.run_type {
    REST => workout,
    INTERVAL => {
      let set = IntervalSet {
        on: slot.on,
        off: slot.off,
        sets: slot.sets,
      };
      workout.with_intervals(set, catalog.interval_pace(tier))
    }
    RACE_DAY => workout.with_distance(
      catalog.race_distance()?,
      catalog.first_duration(RACE_DAY, tier)?,
    ),
    other => {
      let distance = slot.distance.ok_or_else(|| {
        CatalogError::Invalid(format!("taper slot for run type {} has no distance", other))
      })?;
      let duration = slot.duration.as_ref().map(|d| *d.get(tier)).ok_or_else(|| {
        CatalogError::Invalid(format!("taper slot for run type {} has no duration", other))
      })?;
      workout.with_distance(distance, duration)
    }
  };

  Ok(workout)
}

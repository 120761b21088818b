//! Date partitioning
//!
//! Splits [today, race_day] into three week-aligned training phases on a
//! 3:2:1 ratio, reserving the final 7 days for the taper week.
//!
//! - phase 1 starts on the first Monday on/after today
//! - phases 1 and 2 are stretched forward to end on a Sunday
//! - phase 3 runs from the next Monday until race_day - 7

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

pub const MIN_DAYS: i64 = 90;
pub const MAX_DAYS: i64 = 365;

/// Length of the taper week that ends on race day
pub const TAPER_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
/// Phase Identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseId {
  Phase1,
  Phase2,
  Phase3,
}

impl PhaseId {
  pub const ALL: [PhaseId; 3] = [PhaseId::Phase1, PhaseId::Phase2, PhaseId::Phase3];
}

impl std::fmt::Display for PhaseId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Phase1 => write!(f, "phase1"),
      Self::Phase2 => write!(f, "phase2"),
      Self::Phase3 => write!(f, "phase3"),
    }
  }
}

impl std::str::FromStr for PhaseId {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "phase1" => Ok(Self::Phase1),
      "phase2" => Ok(Self::Phase2),
      "phase3" => Ok(Self::Phase3),
      _ => Err(format!("Unknown phase: {}", s)),
    }
  }
}

// ---------------------------------------------------------------------------
/// Phases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
  pub id: PhaseId,
  pub start: NaiveDate,
  /// Last day of the phase. For phase 3 this is race_day - 7 and may fall
  /// before `start` when the phase has no weeks.
  pub end: NaiveDate,
  pub weeks: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasePlan {
  pub phases: [Phase; 3],
  pub race_day: NaiveDate,
}

impl PhasePlan {
  pub fn phase(&self, id: PhaseId) -> &Phase {
    match id {
      PhaseId::Phase1 => &self.phases[0],
      PhaseId::Phase2 => &self.phases[1],
      PhaseId::Phase3 => &self.phases[2],
    }
  }

  /// First scheduled day of the plan (always a Monday)
  pub fn plan_start(&self) -> NaiveDate {
    self.phases[0].start
  }

  pub fn phase3_end(&self) -> NaiveDate {
    self.phases[2].end
  }

  pub fn taper_start(&self) -> NaiveDate {
    self.phase3_end() + Duration::days(1)
  }
}

// ---------------------------------------------------------------------------
/// Partitioning
// ---------------------------------------------------------------------------

/// Check the race date window before any other work is done
pub fn validate_race_window(today: NaiveDate, race_day: NaiveDate) -> PlanResult<i64> {
  let days = (race_day - today).num_days();
  if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
    return Err(PlanError::InvalidDateRange {
      days,
      min: MIN_DAYS,
      max: MAX_DAYS,
    });
  }
  Ok(days)
}

/// Split the days before the race into three week-aligned phases
pub fn partition(today: NaiveDate, race_day: NaiveDate) -> PlanResult<PhasePlan> {
  let total_days = validate_race_window(today, race_day)?;

  let phase1_len = total_days * 3 / 6;
  let phase2_len = total_days * 2 / 6;

  let phase1_start = roll_forward_to(today, Weekday::Mon);
  let phase1_end = roll_forward_to(phase1_start + Duration::days(phase1_len - 1), Weekday::Sun);

  let phase2_start = phase1_end + Duration::days(1);
  let phase2_end = roll_forward_to(phase2_start + Duration::days(phase2_len - 1), Weekday::Sun);

  let phase3_start = phase2_end + Duration::days(1);
  let phase3_end = race_day - Duration::days(TAPER_DAYS);
  let phase3_weeks = phase3_week_count(phase3_start, phase3_end)?;

  if phase3_weeks == 0 {
    tracing::warn!(
      %phase3_start,
      %phase3_end,
      "Phase 3 has no full week before the taper, the taper absorbs the end of phase 2"
    );
  }

  let plan = PhasePlan {
    phases: [
      Phase {
        id: PhaseId::Phase1,
        start: phase1_start,
        end: phase1_end,
        weeks: week_count(phase1_start, phase1_end),
      },
      Phase {
        id: PhaseId::Phase2,
        start: phase2_start,
        end: phase2_end,
        weeks: week_count(phase2_start, phase2_end),
      },
      Phase {
        id: PhaseId::Phase3,
        start: phase3_start,
        end: phase3_end,
        weeks: phase3_weeks,
      },
    ],
    race_day,
  };

  tracing::debug!(
    total_days,
    phase1 = %format!("{}..{} ({}w)", phase1_start, phase1_end, plan.phases[0].weeks),
    phase2 = %format!("{}..{} ({}w)", phase2_start, phase2_end, plan.phases[1].weeks),
    phase3 = %format!("{}..{} ({}w)", phase3_start, phase3_end, phase3_weeks),
    "Partitioned plan"
  );

  Ok(plan)
}

/// Inclusive week count of a phase. The +1 keeps the final (possibly
/// partial) week that integer division would drop.
pub fn week_count(start: NaiveDate, end: NaiveDate) -> u32 {
  if end < start {
    return 0;
  }
  ((end - start).num_days() / 7 + 1) as u32
}

/// Phase 3 may end before it starts when the race is close to the minimum
/// window. An overshoot of up to a week lands inside phase 2's last week,
/// which the taper replaces, so phase 3 simply gets no weeks. Anything
/// larger would leave phase 2 workouts overlapping the taper.
pub fn phase3_week_count(phase3_start: NaiveDate, phase3_end: NaiveDate) -> PlanResult<u32> {
  if phase3_end >= phase3_start {
    return Ok(week_count(phase3_start, phase3_end));
  }
  if phase3_end >= phase3_start - Duration::days(TAPER_DAYS) {
    return Ok(0);
  }
  Err(PlanError::InsufficientPlanDuration {
    phase3_start,
    phase3_end,
  })
}

/// First date on/after `date` that falls on `weekday`
pub fn roll_forward_to(date: NaiveDate, weekday: Weekday) -> NaiveDate {
  let current = date.weekday().num_days_from_monday() as i64;
  let target = weekday.num_days_from_monday() as i64;
  date + Duration::days((target - current).rem_euclid(7))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_roll_forward_to() {
    // 2024-01-01 is a Monday
    assert_eq!(roll_forward_to(ymd(2024, 1, 1), Weekday::Mon), ymd(2024, 1, 1));
    assert_eq!(roll_forward_to(ymd(2024, 1, 2), Weekday::Mon), ymd(2024, 1, 8));
    assert_eq!(roll_forward_to(ymd(2024, 1, 1), Weekday::Sun), ymd(2024, 1, 7));
    assert_eq!(roll_forward_to(ymd(2024, 1, 7), Weekday::Sun), ymd(2024, 1, 7));
  }

  #[test]
  fn test_week_count_is_inclusive() {
    // Mon..Sun is one week
    assert_eq!(week_count(ymd(2024, 1, 1), ymd(2024, 1, 7)), 1);
    // Mon..Wed of the following week still counts the partial week
    assert_eq!(week_count(ymd(2024, 1, 1), ymd(2024, 1, 10)), 2);
    assert_eq!(week_count(ymd(2024, 1, 1), ymd(2024, 1, 1)), 1);
    assert_eq!(week_count(ymd(2024, 1, 8), ymd(2024, 1, 1)), 0);
  }

  #[test]
  fn test_race_window_bounds() {
    let today = ymd(2024, 1, 1);

    assert!(validate_race_window(today, today + Duration::days(90)).is_ok());
    assert!(validate_race_window(today, today + Duration::days(365)).is_ok());

    let too_soon = validate_race_window(today, today + Duration::days(89));
    assert!(matches!(
      too_soon,
      Err(PlanError::InvalidDateRange { days: 89, .. })
    ));

    let too_late = validate_race_window(today, today + Duration::days(366));
    assert!(matches!(
      too_late,
      Err(PlanError::InvalidDateRange { days: 366, .. })
    ));

    let past = validate_race_window(today, today - Duration::days(10));
    assert!(past.is_err());
  }

  #[test]
  fn test_partition_concrete_scenario() {
    // 182 days from a Monday: 91 / 60 day split
    let plan = partition(ymd(2024, 1, 1), ymd(2024, 7, 1)).unwrap();

    let p1 = plan.phase(PhaseId::Phase1);
    assert_eq!(p1.start, ymd(2024, 1, 1));
    assert_eq!(p1.end, ymd(2024, 3, 31));
    assert_eq!(p1.weeks, 13);

    let p2 = plan.phase(PhaseId::Phase2);
    assert_eq!(p2.start, ymd(2024, 4, 1));
    assert_eq!(p2.end, ymd(2024, 6, 2));
    assert_eq!(p2.weeks, 9);

    let p3 = plan.phase(PhaseId::Phase3);
    assert_eq!(p3.start, ymd(2024, 6, 3));
    assert_eq!(p3.end, ymd(2024, 6, 24));
    assert_eq!(p3.weeks, 4);

    assert_eq!(plan.taper_start(), ymd(2024, 6, 25));
  }

  #[test]
  fn test_partition_starts_next_monday() {
    // Wednesday start
    let plan = partition(ymd(2024, 1, 3), ymd(2024, 8, 1)).unwrap();
    assert_eq!(plan.plan_start(), ymd(2024, 1, 8));
  }

  #[test]
  fn test_partition_alignment_for_every_valid_window() {
    for offset in 0..7 {
      let today = ymd(2024, 1, 1) + Duration::days(offset);
      for days in MIN_DAYS..=MAX_DAYS {
        let race_day = today + Duration::days(days);
        let plan = partition(today, race_day).unwrap();
        let [p1, p2, p3] = plan.phases;

        assert_eq!(p1.start.weekday(), Weekday::Mon, "{} +{}", today, days);
        assert_eq!(p1.end.weekday(), Weekday::Sun, "{} +{}", today, days);
        assert_eq!(p2.start.weekday(), Weekday::Mon, "{} +{}", today, days);
        assert_eq!(p2.end.weekday(), Weekday::Sun, "{} +{}", today, days);
        assert_eq!(p3.start.weekday(), Weekday::Mon, "{} +{}", today, days);
        assert_eq!(p3.end + Duration::days(TAPER_DAYS), race_day);

        assert!(p1.start >= today);
        assert!(p1.end < p2.start && p2.end < p3.start);
        assert!(p1.weeks >= 1 && p2.weeks >= 1);
      }
    }
  }

  #[test]
  fn test_partition_near_minimum_gives_empty_phase3() {
    // 90 days from a Monday: phase 2 runs past race_day - 7 by one day
    let today = ymd(2024, 1, 1);
    let plan = partition(today, today + Duration::days(90)).unwrap();
    let p3 = plan.phase(PhaseId::Phase3);

    assert_eq!(p3.weeks, 0);
    assert_eq!(p3.end + Duration::days(1), p3.start);
  }

  #[test]
  fn test_phase3_week_count_guard() {
    let start = ymd(2024, 6, 3);

    assert_eq!(phase3_week_count(start, ymd(2024, 6, 24)).unwrap(), 4);
    assert_eq!(phase3_week_count(start, ymd(2024, 6, 2)).unwrap(), 0);
    assert_eq!(phase3_week_count(start, ymd(2024, 5, 27)).unwrap(), 0);

    let err = phase3_week_count(start, ymd(2024, 5, 26)).unwrap_err();
    assert!(matches!(err, PlanError::InsufficientPlanDuration { .. }));
  }

  #[test]
  fn test_phase_id_parse_and_display() {
    for id in PhaseId::ALL {
      assert_eq!(id.to_string().parse::<PhaseId>(), Ok(id));
    }
    assert!("phase4".parse::<PhaseId>().is_err());
  }
}

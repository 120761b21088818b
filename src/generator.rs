//! Plan generation
//!
//! `build_schedule` is the pure part: partition the calendar, schedule each
//! phase, and build the taper week. `generate_plan` persists the result in
//! a single transaction so a failed insert never leaves a partial plan.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::catalog::WorkoutCatalog;
use crate::error::{PlanError, PlanResult};
use crate::models::{NewScheduledWorkout, Plan, RunnerProfile};
use crate::partition::{partition, PhasePlan};
use crate::scheduler::schedule_phase;
use crate::store;
use crate::taper::{taper_week, TaperWeek};

/// ---------------------------------------------------------------------------
/// Schedule
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
  pub phases: PhasePlan,
  /// Phase 1, 2, then 3 workouts before the taper overwrite
  pub phase_workouts: Vec<NewScheduledWorkout>,
  pub taper: TaperWeek,
}

impl Schedule {
  /// Final day-by-day plan: phase workouts outside the replaced range plus
  /// the taper week, ordered by date
  pub fn workouts(&self) -> Vec<NewScheduledWorkout> {
    let mut workouts: Vec<NewScheduledWorkout> = self
      .phase_workouts
      .iter()
      .filter(|w| !self.taper.replaced.contains(w.date))
      .cloned()
      .collect();
    workouts.extend(self.taper.workouts.iter().cloned());
    workouts.sort_by_key(|w| w.date);
    workouts
  }

  pub fn start_date(&self) -> NaiveDate {
    self.phases.plan_start()
  }

  pub fn race_day(&self) -> NaiveDate {
    self.phases.race_day
  }
}

/// Build the full schedule for `runner` without touching storage
pub fn build_schedule(
  runner: &RunnerProfile,
  today: NaiveDate,
  catalog: &WorkoutCatalog,
) -> PlanResult<Schedule> {
  let phases = partition(today, runner.race_date)?;

  let mut phase_workouts = Vec::new();
  for phase in &phases.phases {
    phase_workouts.extend(schedule_phase(catalog, runner.fitness_tier, phase)?);
  }

  let taper = taper_week(
    catalog,
    runner.fitness_tier,
    phases.phase3_end(),
    phases.race_day,
  )?;

  tracing::debug!(
    runner_id = runner.id,
    replaced_from = %taper.replaced.start,
    replaced_to = %taper.replaced.end,
    "Taper week replaces end of phase 3"
  );

  Ok(Schedule {
    phases,
    phase_workouts,
    taper,
  })
}

/// ---------------------------------------------------------------------------
/// Persistence
/// ---------------------------------------------------------------------------

/// Generate and store a plan for a runner that has none
pub async fn generate_plan(
  pool: &SqlitePool,
  runner: &RunnerProfile,
  today: NaiveDate,
  catalog: &WorkoutCatalog,
) -> PlanResult<Plan> {
  let schedule = build_schedule(runner, today, catalog)?;

  let mut tx = pool.begin().await?;

  if store::load_plan_for_runner(&mut *tx, runner.id).await?.is_some() {
    return Err(PlanError::PlanExists(runner.id));
  }

  let (plan, count) = persist_schedule(&mut tx, runner, today, &schedule).await?;
  tx.commit().await?;

  tracing::info!(
    runner_id = runner.id,
    plan_id = plan.id,
    tier = %runner.fitness_tier,
    start = %plan.start_date,
    race_day = %plan.end_date,
    workouts = count,
    "Created marathon plan"
  );

  Ok(plan)
}

/// Replace the runner's plan (if any) with a freshly generated one
pub async fn regenerate_plan(
  pool: &SqlitePool,
  runner: &RunnerProfile,
  today: NaiveDate,
  catalog: &WorkoutCatalog,
) -> PlanResult<Plan> {
  let schedule = build_schedule(runner, today, catalog)?;

  let mut tx = pool.begin().await?;
  let replaced = store::delete_plan_for_runner(&mut tx, runner.id).await?;
  let (plan, count) = persist_schedule(&mut tx, runner, today, &schedule).await?;
  tx.commit().await?;

  tracing::info!(
    runner_id = runner.id,
    plan_id = plan.id,
    tier = %runner.fitness_tier,
    start = %plan.start_date,
    race_day = %plan.end_date,
    workouts = count,
    replaced,
    "Regenerated marathon plan"
  );

  Ok(plan)
}

/// Plan row, phase workouts, taper delete, taper insert, in that order
async fn persist_schedule(
  conn: &mut SqliteConnection,
  runner: &RunnerProfile,
  today: NaiveDate,
  schedule: &Schedule,
) -> PlanResult<(Plan, u64)> {
  let plan = store::create_plan(conn, runner.id, today, schedule.race_day())
    .await
    .map_err(|e| match e.as_database_error() {
      Some(db) if db.is_unique_violation() => PlanError::PlanExists(runner.id),
      _ => PlanError::Database(e),
    })?;

  let mut count = store::bulk_create(conn, plan.id, &schedule.phase_workouts).await?;

  let replaced = schedule.taper.replaced;
  if !replaced.is_empty() {
    count -= store::delete_between(conn, plan.id, replaced.start, replaced.end).await?;
  }

  count += store::bulk_create(conn, plan.id, &schedule.taper.workouts).await?;

  Ok((plan, count))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

//! Plan storage
//!
//! Free async functions over SQLite. Writes take a `&mut SqliteConnection`
//! so they can run inside a caller's transaction (`&mut *tx`); single
//! statement reads accept any executor, pool or connection.

use chrono::NaiveDate;
use sqlx::{Executor, Sqlite, SqliteConnection};

use crate::models::{NewScheduledWorkout, Plan, ScheduledWorkout};

const PLAN_COLUMNS: &str = "id, runner_id, start_date, end_date, created_at";

const WORKOUT_COLUMNS: &str = "id, plan_id, run_type, name, feel, date, distance, est_duration, \
   est_avg_pace_secs, on_minutes, off_minutes, sets";

/// ---------------------------------------------------------------------------
/// Plans
/// ---------------------------------------------------------------------------

pub async fn create_plan(
  conn: &mut SqliteConnection,
  runner_id: i64,
  start_date: NaiveDate,
  end_date: NaiveDate,
) -> Result<Plan, sqlx::Error> {
  let query = format!(
    "INSERT INTO marathon_plans (runner_id, start_date, end_date) \
     VALUES (?1, ?2, ?3) \
     RETURNING {PLAN_COLUMNS}"
  );
  sqlx::query_as::<_, Plan>(&query)
    .bind(runner_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(&mut *conn)
    .await
}

pub async fn load_plan_for_runner<'e, E>(
  executor: E,
  runner_id: i64,
) -> Result<Option<Plan>, sqlx::Error>
where
  E: Executor<'e, Database = Sqlite>,
{
  let query = format!("SELECT {PLAN_COLUMNS} FROM marathon_plans WHERE runner_id = ?1");
  sqlx::query_as::<_, Plan>(&query)
    .bind(runner_id)
    .fetch_optional(executor)
    .await
}

/// Remove a runner's plan and every workout scheduled under it.
/// Returns false when the runner had no plan.
pub async fn delete_plan_for_runner(
  conn: &mut SqliteConnection,
  runner_id: i64,
) -> Result<bool, sqlx::Error> {
  let Some(plan) = load_plan_for_runner(&mut *conn, runner_id).await? else {
    return Ok(false);
  };

  sqlx::query("DELETE FROM scheduled_workouts WHERE plan_id = ?1")
    .bind(plan.id)
    .execute(&mut *conn)
    .await?;

  sqlx::query("DELETE FROM marathon_plans WHERE id = ?1")
    .bind(plan.id)
    .execute(&mut *conn)
    .await?;

  Ok(true)
}

/// ---------------------------------------------------------------------------
/// Scheduled Workouts
/// ---------------------------------------------------------------------------

/// Insert workouts in order, returning the number of rows written
pub async fn bulk_create(
  conn: &mut SqliteConnection,
  plan_id: i64,
  workouts: &[NewScheduledWorkout],
) -> Result<u64, sqlx::Error> {
  let mut inserted = 0;

  for workout in workouts {
    let result = sqlx::query(
      r#"
      INSERT INTO scheduled_workouts (
        plan_id, run_type, name, feel, date, distance, est_duration,
        est_avg_pace_secs, on_minutes, off_minutes, sets
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
      "#,
    )
    .bind(plan_id)
    .bind(workout.run_type)
    .bind(&workout.name)
    .bind(&workout.feel)
    .bind(workout.date)
    .bind(workout.distance)
    .bind(workout.est_duration)
    .bind(workout.est_avg_pace.secs())
    .bind(workout.on)
    .bind(workout.off)
    .bind(workout.sets)
    .execute(&mut *conn)
    .await?;

    inserted += result.rows_affected();
  }

  Ok(inserted)
}

/// Delete a plan's workouts dated `from..=to`. An empty range deletes nothing.
pub async fn delete_between(
  conn: &mut SqliteConnection,
  plan_id: i64,
  from: NaiveDate,
  to: NaiveDate,
) -> Result<u64, sqlx::Error> {
  let result = sqlx::query(
    "DELETE FROM scheduled_workouts WHERE plan_id = ?1 AND date >= ?2 AND date <= ?3",
  )
  .bind(plan_id)
  .bind(from)
  .bind(to)
  .execute(&mut *conn)
  .await?;

  Ok(result.rows_affected())
}

/// Which dates a workout query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
  All,
  On(NaiveDate),
  After(NaiveDate),
  OnOrAfter(NaiveDate),
  /// Inclusive on both ends
  Between(NaiveDate, NaiveDate),
}

impl DateFilter {
  fn clause(&self) -> &'static str {
    match self {
      DateFilter::All => "",
      DateFilter::On(_) => " AND date = ?2",
      DateFilter::After(_) => " AND date > ?2",
      DateFilter::OnOrAfter(_) => " AND date >= ?2",
      DateFilter::Between(_, _) => " AND date >= ?2 AND date <= ?3",
    }
  }
}

/// A plan's workouts matching `filter`, ordered by date
pub async fn query_workouts<'e, E>(
  executor: E,
  plan_id: i64,
  filter: DateFilter,
) -> Result<Vec<ScheduledWorkout>, sqlx::Error>
where
  E: Executor<'e, Database = Sqlite>,
{
  let query = format!(
    "SELECT {WORKOUT_COLUMNS} FROM scheduled_workouts WHERE plan_id = ?1{} ORDER BY date, id",
    filter.clause()
  );

  let q = sqlx::query_as::<_, ScheduledWorkout>(&query).bind(plan_id);
  let q = match filter {
    DateFilter::All => q,
    DateFilter::On(date) | DateFilter::After(date) | DateFilter::OnOrAfter(date) => q.bind(date),
    DateFilter::Between(from, to) => q.bind(from).bind(to),
  };

  q.fetch_all(executor).await
}

/// The workout scheduled for `today`, if the plan covers it
pub async fn todays_workout<'e, E>(
  executor: E,
  plan: &Plan,
  today: NaiveDate,
) -> Result<Option<ScheduledWorkout>, sqlx::Error>
where
  E: Executor<'e, Database = Sqlite>,
{
  let query = format!(
    "SELECT {WORKOUT_COLUMNS} FROM scheduled_workouts WHERE plan_id = ?1 AND date = ?2 \
     ORDER BY id LIMIT 1"
  );
  sqlx::query_as::<_, ScheduledWorkout>(&query)
    .bind(plan.id)
    .bind(today)
    .fetch_optional(executor)
    .await
}

/// The next `limit` workouts strictly after `today`
pub async fn upcoming_workouts<'e, E>(
  executor: E,
  plan: &Plan,
  today: NaiveDate,
  limit: u32,
) -> Result<Vec<ScheduledWorkout>, sqlx::Error>
where
  E: Executor<'e, Database = Sqlite>,
{
  let query = format!(
    "SELECT {WORKOUT_COLUMNS} FROM scheduled_workouts WHERE plan_id = ?1 AND date > ?2 \
     ORDER BY date, id LIMIT ?3"
  );
  sqlx::query_as::<_, ScheduledWorkout>(&query)
    .bind(plan.id)
    .bind(today)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

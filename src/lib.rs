//! Marathon training plan generator
//!
//! Given a runner's fitness tier and race date, builds a day-by-day plan from
//! the first Monday on/after today through race day: three progressive
//! training phases followed by a fixed taper week.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod generator;
pub mod models;
pub mod partition;
pub mod progression;
pub mod scheduler;
pub mod store;
pub mod taper;

#[cfg(test)]
mod test_utils;

pub use catalog::{CatalogError, WorkoutCatalog};
pub use config::{ConfigError, PlannerConfig};
pub use db::{initialize_db, AppState, DbPool};
pub use error::{PlanError, PlanResult};
pub use generator::{build_schedule, generate_plan, regenerate_plan, Schedule};
pub use models::{FitnessTier, NewScheduledWorkout, Pace, Plan, RunnerProfile, ScheduledWorkout};
pub use store::DateFilter;

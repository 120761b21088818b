pub mod runner;
pub mod workout;

pub use runner::{FitnessTier, RunnerProfile};
pub use workout::{NewScheduledWorkout, Pace, Plan, ScheduledWorkout};

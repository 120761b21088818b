//! Workout catalog
//!
//! Static configuration the scheduler reads from:
//! - weekly templates: tier x phase x weekday -> run type
//! - run types: name, feel, distance/duration/interval ranges per tier and phase
//! - the fixed 7-slot taper week ending on race day
//!
//! The catalog is loaded once (embedded default or a JSON file), validated,
//! and passed explicitly into plan generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{FitnessTier, Pace};
use crate::partition::PhaseId;

/// Run type reserved for rest days
pub const REST: u8 = 0;
/// Run type reserved for interval sessions (on/off/sets instead of distance)
pub const INTERVAL: u8 = 5;
/// Run type reserved for the race itself
pub const RACE_DAY: u8 = 9;

const DEFAULT_CATALOG_JSON: &str = include_str!("../catalog/default.json");

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("Failed to read catalog {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse catalog: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("Unknown run type: {0}")]
  UnknownRunType(u8),

  #[error("Invalid catalog: {0}")]
  Invalid(String),
}

impl Serialize for CatalogError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Keyed Tables
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
  pub low: T,
  pub high: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable<T> {
  pub beginner: T,
  pub intermediate: T,
  pub advanced: T,
}

impl<T> TierTable<T> {
  pub fn get(&self, tier: FitnessTier) -> &T {
    match tier {
      FitnessTier::Beginner => &self.beginner,
      FitnessTier::Intermediate => &self.intermediate,
      FitnessTier::Advanced => &self.advanced,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (FitnessTier, &T)> {
    FitnessTier::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTable<T> {
  pub phase1: T,
  pub phase2: T,
  pub phase3: T,
}

impl<T> PhaseTable<T> {
  pub fn get(&self, phase: PhaseId) -> &T {
    match phase {
      PhaseId::Phase1 => &self.phase1,
      PhaseId::Phase2 => &self.phase2,
      PhaseId::Phase3 => &self.phase3,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (PhaseId, &T)> {
    PhaseId::ALL.into_iter().map(move |phase| (phase, self.get(phase)))
  }
}

/// ---------------------------------------------------------------------------
/// Catalog Entries
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalTemplate {
  /// Work time per set in minutes
  pub on: u32,
  /// Recovery time per set in minutes
  pub off: u32,
  pub sets: TierTable<PhaseTable<Bounds<u32>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTemplate {
  pub name: String,
  /// Heart-rate zone, 0 for rest
  pub zone: u8,
  pub feel: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub distance: Option<TierTable<PhaseTable<Bounds<f64>>>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub interval: Option<IntervalTemplate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub race_distance: Option<f64>,
  /// Duration in minutes used for every week of a phase
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub first_duration: Option<TierTable<u32>>,
}

/// One positional slot of the taper week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaperSlot {
  pub run_type: u8,
  #[serde(default)]
  pub on: u32,
  #[serde(default)]
  pub off: u32,
  #[serde(default)]
  pub sets: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub distance: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub duration: Option<TierTable<u32>>,
}

/// ---------------------------------------------------------------------------
/// Workout Catalog
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutCatalog {
  /// Run type per weekday, Monday first
  pub week_templates: TierTable<PhaseTable<[u8; 7]>>,
  pub run_types: BTreeMap<u8, RunTemplate>,
  /// Display pace for interval sessions, seconds per km
  pub interval_paces: TierTable<u32>,
  pub taper: [TaperSlot; 7],
}

impl WorkoutCatalog {
  /// The catalog shipped with the crate
  pub fn default_catalog() -> Result<Self, CatalogError> {
    Self::from_json(DEFAULT_CATALOG_JSON)
  }

  /// Parse and validate a catalog from JSON
  pub fn from_json(json: &str) -> Result<Self, CatalogError> {
    let catalog: WorkoutCatalog = serde_json::from_str(json)?;
    catalog.validate()?;
    Ok(catalog)
  }

  pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
    let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&json)
  }

  pub fn to_json(&self) -> Result<String, CatalogError> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn week_template(&self, tier: FitnessTier, phase: PhaseId) -> &[u8; 7] {
    self.week_templates.get(tier).get(phase)
  }

  pub fn run_type(&self, id: u8) -> Result<&RunTemplate, CatalogError> {
    self.run_types.get(&id).ok_or(CatalogError::UnknownRunType(id))
  }

  pub fn interval_pace(&self, tier: FitnessTier) -> Pace {
    Pace::from_secs(*self.interval_paces.get(tier))
  }

  pub fn distance_bounds(
    &self,
    id: u8,
    tier: FitnessTier,
    phase: PhaseId,
  ) -> Result<Bounds<f64>, CatalogError> {
    self
      .run_type(id)?
      .distance
      .as_ref()
      .map(|table| *table.get(tier).get(phase))
      .ok_or_else(|| CatalogError::Invalid(format!("run type {} has no distance bounds", id)))
  }

  pub fn first_duration(&self, id: u8, tier: FitnessTier) -> Result<u32, CatalogError> {
    self
      .run_type(id)?
      .first_duration
      .as_ref()
      .map(|table| *table.get(tier))
      .ok_or_else(|| CatalogError::Invalid(format!("run type {} has no duration", id)))
  }

  pub fn interval(&self, id: u8) -> Result<&IntervalTemplate, CatalogError> {
    self
      .run_type(id)?
      .interval
      .as_ref()
      .ok_or_else(|| CatalogError::Invalid(format!("run type {} has no interval block", id)))
  }

  pub fn race_distance(&self) -> Result<f64, CatalogError> {
    self
      .run_type(RACE_DAY)?
      .race_distance
      .ok_or_else(|| CatalogError::Invalid("race day has no distance".to_string()))
  }

  /// Check every lookup plan generation can make against this catalog.
  /// A catalog that passes never produces a lookup miss during scheduling.
  pub fn validate(&self) -> Result<(), CatalogError> {
    self.run_type(REST)?;
    self.check_race_day()?;

    for (tier, phases) in self.week_templates.iter() {
      for (phase, days) in phases.iter() {
        for &id in days {
          self.check_scheduled_run_type(id, tier, phase).map_err(|e| {
            let detail = match e {
              CatalogError::Invalid(msg) => msg,
              other => other.to_string(),
            };
            CatalogError::Invalid(format!("{} {} template: {}", tier, phase, detail))
          })?;
        }
      }
    }

    self.check_taper()
  }

  fn check_race_day(&self) -> Result<(), CatalogError> {
    let distance = self.race_distance()?;
    if distance <= 0.0 {
      return Err(CatalogError::Invalid(format!(
        "race distance must be positive, got {}",
        distance
      )));
    }
    for tier in FitnessTier::ALL {
      self.first_duration(RACE_DAY, tier)?;
    }
    Ok(())
  }

  fn check_scheduled_run_type(
    &self,
    id: u8,
    tier: FitnessTier,
    phase: PhaseId,
  ) -> Result<(), CatalogError> {
    match id {
      REST => self.run_type(id).map(|_| ()),
      INTERVAL => {
        let sets = *self.interval(id)?.sets.get(tier).get(phase);
        if sets.low > sets.high {
          return Err(CatalogError::Invalid(format!(
            "interval sets low {} above high {}",
            sets.low, sets.high
          )));
        }
        Ok(())
      }
      _ => {
        let bounds = self.distance_bounds(id, tier, phase)?;
        if bounds.low <= 0.0 || bounds.low > bounds.high {
          return Err(CatalogError::Invalid(format!(
            "run type {} distance bounds {}..{} are not a positive ascending range",
            id, bounds.low, bounds.high
          )));
        }
        self.first_duration(id, tier).map(|_| ())
      }
    }
  }

  fn check_taper(&self) -> Result<(), CatalogError> {
    if self.taper[6].run_type != RACE_DAY {
      return Err(CatalogError::Invalid(format!(
        "taper week must end with run type {}, found {}",
        RACE_DAY, self.taper[6].run_type
      )));
    }

    for (position, slot) in self.taper.iter().enumerate() {
      self.run_type(slot.run_type)?;
      match slot.run_type {
        REST | RACE_DAY => {}
        INTERVAL => {
          if slot.sets == 0 {
            return Err(CatalogError::Invalid(format!(
              "taper slot {} is an interval with no sets",
              position
            )));
          }
        }
        _ => {
          let has_distance = slot.distance.is_some_and(|d| d > 0.0);
          if !has_distance || slot.duration.is_none() {
            return Err(CatalogError::Invalid(format!(
              "taper slot {} needs a positive distance and a duration",
              position
            )));
          }
        }
      }
    }

    Ok(())
  }
}

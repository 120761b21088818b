//! Week-over-week progression formulas
//!
//! Workout load inside a phase moves from the catalog's `low` bound toward
//! its `high` bound:
//! - distance runs interpolate linearly, reaching `high` in the final week
//! - interval on/off/sets step by a rounded fraction of the phase
//!
//! Rounding is half away from zero (`f64::round`), so identical inputs always
//! produce identical plans.

use serde::{Deserialize, Serialize};

use crate::catalog::{Bounds, IntervalTemplate};
use crate::models::FitnessTier;
use crate::partition::PhaseId;

// ---------------------------------------------------------------------------
/// Distance Progression
// ---------------------------------------------------------------------------

/// Linear distance for `week` (0-based) of a phase with `weeks` weeks.
///
/// Week 0 is `low`, the last week is `high`. A single-week phase has no
/// slope to follow and always gets `low`.
pub fn linear_distance(bounds: Bounds<f64>, weeks: u32, week: u32) -> f64 {
    if weeks <= 1 {
        return bounds.low;
    }
    let step = (bounds.high - bounds.low) / (weeks - 1) as f64;
    bounds.low + step * week as f64
}

// ---------------------------------------------------------------------------
/// Interval Progression
// ---------------------------------------------------------------------------

/// low + round((high - low) * week / total_weeks)
///
/// `weekly_value(low, high, w, 0) == low` and `weekly_value(low, high, w, w) == high`.
/// Inside a phase `week` stops at `total_weeks - 1`, so the top value is
/// approached but only reached when the rounding carries it there.
pub fn weekly_value(low: u32, high: u32, total_weeks: u32, week: u32) -> u32 {
    if total_weeks == 0 {
        return low;
    }
    let change = (high as f64 - low as f64) * week as f64 / total_weeks as f64;
    (low as f64 + change.round()).max(0.0) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSet {
    pub on: u32,
    pub off: u32,
    pub sets: u32,
}

impl IntervalSet {
    /// Total minutes: every set is one on block plus one off block
    pub fn duration(&self) -> u32 {
        (self.on + self.off) * self.sets
    }
}

/// On/off/sets for `week` of a phase. On and off use the template's base
/// value as both bounds; sets progress across the tier/phase range.
pub fn interval_progression(
    template: &IntervalTemplate,
    tier: FitnessTier,
    phase: PhaseId,
    weeks: u32,
    week: u32,
) -> IntervalSet {
    let sets = template.sets.get(tier).get(phase);

    IntervalSet {
        on: weekly_value(template.on, template.on, weeks, week),
        off: weekly_value(template.off, template.off, weeks, week),
        sets: weekly_value(sets.low, sets.high, weeks, week),
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

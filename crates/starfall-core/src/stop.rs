//! Termination predicates for motion units.
//!
//! A [`StopCondition`] decides when a motion unit is finished. Conditions are
//! a closed set of variants combined with `Any`/`All`. Evaluation may capture
//! a lazy baseline (start angle, start position) on its first call but never
//! mutates the kinematic state it observes.

use crate::kinematics::KinematicState;
use starfall_common::Vec2;

/// Distance at which target-mode movement counts as arrived.
pub const COMPLETION_THRESHOLD: f32 = 1.0;

/// Predicate deciding when a motion unit terminates.
#[derive(Debug, Clone)]
pub enum StopCondition {
    /// Stops once the unit has been active for `duration` seconds.
    Elapsed {
        /// Time budget in seconds.
        duration: f32,
    },
    /// Stops when the position is within `threshold` of the target.
    NearTarget {
        /// Arrival distance.
        threshold: f32,
    },
    /// Stops when scalar speed drops below `threshold`.
    SpeedBelow {
        /// Minimum speed.
        threshold: f32,
    },
    /// Stops when the orbit radius leaves the `[min, max]` band.
    RadiusOutside {
        /// Lower radius bound.
        min: f32,
        /// Upper radius bound.
        max: f32,
    },
    /// Stops once the orbital phase has swept `total` radians.
    ///
    /// The starting phase is captured on the first evaluation, not at
    /// construction, so the condition measures the sweep actually performed.
    SweptAngle {
        /// Sweep budget in radians.
        total: f32,
        /// Phase captured on first evaluation.
        start: Option<f32>,
    },
    /// Stops once the position is `distance` away from where evaluation began.
    TraveledDistance {
        /// Straight-line distance from the captured start.
        distance: f32,
        /// Position captured on first evaluation.
        start: Option<Vec2>,
    },
    /// Stops when a target-mode unit is essentially at its target.
    Completed,
    /// Stops when any child condition stops. Short-circuits.
    Any(Vec<StopCondition>),
    /// Stops when every child condition stops. Empty never stops.
    All(Vec<StopCondition>),
    /// Never stops.
    Never,
}

impl StopCondition {
    /// Convenience constructor for a swept-angle condition.
    #[must_use]
    pub fn swept_angle(total: f32) -> Self {
        Self::SweptAngle { total, start: None }
    }

    /// Convenience constructor for a traveled-distance condition.
    #[must_use]
    pub fn traveled_distance(distance: f32) -> Self {
        Self::TraveledDistance {
            distance,
            start: None,
        }
    }

    /// Evaluates the condition against the current kinematic state.
    ///
    /// Lazy baselines are captured on the first call. The state itself is
    /// never modified.
    pub fn should_stop(&mut self, state: &KinematicState) -> bool {
        match self {
            Self::Elapsed { duration } => state.elapsed_time >= *duration,
            Self::NearTarget { threshold } => {
                state.position.distance(state.target_position) <= *threshold
            }
            Self::SpeedBelow { threshold } => state.speed.abs() < *threshold,
            Self::RadiusOutside { min, max } => state.radius < *min || state.radius > *max,
            Self::SweptAngle { total, start } => {
                let baseline = *start.get_or_insert(state.angle);
                (state.angle - baseline).abs() >= *total
            }
            Self::TraveledDistance { distance, start } => {
                let baseline = *start.get_or_insert(state.position);
                state.position.distance(baseline) >= *distance
            }
            Self::Completed => {
                state.position.distance(state.target_position) <= COMPLETION_THRESHOLD
            }
            Self::Any(children) => children.iter_mut().any(|c| c.should_stop(state)),
            Self::All(children) => {
                !children.is_empty() && children.iter_mut().all(|c| c.should_stop(state))
            }
            Self::Never => false,
        }
    }
}

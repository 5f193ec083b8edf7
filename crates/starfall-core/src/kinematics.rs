//! Kinematic state shared by every trajectory evaluator.
//!
//! A [`KinematicState`] is a plain record of everything a trajectory needs to
//! integrate an object forward: position, velocity, heading, acceleration,
//! orbital parameters, and the mode flags that select how an evaluator
//! interprets them. Each motion unit owns exactly one state; builders fill it
//! in by value and move it into the unit.

use serde::{Deserialize, Serialize};
use starfall_common::Vec2;
use std::fmt;
use std::sync::Arc;

/// Sentinel meaning "speed not set, inherit from the driven object".
pub const SPEED_UNSET: f32 = -1.0;

/// Cloneable callable that produces a world position on demand.
///
/// Used for aiming at the player and for control points that chase a moving
/// object. Resolution timing is owned by the caller: dynamic-target movers
/// re-resolve every frame, burst generators resolve once per burst, and
/// Bézier control points resolve once at initialization.
#[derive(Clone)]
pub struct TargetProvider {
    getter: Arc<dyn Fn() -> Vec2 + Send + Sync>,
}

impl TargetProvider {
    /// Wraps a position getter.
    pub fn new(getter: impl Fn() -> Vec2 + Send + Sync + 'static) -> Self {
        Self {
            getter: Arc::new(getter),
        }
    }

    /// Provider that always returns the same point.
    #[must_use]
    pub fn fixed(point: Vec2) -> Self {
        Self::new(move || point)
    }

    /// Returns a provider that adds a constant offset to this one.
    #[must_use]
    pub fn with_offset(&self, offset: Vec2) -> Self {
        let inner = Arc::clone(&self.getter);
        Self::new(move || inner() + offset)
    }

    /// Resolves the current target position.
    #[must_use]
    pub fn resolve(&self) -> Vec2 {
        (self.getter)()
    }
}

impl fmt::Debug for TargetProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetProvider").finish_non_exhaustive()
    }
}

/// Mutable kinematic record driven by a trajectory evaluator.
///
/// Headings and sprite rotations are in degrees; orbital phase angles
/// (`angle`, `angle_rate`, `ellipse_rotation`) are in radians.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicState {
    /// Current world position.
    pub position: Vec2,
    /// Current velocity vector.
    pub velocity: Vec2,

    /// Destination for target-mode movement.
    pub target_position: Vec2,
    /// Dynamic target source, re-resolved when [`Self::uses_dynamic_target`].
    #[serde(skip)]
    pub target_provider: Option<TargetProvider>,
    /// Re-resolve the provider every frame instead of once at init.
    pub uses_dynamic_target: bool,
    /// Move toward `target_position` rather than along `heading`.
    pub uses_target_mode: bool,

    /// Scalar speed in units per second. Negative means unset (inherit).
    pub speed: f32,
    /// Heading in degrees.
    pub heading: f32,
    /// Acceleration magnitude applied along the current heading.
    pub scalar_acceleration: f32,
    /// Acceleration vector applied as-is.
    pub vector_acceleration: Vec2,
    /// Seconds of acceleration remaining. Negative means unlimited.
    pub acceleration_remaining: f32,

    /// Angular velocity of the heading, degrees per second.
    pub angular_velocity: f32,
    /// Angular acceleration of the heading, degrees per second squared.
    pub angular_acceleration: f32,

    /// Orbit center.
    pub center: Vec2,
    /// Orbit radius.
    pub radius: f32,
    /// Radius growth rate, units per second.
    pub radius_rate: f32,
    /// Orbital phase in radians.
    pub angle: f32,
    /// Orbital phase rate, radians per second.
    pub angle_rate: f32,

    /// Ratio of the ellipse X semi-axis to its Y semi-axis.
    pub axis_ratio: f32,
    /// Rotation of the ellipse frame, radians.
    pub ellipse_rotation: f32,

    /// Enter the orbit tangentially from the current velocity.
    pub uses_tangent_entry: bool,
    /// Linear speed along the tangent at entry.
    pub tangent_speed: f32,
    /// Tangent heading in degrees at entry.
    pub tangent_heading: f32,
    /// Orbit direction for tangent entry.
    pub is_clockwise: bool,

    /// Center was set explicitly by the builder.
    pub uses_explicit_center: bool,
    /// Derive radius and phase from the current position at init.
    pub auto_derives_radius: bool,

    /// Seconds this unit has been active.
    pub elapsed_time: f32,
    /// Set exactly once, on the first apply.
    pub is_initialized: bool,
}

impl KinematicState {
    /// Creates a state with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            target_position: Vec2::ZERO,
            target_provider: None,
            uses_dynamic_target: false,
            uses_target_mode: false,
            speed: SPEED_UNSET,
            heading: 0.0,
            scalar_acceleration: 0.0,
            vector_acceleration: Vec2::ZERO,
            acceleration_remaining: -1.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            center: Vec2::ZERO,
            radius: 0.0,
            radius_rate: 0.0,
            angle: 0.0,
            angle_rate: 0.0,
            axis_ratio: 1.0,
            ellipse_rotation: 0.0,
            uses_tangent_entry: false,
            tangent_speed: 0.0,
            tangent_heading: 0.0,
            is_clockwise: false,
            uses_explicit_center: false,
            auto_derives_radius: false,
            elapsed_time: 0.0,
            is_initialized: false,
        }
    }

    /// Restores every field to its default.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// True when the speed field carries the unset sentinel.
    #[must_use]
    pub fn speed_is_unset(&self) -> bool {
        self.speed < 0.0
    }

    /// Resolves the effective target, preferring a dynamic provider.
    #[must_use]
    pub fn resolve_target(&self) -> Vec2 {
        match (&self.target_provider, self.uses_dynamic_target) {
            (Some(provider), true) => provider.resolve(),
            _ => self.target_position,
        }
    }
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_unset_sentinels() {
        let state = KinematicState::new();
        assert!(state.speed_is_unset());
        assert!(state.acceleration_remaining < 0.0);
        assert!(!state.is_initialized);
        assert_eq!(state.axis_ratio, 1.0);
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut state = KinematicState::new();
        state.position = Vec2::new(50.0, 50.0);
        state.elapsed_time = 3.0;
        state.is_initialized = true;
        state.reset();
        assert_eq!(state.position, Vec2::ZERO);
        assert_eq!(state.elapsed_time, 0.0);
        assert!(!state.is_initialized);
    }

    #[test]
    fn test_dynamic_target_resolution() {
        let mut state = KinematicState::new();
        state.target_position = Vec2::new(1.0, 1.0);
        state.target_provider = Some(TargetProvider::fixed(Vec2::new(9.0, 9.0)));

        // Static mode ignores the provider.
        assert_eq!(state.resolve_target(), Vec2::new(1.0, 1.0));
        state.uses_dynamic_target = true;
        assert_eq!(state.resolve_target(), Vec2::new(9.0, 9.0));
    }

    #[test]
    fn test_provider_offset_composes() {
        let provider = TargetProvider::fixed(Vec2::new(10.0, 20.0));
        let shifted = provider.with_offset(Vec2::new(-10.0, 5.0));
        assert_eq!(shifted.resolve(), Vec2::new(0.0, 25.0));
    }
}

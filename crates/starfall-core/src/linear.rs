//! Straight-line trajectory evaluators.
//!
//! Two flavors:
//! - [`LinearMover`] integrates velocity and acceleration each frame, with
//!   optional per-frame re-aiming at a dynamic target.
//! - [`TargetEaseMover`] interpolates from the start position to a target
//!   along an easing curve, with the duration derived from the travel
//!   distance and the configured speed.

use crate::ease::Easing;
use crate::kinematics::KinematicState;
use starfall_common::Vec2;

/// Minimum speed below which the heading is left unchanged.
const HEADING_EPSILON: f32 = 0.01;

/// Minimum direction length considered aimable.
const DIRECTION_EPSILON: f32 = 0.001;

/// Velocity-integrating straight-line mover.
#[derive(Debug, Clone, Default)]
pub struct LinearMover;

impl LinearMover {
    /// Derives the initial velocity from the target or the heading.
    pub fn initialize(&mut self, state: &mut KinematicState, current_pos: Vec2) {
        state.position = current_pos;

        // A provider is resolved at least once even in static-target mode so
        // the initial aim is correct.
        if let Some(provider) = &state.target_provider {
            state.target_position = provider.resolve();
        }

        if state.uses_target_mode {
            let direction = (state.target_position - current_pos).normalized();
            state.velocity = direction * state.speed;
            if direction.length() > DIRECTION_EPSILON {
                state.heading = direction.to_degrees();
            }
        } else {
            state.velocity = Vec2::from_degrees(state.heading) * state.speed;
        }

        state.is_initialized = true;
    }

    /// Integrates one frame.
    pub fn advance(&mut self, state: &mut KinematicState, dt: f32) {
        if state.uses_dynamic_target {
            if let Some(provider) = &state.target_provider {
                state.target_position = provider.resolve();
                let direction = (state.target_position - state.position).normalized();
                if state.speed > DIRECTION_EPSILON {
                    state.velocity = direction * state.speed;
                }
                if direction.length() > DIRECTION_EPSILON {
                    state.heading = direction.to_degrees();
                }
            }
        }

        // Acceleration runs while the countdown is non-negative; a negative
        // countdown means unlimited and is never decremented.
        if state.acceleration_remaining >= 0.0 {
            state.acceleration_remaining -= dt;
            state.velocity += state.vector_acceleration * dt;

            if state.scalar_acceleration.abs() > DIRECTION_EPSILON {
                state.velocity +=
                    Vec2::from_degrees(state.heading) * state.scalar_acceleration * dt;
            }
        }

        state.speed = state.velocity.length();
        if state.speed > HEADING_EPSILON {
            state.heading = state.velocity.to_degrees();
        }

        state.position += state.velocity * dt;
        state.elapsed_time += dt;
    }
}

/// Eased point-to-point mover.
///
/// Duration is distance divided by speed, captured at initialization.
#[derive(Debug, Clone)]
pub struct TargetEaseMover {
    easing: Easing,
    start_pos: Vec2,
    duration: f32,
}

impl TargetEaseMover {
    /// Creates a mover with the given easing curve.
    #[must_use]
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            start_pos: Vec2::ZERO,
            duration: 0.0,
        }
    }

    /// Captures the start position and computes the travel duration.
    pub fn initialize(&mut self, state: &mut KinematicState, current_pos: Vec2) {
        state.position = current_pos;
        self.start_pos = current_pos;

        if state.uses_dynamic_target {
            if let Some(provider) = &state.target_provider {
                state.target_position = provider.resolve();
            }
        }

        let total_distance = current_pos.distance(state.target_position);
        self.duration = if state.speed > 0.0 {
            total_distance / state.speed
        } else {
            1.0
        };

        state.elapsed_time = 0.0;
        state.is_initialized = true;
    }

    /// Interpolates one frame along the eased path.
    pub fn advance(&mut self, state: &mut KinematicState, dt: f32) {
        state.elapsed_time += dt;

        let t = (state.elapsed_time / self.duration).min(1.0);
        let eased = self.easing.apply(t);

        state.position = self.start_pos.lerp(state.target_position, eased);

        if t < 1.0 && dt > 0.0 {
            let direction = (state.target_position - self.start_pos).normalized();
            state.velocity = direction * state.speed;
        } else {
            state.velocity = Vec2::ZERO;
        }

        state.speed = state.velocity.length();
        if state.speed > HEADING_EPSILON {
            state.heading = state.velocity.to_degrees();
        }
    }
}

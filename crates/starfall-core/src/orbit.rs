//! Circular and elliptical orbit evaluators.
//!
//! Orbital phase is in radians. Three initialization modes for circles:
//!
//! 1. No explicit center: the current position becomes the center and the
//!    object starts at phase zero on the radius.
//! 2. Explicit center with auto-derived radius: radius and phase are derived
//!    from the offset to the current position, so entry is continuous.
//! 3. Tangent entry: center and phase are computed so the orbit continues
//!    the current straight-line motion without a velocity discontinuity.
//!
//! An explicit center combined with an explicit radius snaps the object onto
//! the orbit at its configured phase. That discontinuity is intentional;
//! stage patterns use it to lock spawned objects onto a ring.

use crate::kinematics::KinematicState;
use starfall_common::Vec2;

/// Fallback radius for tangent entry when none was configured.
const DEFAULT_TANGENT_RADIUS: f32 = 100.0;

/// Circular orbit mover.
#[derive(Debug, Clone, Default)]
pub struct CircularMover;

impl CircularMover {
    /// Establishes center, radius, and starting phase per the configured mode.
    pub fn initialize(&mut self, state: &mut KinematicState, current_pos: Vec2) {
        state.position = current_pos;

        if state.uses_tangent_entry {
            if state.radius < 0.01 {
                state.radius = DEFAULT_TANGENT_RADIUS;
            }

            state.angle_rate = state.tangent_speed / state.radius;
            if state.is_clockwise {
                state.angle_rate = -state.angle_rate;
            }

            // Normal points from the object to the center: right of the
            // tangent when clockwise, left when counter-clockwise.
            let normal_heading =
                state.tangent_heading + if state.is_clockwise { -90.0 } else { 90.0 };
            state.center = current_pos + Vec2::from_degrees(normal_heading) * state.radius;

            let offset = current_pos - state.center;
            state.angle = offset.y.atan2(offset.x);
            state.position = current_pos;
        } else if state.uses_explicit_center {
            if state.auto_derives_radius {
                let offset = current_pos - state.center;
                state.radius = offset.length();
                if state.radius > 0.01 {
                    state.angle = offset.y.atan2(offset.x);
                } else {
                    state.angle = 0.0;
                    state.radius = 1.0;
                }
            }

            // With an explicit radius this snaps onto the orbit.
            state.position = state.center + Vec2::from_radians(state.angle) * state.radius;
        } else {
            state.center = current_pos;
            state.position = state.center + Vec2::new(state.radius, 0.0);
        }

        state.is_initialized = true;
    }

    /// Advances phase and radius, repositioning on the orbit.
    pub fn advance(&mut self, state: &mut KinematicState, dt: f32) {
        state.angle += state.angle_rate * dt;
        state.radius += state.radius_rate * dt;

        state.position = state.center + Vec2::from_radians(state.angle) * state.radius;
        state.speed = state.radius * state.angle_rate.abs();

        state.elapsed_time += dt;
    }
}

/// Elliptical orbit mover.
///
/// The ellipse lives in a local frame scaled by `axis_ratio` on X and rotated
/// by `ellipse_rotation`.
#[derive(Debug, Clone, Default)]
pub struct EllipticalMover;

impl EllipticalMover {
    fn ellipse_point(state: &KinematicState) -> Vec2 {
        let a = state.radius * state.axis_ratio;
        let b = state.radius;
        let local = Vec2::new(a * state.angle.cos(), b * state.angle.sin());
        state.center + local.rotated(state.ellipse_rotation)
    }

    /// Establishes the ellipse frame, deriving radius and phase when asked.
    pub fn initialize(&mut self, state: &mut KinematicState, current_pos: Vec2) {
        state.position = current_pos;

        if state.uses_explicit_center {
            if state.auto_derives_radius {
                // Un-rotate the offset into the ellipse's local frame first.
                let local = (current_pos - state.center).rotated(-state.ellipse_rotation);
                state.radius = (local.x * local.x
                    + local.y * local.y / (state.axis_ratio * state.axis_ratio))
                    .sqrt();

                if state.radius > 0.01 {
                    state.angle = (local.y / state.axis_ratio).atan2(local.x);
                } else {
                    state.angle = 0.0;
                    state.radius = 1.0;
                }
            }

            state.position = Self::ellipse_point(state);
        } else {
            state.center = current_pos;
            state.position = current_pos + Vec2::new(state.radius * state.axis_ratio, 0.0);
        }

        state.is_initialized = true;
    }

    /// Advances phase and radius along the rotated ellipse.
    pub fn advance(&mut self, state: &mut KinematicState, dt: f32) {
        state.angle += state.angle_rate * dt;
        state.radius += state.radius_rate * dt;

        state.position = Self::ellipse_point(state);

        let a = state.radius * state.axis_ratio;
        let b = state.radius;
        state.speed = (a + b) / 2.0 * state.angle_rate.abs();

        state.elapsed_time += dt;
    }
}

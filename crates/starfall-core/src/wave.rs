//! Sinusoidal wave trajectory evaluator.
//!
//! Constant drift along the base heading plus a perpendicular sinusoid. The
//! perpendicular component uses the analytic derivative of the offset, so the
//! reported velocity is exact rather than numerically differenced.

use crate::kinematics::KinematicState;
use starfall_common::Vec2;
use std::f32::consts::TAU;

/// Wave mover parameters and cached frame.
#[derive(Debug, Clone)]
pub struct WaveMover {
    amplitude: f32,
    frequency: f32,
    phase: f32,
    base_dir: Vec2,
    wave_dir: Vec2,
    base_speed: f32,
}

impl WaveMover {
    /// Creates a wave mover. `frequency` is oscillations per second, `phase`
    /// is a radian offset into the sinusoid.
    #[must_use]
    pub fn new(amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
            base_dir: Vec2::ZERO,
            wave_dir: Vec2::ZERO,
            base_speed: 0.0,
        }
    }

    /// Caches the base and perpendicular directions from the heading.
    pub fn initialize(&mut self, state: &mut KinematicState, current_pos: Vec2) {
        state.position = current_pos;

        self.base_dir = Vec2::from_degrees(state.heading);
        self.wave_dir = self.base_dir.perp();
        self.base_speed = state.speed;

        state.velocity = self.base_dir * self.base_speed;
        state.elapsed_time = 0.0;
        state.is_initialized = true;
    }

    /// Integrates one frame of drift plus oscillation.
    pub fn advance(&mut self, state: &mut KinematicState, dt: f32) {
        state.elapsed_time += dt;

        let arg = TAU * self.frequency * state.elapsed_time + self.phase;
        // d/dt of amplitude * sin(arg)
        let wave_velocity = self.amplitude * TAU * self.frequency * arg.cos();

        state.position += self.base_dir * self.base_speed * dt + self.wave_dir * wave_velocity * dt;

        state.velocity = self.base_dir * self.base_speed + self.wave_dir * wave_velocity;
        state.speed = state.velocity.length();

        if state.speed > 0.01 {
            state.heading = state.velocity.to_degrees();
        }
    }
}

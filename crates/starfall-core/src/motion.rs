//! Motion units: one trajectory evaluator plus one termination predicate.
//!
//! A [`MotionAction`] owns a [`KinematicState`], a [`Mover`], and a
//! [`StopCondition`]. It drives anything implementing [`MotionTarget`]
//! through a two-phase protocol:
//!
//! - `apply` initializes on first call (inheriting heading/speed from the
//!   target where the state carries unset sentinels) and writes the state
//!   back into the target.
//! - `update` advances one frame and reports completion. Before the first
//!   apply it is a no-op, so queued units cannot drift while waiting.

use crate::bezier::{BezierMover, ChainBezierMover, FreeBezierMover};
use crate::kinematics::KinematicState;
use crate::linear::{LinearMover, TargetEaseMover};
use crate::orbit::{CircularMover, EllipticalMover};
use crate::stop::StopCondition;
use crate::wave::WaveMover;
use starfall_common::Vec2;

/// Sprite art faces up; rotation zero means heading 90 degrees.
pub const SPRITE_HEADING_OFFSET: f32 = 90.0;

/// Wraps degrees into [0, 360).
#[must_use]
pub fn wrap_degrees(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// Closed set of trajectory evaluators.
#[derive(Debug, Clone)]
pub enum Mover {
    /// Velocity-integrating straight line.
    Linear(LinearMover),
    /// Eased interpolation to a target point.
    TargetEase(TargetEaseMover),
    /// Circular orbit.
    Circular(CircularMover),
    /// Elliptical orbit.
    Elliptical(EllipticalMover),
    /// Sinusoidal drift.
    Wave(WaveMover),
    /// Fixed quadratic/cubic Bézier.
    Bezier(BezierMover),
    /// Arbitrary-order Bézier with dynamic control points.
    FreeBezier(FreeBezierMover),
    /// Chained Bézier segments.
    ChainBezier(ChainBezierMover),
}

impl Mover {
    fn initialize(&mut self, state: &mut KinematicState, current_pos: Vec2) {
        match self {
            Self::Linear(m) => m.initialize(state, current_pos),
            Self::TargetEase(m) => m.initialize(state, current_pos),
            Self::Circular(m) => m.initialize(state, current_pos),
            Self::Elliptical(m) => m.initialize(state, current_pos),
            Self::Wave(m) => m.initialize(state, current_pos),
            Self::Bezier(m) => m.initialize(state, current_pos),
            Self::FreeBezier(m) => m.initialize(state, current_pos),
            Self::ChainBezier(m) => m.initialize(state, current_pos),
        }
    }

    fn advance(&mut self, state: &mut KinematicState, dt: f32) {
        match self {
            Self::Linear(m) => m.advance(state, dt),
            Self::TargetEase(m) => m.advance(state, dt),
            Self::Circular(m) => m.advance(state, dt),
            Self::Elliptical(m) => m.advance(state, dt),
            Self::Wave(m) => m.advance(state, dt),
            Self::Bezier(m) => m.advance(state, dt),
            Self::FreeBezier(m) => m.advance(state, dt),
            Self::ChainBezier(m) => m.advance(state, dt),
        }
    }
}

/// The narrow surface a motion unit drives.
pub trait MotionTarget {
    /// Current world position.
    fn position(&self) -> Vec2;
    /// Writes the world position.
    fn set_position(&mut self, position: Vec2);
    /// Current heading in degrees.
    fn heading(&self) -> f32;
    /// Writes the heading in degrees.
    fn set_heading(&mut self, heading: f32);
    /// Current scalar speed.
    fn speed(&self) -> f32;
    /// Writes the scalar speed.
    fn set_speed(&mut self, speed: f32);
    /// Writes the sprite rotation in degrees.
    fn set_rotation(&mut self, rotation: f32);
    /// Whether the sprite rotation should follow the heading.
    fn wants_rotation_sync(&self) -> bool {
        false
    }
}

/// One queued unit of motion.
#[derive(Debug, Clone)]
pub struct MotionAction {
    state: KinematicState,
    mover: Mover,
    stop: StopCondition,
}

impl MotionAction {
    /// Assembles a unit from its three parts.
    #[must_use]
    pub fn new(state: KinematicState, mover: Mover, stop: StopCondition) -> Self {
        Self { state, mover, stop }
    }

    /// Whether the unit has initialized against a target.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized
    }

    /// Read access to the kinematic state, mainly for diagnostics.
    #[must_use]
    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Initializes on first call, then writes the state into the target.
    pub fn apply(&mut self, target: &mut impl MotionTarget) {
        if !self.state.is_initialized {
            if self.state.speed_is_unset() {
                self.state.speed = target.speed();
            }
            if self.state.heading == 0.0 && !self.state.uses_target_mode {
                self.state.heading = target.heading();
            }
            self.mover.initialize(&mut self.state, target.position());
        }

        target.set_position(self.state.position);
        target.set_heading(self.state.heading);
        target.set_speed(self.state.speed);
        if target.wants_rotation_sync() {
            target.set_rotation(wrap_degrees(self.state.heading - SPRITE_HEADING_OFFSET));
        }
    }

    /// Advances one frame. Returns true when the stop condition fires.
    /// A unit that has never been applied does nothing and reports false.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.state.is_initialized {
            return false;
        }
        self.mover.advance(&mut self.state, dt);
        self.stop.should_stop(&self.state)
    }
}

/// Fixed pause that parks its target.
#[derive(Debug, Clone)]
pub struct AwaitAction {
    duration: f32,
    elapsed: f32,
    applied: bool,
}

impl AwaitAction {
    /// Creates a pause of `duration` seconds.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            applied: false,
        }
    }

    /// Arms the pause without touching any target. Used by queues that
    /// gate work other than movement.
    pub fn start(&mut self) {
        self.applied = true;
    }

    /// Halts the target while the pause is active.
    pub fn apply(&mut self, target: &mut impl MotionTarget) {
        self.applied = true;
        target.set_heading(0.0);
        target.set_speed(0.0);
    }

    /// Advances the pause. Returns true when it has elapsed.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.applied {
            return false;
        }
        self.elapsed += dt;
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::Easing;
    use crate::linear::TargetEaseMover;

    #[derive(Debug, Default)]
    struct TestBody {
        position: Vec2,
        heading: f32,
        speed: f32,
        rotation: f32,
        sync: bool,
    }

    impl MotionTarget for TestBody {
        fn position(&self) -> Vec2 {
            self.position
        }
        fn set_position(&mut self, position: Vec2) {
            self.position = position;
        }
        fn heading(&self) -> f32 {
            self.heading
        }
        fn set_heading(&mut self, heading: f32) {
            self.heading = heading;
        }
        fn speed(&self) -> f32 {
            self.speed
        }
        fn set_speed(&mut self, speed: f32) {
            self.speed = speed;
        }
        fn set_rotation(&mut self, rotation: f32) {
            self.rotation = rotation;
        }
        fn wants_rotation_sync(&self) -> bool {
            self.sync
        }
    }

    fn linear_unit(heading: f32, speed: f32) -> MotionAction {
        let mut state = KinematicState::new();
        state.heading = heading;
        state.speed = speed;
        MotionAction::new(
            state,
            Mover::Linear(LinearMover),
            StopCondition::Elapsed { duration: 10.0 },
        )
    }

    #[test]
    fn test_update_before_apply_is_inert() {
        let mut unit = linear_unit(0.0, 100.0);
        for _ in 0..50 {
            assert!(!unit.update(0.1));
        }
        assert_eq!(unit.state().position, Vec2::ZERO);
        assert_eq!(unit.state().elapsed_time, 0.0);

        // The first apply still starts from the target's real position.
        let mut body = TestBody {
            position: Vec2::new(30.0, 40.0),
            ..TestBody::default()
        };
        unit.apply(&mut body);
        assert_eq!(body.position, Vec2::new(30.0, 40.0));
    }

    #[test]
    fn test_speed_and_heading_inheritance() {
        let mut state = KinematicState::new();
        // Leave speed at the unset sentinel and heading at zero.
        let mut unit = MotionAction::new(
            state.clone(),
            Mover::Linear(LinearMover),
            StopCondition::Never,
        );
        let mut body = TestBody {
            heading: 45.0,
            speed: 80.0,
            ..TestBody::default()
        };
        unit.apply(&mut body);
        assert_eq!(unit.state().speed, 80.0);
        assert_eq!(unit.state().heading, 45.0);

        // Target mode keeps its computed aim instead of inheriting heading.
        state.uses_target_mode = true;
        state.target_position = Vec2::new(0.0, 100.0);
        state.speed = 10.0;
        let mut aimed = MotionAction::new(state, Mover::Linear(LinearMover), StopCondition::Never);
        aimed.apply(&mut body);
        assert!((aimed.state().heading - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_rotation_sync_follows_heading() {
        let mut unit = linear_unit(90.0, 50.0);
        let mut body = TestBody {
            sync: true,
            ..TestBody::default()
        };
        unit.apply(&mut body);
        assert_eq!(body.rotation, 0.0);

        let mut west = linear_unit(0.0, 50.0);
        west.apply(&mut body);
        assert_eq!(body.rotation, 270.0);
    }

    #[test]
    fn test_apply_update_cycle_completes() {
        let mut state = KinematicState::new();
        state.uses_target_mode = true;
        state.target_position = Vec2::new(100.0, 0.0);
        state.speed = 50.0;
        let mut unit = MotionAction::new(
            state,
            Mover::TargetEase(TargetEaseMover::new(Easing::Linear)),
            StopCondition::Any(vec![
                StopCondition::Completed,
                StopCondition::Elapsed { duration: 300.0 },
            ]),
        );

        let mut body = TestBody::default();
        let mut ticks = 0;
        loop {
            unit.apply(&mut body);
            if unit.update(0.1) {
                break;
            }
            ticks += 1;
            assert!(ticks < 100, "unit never completed");
        }
        // 100 units at speed 50 is 2 seconds of travel.
        assert!((19..=21).contains(&ticks), "completed after {ticks} ticks");
    }

    #[test]
    fn test_await_parks_target_and_elapses() {
        let mut pause = AwaitAction::new(0.5);
        assert!(!pause.update(1.0)); // inert before apply

        let mut body = TestBody {
            heading: 45.0,
            speed: 80.0,
            ..TestBody::default()
        };
        pause.apply(&mut body);
        assert_eq!(body.speed, 0.0);
        assert_eq!(body.heading, 0.0);

        assert!(!pause.update(0.3));
        assert!(pause.update(0.3));
    }
}

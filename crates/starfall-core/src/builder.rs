//! Fluent builders for motion units.
//!
//! One value-type builder per trajectory family. Builders are plain values:
//! construct, chain setters, and call [`build_projectile`] for a bare
//! [`MotionAction`] or [`build`] for a queueable [`Action`]. A builder left
//! without an explicit stop rule gets the family's default time box so a
//! misconfigured unit can never run forever.
//!
//! [`build`]: LinearMotion::build
//! [`build_projectile`]: LinearMotion::build_projectile

use crate::actor::Action;
use crate::bezier::{BezierMover, BezierSegment, ChainBezierMover, ControlPoint, FreeBezierMover};
use crate::ease::Easing;
use crate::kinematics::{KinematicState, TargetProvider};
use crate::linear::{LinearMover, TargetEaseMover};
use crate::motion::{MotionAction, Mover};
use crate::orbit::{CircularMover, EllipticalMover};
use crate::stop::StopCondition;
use crate::wave::WaveMover;
use starfall_common::Vec2;
use std::f32::consts::TAU;

/// Default arrival threshold for [`LinearMotion::stop_when_reached`].
pub const DEFAULT_ARRIVAL_THRESHOLD: f32 = 5.0;

/// Default time box applied when no stop rule was configured.
const DEFAULT_TIME_BOX: f32 = 10.0;

/// Safety-net time box for eased target movement.
const EASING_TIME_BOX: f32 = 300.0;

// ===== Linear =====

/// Builder for straight-line and eased point-to-point movement.
#[derive(Debug, Clone, Default)]
pub struct LinearMotion {
    state: KinematicState,
    stop: Option<StopCondition>,
    easing: Easing,
    uses_easing: bool,
}

impl LinearMotion {
    /// Creates a builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves toward a fixed point.
    pub fn to(mut self, target: Vec2) -> Self {
        self.state.target_position = target;
        self.state.uses_target_mode = true;
        self
    }

    /// Tracks a dynamic target.
    pub fn to_target(mut self, provider: TargetProvider) -> Self {
        self.state.target_provider = Some(provider);
        self.state.uses_dynamic_target = true;
        self.state.uses_target_mode = true;
        self
    }

    /// Tracks a dynamic target displaced by a constant offset.
    pub fn to_target_offset(self, provider: TargetProvider, offset: Vec2) -> Self {
        self.to_target(provider.with_offset(offset))
    }

    /// Re-aims at the dynamic target every frame.
    pub fn enable_tracking(mut self) -> Self {
        self.state.uses_dynamic_target = true;
        self
    }

    /// Resolves the dynamic target once, at initialization.
    pub fn disable_tracking(mut self) -> Self {
        self.state.uses_dynamic_target = false;
        self
    }

    /// Moves along a fixed heading in degrees.
    pub fn direction(mut self, degrees: f32) -> Self {
        self.state.heading = degrees;
        self.state.uses_target_mode = false;
        self
    }

    /// Sets the scalar speed.
    pub fn speed(mut self, speed: f32) -> Self {
        self.state.speed = speed;
        self
    }

    /// Accelerates along the current heading.
    pub fn accelerate(mut self, acceleration: f32) -> Self {
        self.state.scalar_acceleration = acceleration;
        self
    }

    /// Applies a fixed acceleration vector.
    pub fn accelerate_vec(mut self, acceleration: Vec2) -> Self {
        self.state.vector_acceleration = acceleration;
        self
    }

    /// Limits acceleration to the first `duration` seconds.
    pub fn accelerate_during(mut self, duration: f32) -> Self {
        self.state.acceleration_remaining = duration;
        self
    }

    /// Eases toward the target with the given curve.
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self.uses_easing = true;
        self
    }

    /// Quadratic ease-in.
    pub fn ease_in(self) -> Self {
        self.ease(Easing::SmoothIn)
    }

    /// Quadratic ease-out.
    pub fn ease_out(self) -> Self {
        self.ease(Easing::SmoothOut)
    }

    /// Smoothstep easing.
    pub fn ease_in_out(self) -> Self {
        self.ease(Easing::SmoothInOut)
    }

    /// Stops after a fixed time.
    pub fn stop_after(mut self, seconds: f32) -> Self {
        self.stop = Some(StopCondition::Elapsed { duration: seconds });
        self
    }

    /// Stops when within `threshold` of the target.
    pub fn stop_when_reached(mut self, threshold: f32) -> Self {
        self.stop = Some(StopCondition::NearTarget { threshold });
        self
    }

    /// Stops when speed falls below `threshold`.
    pub fn stop_when_slow(mut self, threshold: f32) -> Self {
        self.stop = Some(StopCondition::SpeedBelow { threshold });
        self
    }

    /// Stops after traveling a straight-line distance from the start.
    pub fn stop_after_distance(mut self, distance: f32) -> Self {
        self.stop = Some(StopCondition::traveled_distance(distance));
        self
    }

    /// Removes every stop rule.
    pub fn never_stop(mut self) -> Self {
        self.stop = Some(StopCondition::Never);
        self
    }

    fn default_stop(&self) -> StopCondition {
        if self.uses_easing && self.state.uses_target_mode {
            StopCondition::Any(vec![
                StopCondition::Completed,
                StopCondition::Elapsed {
                    duration: EASING_TIME_BOX,
                },
            ])
        } else {
            let mut rules = vec![StopCondition::Elapsed {
                duration: DEFAULT_TIME_BOX,
            }];
            if self.state.uses_target_mode {
                rules.push(StopCondition::NearTarget {
                    threshold: DEFAULT_ARRIVAL_THRESHOLD,
                });
            }
            StopCondition::Any(rules)
        }
    }

    /// Builds a bare motion unit.
    #[must_use]
    pub fn build_projectile(self) -> MotionAction {
        let stop = self.stop.clone().unwrap_or_else(|| self.default_stop());
        let mover = if self.uses_easing {
            Mover::TargetEase(TargetEaseMover::new(self.easing))
        } else {
            Mover::Linear(LinearMover)
        };
        MotionAction::new(self.state, mover, stop)
    }

    /// Builds a queueable action.
    #[must_use]
    pub fn build(self) -> Action {
        Action::Motion(self.build_projectile())
    }
}

// ===== Circular =====

/// Builder for circular orbits.
#[derive(Debug, Clone, Default)]
pub struct CircularMotion {
    state: KinematicState,
    stop: Option<StopCondition>,
}

impl CircularMotion {
    /// Creates a builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orbits around the current position at `radius`.
    pub fn radius(mut self, radius: f32) -> Self {
        self.state.radius = radius;
        self.state.uses_explicit_center = false;
        self.state.uses_tangent_entry = false;
        self.state.auto_derives_radius = false;
        self
    }

    /// Orbits around `center`, deriving radius and phase from the current
    /// position so entry is continuous.
    pub fn center_at(mut self, center: Vec2) -> Self {
        self.state.center = center;
        self.state.uses_explicit_center = true;
        self.state.uses_tangent_entry = false;
        self.state.auto_derives_radius = true;
        self
    }

    /// Orbits around `center` at an explicit `radius`. The object snaps onto
    /// the orbit at its configured phase.
    pub fn center_at_with_radius(mut self, center: Vec2, radius: f32) -> Self {
        self.state.center = center;
        self.state.radius = radius;
        self.state.uses_explicit_center = true;
        self.state.uses_tangent_entry = false;
        self.state.auto_derives_radius = false;
        self
    }

    /// Enters the orbit tangentially at the given linear speed.
    pub fn tangent_speed(mut self, speed: f32) -> Self {
        self.state.tangent_speed = speed;
        self.state.uses_tangent_entry = true;
        self.state.uses_explicit_center = false;
        self
    }

    /// Heading of the tangent at entry, in degrees.
    pub fn tangent_heading(mut self, degrees: f32) -> Self {
        self.state.tangent_heading = degrees;
        self.state.uses_tangent_entry = true;
        self.state.uses_explicit_center = false;
        self
    }

    /// Sets the radius without changing the mode.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.state.radius = radius;
        self
    }

    /// Orbits clockwise.
    pub fn clockwise(mut self) -> Self {
        self.state.is_clockwise = true;
        self
    }

    /// Orbits counter-clockwise.
    pub fn counter_clockwise(mut self) -> Self {
        self.state.is_clockwise = false;
        self
    }

    /// Radius growth rate, units per second.
    pub fn radius_rate(mut self, rate: f32) -> Self {
        self.state.radius_rate = rate;
        self
    }

    /// Phase rate, radians per second.
    pub fn angle_rate(mut self, radians_per_second: f32) -> Self {
        self.state.angle_rate = radians_per_second;
        self
    }

    /// Starting phase in radians.
    pub fn start_angle(mut self, radians: f32) -> Self {
        self.state.angle = radians;
        self
    }

    /// Stops after a fixed time.
    pub fn stop_after(mut self, seconds: f32) -> Self {
        self.stop = Some(StopCondition::Elapsed { duration: seconds });
        self
    }

    /// Stops when the radius leaves the `[min, max]` band.
    pub fn stop_at_radius(mut self, min: f32, max: f32) -> Self {
        self.stop = Some(StopCondition::RadiusOutside { min, max });
        self
    }

    /// Stops after sweeping `radians` of phase.
    pub fn stop_after_rotation(mut self, radians: f32) -> Self {
        self.stop = Some(StopCondition::swept_angle(radians));
        self
    }

    /// Stops after a number of full revolutions.
    pub fn circles(self, count: f32) -> Self {
        self.stop_after_rotation(count * TAU)
    }

    /// Builds a bare motion unit.
    #[must_use]
    pub fn build_projectile(self) -> MotionAction {
        let stop = self.stop.unwrap_or_else(|| {
            StopCondition::Any(vec![
                StopCondition::Elapsed {
                    duration: DEFAULT_TIME_BOX,
                },
                StopCondition::swept_angle(TAU),
            ])
        });
        MotionAction::new(self.state, Mover::Circular(CircularMover), stop)
    }

    /// Builds a queueable action.
    #[must_use]
    pub fn build(self) -> Action {
        Action::Motion(self.build_projectile())
    }
}

// ===== Elliptical =====

/// Builder for elliptical orbits.
#[derive(Debug, Clone)]
pub struct EllipticalMotion {
    state: KinematicState,
    stop: Option<StopCondition>,
}

impl Default for EllipticalMotion {
    fn default() -> Self {
        Self {
            state: KinematicState::new(),
            stop: None,
        }
    }
}

impl EllipticalMotion {
    /// Creates a builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orbits around the current position at base `radius`.
    pub fn radius(mut self, radius: f32) -> Self {
        self.state.radius = radius;
        self.state.uses_explicit_center = false;
        self.state.auto_derives_radius = false;
        self
    }

    /// Orbits around `center`, deriving radius and phase from the current
    /// position in the ellipse's local frame.
    pub fn center_at(mut self, center: Vec2) -> Self {
        self.state.center = center;
        self.state.uses_explicit_center = true;
        self.state.auto_derives_radius = true;
        self
    }

    /// Orbits around `center` at an explicit base `radius`.
    pub fn center_at_with_radius(mut self, center: Vec2, radius: f32) -> Self {
        self.state.center = center;
        self.state.radius = radius;
        self.state.uses_explicit_center = true;
        self.state.auto_derives_radius = false;
        self
    }

    /// Ratio of the X semi-axis to the Y semi-axis.
    pub fn axis_ratio(mut self, ratio: f32) -> Self {
        self.state.axis_ratio = ratio;
        self
    }

    /// Rotates the ellipse frame, radians.
    pub fn rotate(mut self, radians: f32) -> Self {
        self.state.ellipse_rotation = radians;
        self
    }

    /// Phase rate, radians per second.
    pub fn angle_rate(mut self, radians_per_second: f32) -> Self {
        self.state.angle_rate = radians_per_second;
        self
    }

    /// Stops after a fixed time.
    pub fn stop_after(mut self, seconds: f32) -> Self {
        self.stop = Some(StopCondition::Elapsed { duration: seconds });
        self
    }

    /// Stops after a number of full revolutions.
    pub fn circles(mut self, count: f32) -> Self {
        self.stop = Some(StopCondition::swept_angle(count * TAU));
        self
    }

    /// Builds a bare motion unit.
    #[must_use]
    pub fn build_projectile(self) -> MotionAction {
        let stop = self.stop.unwrap_or(StopCondition::Elapsed {
            duration: DEFAULT_TIME_BOX,
        });
        MotionAction::new(self.state, Mover::Elliptical(EllipticalMover), stop)
    }

    /// Builds a queueable action.
    #[must_use]
    pub fn build(self) -> Action {
        Action::Motion(self.build_projectile())
    }
}

// ===== Wave =====

/// Builder for sinusoidal drift. Defaults to 100 units per second downward.
#[derive(Debug, Clone)]
pub struct WaveMotion {
    state: KinematicState,
    amplitude: f32,
    frequency: f32,
    phase: f32,
    stop: Option<StopCondition>,
}

impl Default for WaveMotion {
    fn default() -> Self {
        let mut state = KinematicState::new();
        state.speed = 100.0;
        state.heading = 270.0;
        Self {
            state,
            amplitude: 50.0,
            frequency: 2.0,
            phase: 0.0,
            stop: None,
        }
    }
}

impl WaveMotion {
    /// Creates a builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lateral amplitude in units.
    pub fn amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Oscillations per second.
    pub fn frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Phase offset in radians.
    pub fn phase(mut self, radians: f32) -> Self {
        self.phase = radians;
        self
    }

    /// Base drift heading in degrees.
    pub fn direction(mut self, degrees: f32) -> Self {
        self.state.heading = degrees;
        self
    }

    /// Base drift speed.
    pub fn speed(mut self, speed: f32) -> Self {
        self.state.speed = speed;
        self
    }

    /// Stops after a fixed time.
    pub fn stop_after(mut self, seconds: f32) -> Self {
        self.stop = Some(StopCondition::Elapsed { duration: seconds });
        self
    }

    /// Stops when within `threshold` of the target position.
    pub fn stop_when_reached(mut self, threshold: f32) -> Self {
        self.stop = Some(StopCondition::NearTarget { threshold });
        self
    }

    /// Builds a bare motion unit.
    #[must_use]
    pub fn build_projectile(self) -> MotionAction {
        let stop = self.stop.unwrap_or(StopCondition::Elapsed {
            duration: DEFAULT_TIME_BOX,
        });
        MotionAction::new(
            self.state,
            Mover::Wave(WaveMover::new(self.amplitude, self.frequency, self.phase)),
            stop,
        )
    }

    /// Builds a queueable action.
    #[must_use]
    pub fn build(self) -> Action {
        Action::Motion(self.build_projectile())
    }
}

// ===== Fixed-order Bézier =====

/// Builder for quadratic and cubic Bézier movement.
#[derive(Debug, Clone)]
pub struct BezierMotion {
    state: KinematicState,
    points: Vec<Vec2>,
    duration: f32,
    easing: Easing,
    stop: Option<StopCondition>,
}

impl Default for BezierMotion {
    fn default() -> Self {
        Self {
            state: KinematicState::new(),
            points: Vec::new(),
            duration: 1.0,
            easing: Easing::Linear,
            stop: None,
        }
    }
}

impl BezierMotion {
    /// Creates a builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a control point.
    pub fn control_point(mut self, point: Vec2) -> Self {
        self.points.push(point);
        self
    }

    /// Appends the curve endpoint.
    pub fn to(self, endpoint: Vec2) -> Self {
        self.control_point(endpoint)
    }

    /// Replaces the points with a quadratic (control point, endpoint) pair.
    pub fn quadratic(mut self, control: Vec2, endpoint: Vec2) -> Self {
        self.points = vec![control, endpoint];
        self
    }

    /// Replaces the points with a cubic (two controls, endpoint) triple.
    pub fn cubic(mut self, control1: Vec2, control2: Vec2, endpoint: Vec2) -> Self {
        self.points = vec![control1, control2, endpoint];
        self
    }

    /// Travel time in seconds.
    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    /// Easing applied to curve time.
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Quadratic ease-in.
    pub fn ease_in(self) -> Self {
        self.ease(Easing::SmoothIn)
    }

    /// Quadratic ease-out.
    pub fn ease_out(self) -> Self {
        self.ease(Easing::SmoothOut)
    }

    /// Smoothstep easing.
    pub fn ease_in_out(self) -> Self {
        self.ease(Easing::SmoothInOut)
    }

    /// Builds a bare motion unit.
    #[must_use]
    pub fn build_projectile(self) -> MotionAction {
        let stop = self.stop.unwrap_or(StopCondition::Elapsed {
            duration: self.duration,
        });
        MotionAction::new(
            self.state,
            Mover::Bezier(BezierMover::new(self.points, self.duration, self.easing)),
            stop,
        )
    }

    /// Builds a queueable action.
    #[must_use]
    pub fn build(self) -> Action {
        Action::Motion(self.build_projectile())
    }
}

// ===== General Bézier =====

/// Builder for arbitrary-order Bézier curves with dynamic control points.
#[derive(Debug, Clone)]
pub struct FreeBezierMotion {
    state: KinematicState,
    points: Vec<ControlPoint>,
    duration: f32,
    easing: Easing,
    stop: Option<StopCondition>,
}

impl Default for FreeBezierMotion {
    fn default() -> Self {
        Self {
            state: KinematicState::new(),
            points: Vec::new(),
            duration: 1.0,
            easing: Easing::Linear,
            stop: None,
        }
    }
}

impl FreeBezierMotion {
    /// Creates a builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fixed control point.
    pub fn point(mut self, point: Vec2) -> Self {
        self.points.push(ControlPoint::Fixed(point));
        self
    }

    /// Appends a control point resolved from a provider at initialization.
    pub fn point_at_target(mut self, provider: TargetProvider) -> Self {
        self.points.push(ControlPoint::Dynamic(provider));
        self
    }

    /// Appends a dynamic control point displaced by a constant offset.
    pub fn point_at_target_offset(self, provider: TargetProvider, offset: Vec2) -> Self {
        self.point_at_target(provider.with_offset(offset))
    }

    /// Appends several fixed control points.
    pub fn points(mut self, points: impl IntoIterator<Item = Vec2>) -> Self {
        self.points
            .extend(points.into_iter().map(ControlPoint::Fixed));
        self
    }

    /// Travel time in seconds.
    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    /// Easing applied to curve time.
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Quadratic ease-in.
    pub fn ease_in(self) -> Self {
        self.ease(Easing::SmoothIn)
    }

    /// Quadratic ease-out.
    pub fn ease_out(self) -> Self {
        self.ease(Easing::SmoothOut)
    }

    /// Smoothstep easing.
    pub fn ease_in_out(self) -> Self {
        self.ease(Easing::SmoothInOut)
    }

    /// Builds a bare motion unit.
    #[must_use]
    pub fn build_projectile(self) -> MotionAction {
        // Slack past the duration lets the endpoint tangent settle.
        let stop = self.stop.unwrap_or(StopCondition::Elapsed {
            duration: self.duration + 0.1,
        });
        MotionAction::new(
            self.state,
            Mover::FreeBezier(FreeBezierMover::new(self.points, self.duration, self.easing)),
            stop,
        )
    }

    /// Builds a queueable action.
    #[must_use]
    pub fn build(self) -> Action {
        Action::Motion(self.build_projectile())
    }
}

// ===== Composite Bézier =====

/// Builder for chained Bézier segments. Setters apply to the segment under
/// construction; [`Self::new_segment`] seals it and starts the next one.
#[derive(Debug, Clone)]
pub struct ChainBezierMotion {
    state: KinematicState,
    segments: Vec<BezierSegment>,
    current: BezierSegment,
    stop: Option<StopCondition>,
}

impl Default for ChainBezierMotion {
    fn default() -> Self {
        Self {
            state: KinematicState::new(),
            segments: Vec::new(),
            current: BezierSegment {
                points: Vec::new(),
                duration: 1.0,
                easing: Easing::Linear,
            },
            stop: None,
        }
    }
}

impl ChainBezierMotion {
    /// Creates a builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a control point to the current segment.
    pub fn point(mut self, point: Vec2) -> Self {
        self.current.points.push(point);
        self
    }

    /// Appends several control points to the current segment.
    pub fn points(mut self, points: impl IntoIterator<Item = Vec2>) -> Self {
        self.current.points.extend(points);
        self
    }

    /// Duration of the current segment.
    pub fn duration(mut self, seconds: f32) -> Self {
        self.current.duration = seconds;
        self
    }

    /// Easing of the current segment.
    pub fn ease(mut self, easing: Easing) -> Self {
        self.current.easing = easing;
        self
    }

    /// Quadratic ease-in for the current segment.
    pub fn ease_in(self) -> Self {
        self.ease(Easing::SmoothIn)
    }

    /// Quadratic ease-out for the current segment.
    pub fn ease_out(self) -> Self {
        self.ease(Easing::SmoothOut)
    }

    /// Smoothstep easing for the current segment.
    pub fn ease_in_out(self) -> Self {
        self.ease(Easing::SmoothInOut)
    }

    /// Seals the current segment and starts a fresh one.
    pub fn new_segment(mut self) -> Self {
        if !self.current.points.is_empty() {
            self.segments.push(std::mem::replace(
                &mut self.current,
                BezierSegment {
                    points: Vec::new(),
                    duration: 1.0,
                    easing: Easing::Linear,
                },
            ));
        }
        self
    }

    /// Builds a bare motion unit.
    #[must_use]
    pub fn build_projectile(mut self) -> MotionAction {
        if !self.current.points.is_empty() {
            self.segments.push(self.current);
        }

        let mover = ChainBezierMover::new(self.segments);
        let stop = self.stop.unwrap_or(StopCondition::Elapsed {
            duration: mover.total_duration() + 0.1,
        });
        MotionAction::new(self.state, Mover::ChainBezier(mover), stop)
    }

    /// Builds a queueable action.
    #[must_use]
    pub fn build(self) -> Action {
        Action::Motion(self.build_projectile())
    }
}

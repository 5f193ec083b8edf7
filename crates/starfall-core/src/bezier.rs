//! Bézier curve trajectory evaluators.
//!
//! Three flavors:
//! - [`BezierMover`]: fixed quadratic/cubic curves with closed-form
//!   evaluation and analytic tangents.
//! - [`FreeBezierMover`]: any number of control points, each fixed or
//!   resolved from a dynamic provider once at initialization; de Casteljau
//!   evaluation with finite-difference tangents.
//! - [`ChainBezierMover`]: an ordered chain of segments auto-stitched end to
//!   end, each with its own duration and easing.
//!
//! Every flavor prepends the current position as the first control point at
//! initialization unless the authored first point is already within one unit
//! of it.

use crate::ease::Easing;
use crate::kinematics::{KinematicState, TargetProvider};
use starfall_common::Vec2;

/// Tangent magnitudes below this leave velocity and heading unchanged.
const TANGENT_EPSILON: f32 = 0.01;

/// Parameter offset for finite-difference tangents.
const TANGENT_STEP: f32 = 0.001;

/// Distance under which an authored start point reuses the current position.
const START_MERGE_DISTANCE: f32 = 1.0;

fn de_casteljau(points: &[Vec2], t: f32) -> Vec2 {
    let mut scratch = points.to_vec();
    let mut len = scratch.len();
    while len > 1 {
        for i in 0..len - 1 {
            scratch[i] = scratch[i].lerp(scratch[i + 1], t);
        }
        len -= 1;
    }
    scratch.first().copied().unwrap_or(Vec2::ZERO)
}

fn write_tangent(state: &mut KinematicState, tangent: Vec2) {
    if tangent.length() > TANGENT_EPSILON {
        state.velocity = tangent;
        state.speed = tangent.length();
        state.heading = tangent.to_degrees();
    }
}

fn prepend_start(points: &mut Vec<Vec2>, current_pos: Vec2) {
    if points
        .first()
        .map_or(true, |p| p.distance(current_pos) > START_MERGE_DISTANCE)
    {
        points.insert(0, current_pos);
    }
}

// ===== Fixed-order Bézier =====

/// Quadratic/cubic Bézier mover with analytic tangents.
#[derive(Debug, Clone)]
pub struct BezierMover {
    points: Vec<Vec2>,
    duration: f32,
    easing: Easing,
}

impl BezierMover {
    /// Creates a mover over the authored control points.
    #[must_use]
    pub fn new(points: Vec<Vec2>, duration: f32, easing: Easing) -> Self {
        Self {
            points,
            duration,
            easing,
        }
    }

    /// Prepends the current position as the curve start.
    pub fn initialize(&mut self, state: &mut KinematicState, current_pos: Vec2) {
        state.position = current_pos;
        prepend_start(&mut self.points, current_pos);
        state.elapsed_time = 0.0;
        state.is_initialized = true;
    }

    /// Evaluates the curve at eased normalized time.
    pub fn advance(&mut self, state: &mut KinematicState, dt: f32) {
        state.elapsed_time += dt;

        let t = (state.elapsed_time / self.duration).min(1.0);
        let eased = self.easing.apply(t);

        match self.points.as_slice() {
            [p0, p1, p2] => {
                let u = 1.0 - eased;
                state.position = *p0 * (u * u) + *p1 * (2.0 * u * eased) + *p2 * (eased * eased);
                let tangent = (*p1 - *p0) * (2.0 * u) + (*p2 - *p1) * (2.0 * eased);
                write_tangent(state, tangent);
            }
            [p0, p1, p2, p3] => {
                let u = 1.0 - eased;
                state.position = *p0 * (u * u * u)
                    + *p1 * (3.0 * u * u * eased)
                    + *p2 * (3.0 * u * eased * eased)
                    + *p3 * (eased * eased * eased);
                let tangent = (*p1 - *p0) * (3.0 * u * u)
                    + (*p2 - *p1) * (6.0 * u * eased)
                    + (*p3 - *p2) * (3.0 * eased * eased);
                write_tangent(state, tangent);
            }
            // Other counts hold position.
            _ => {}
        }
    }
}

// ===== General Bézier =====

/// A control point that is either authored or resolved at initialization.
#[derive(Debug, Clone)]
pub enum ControlPoint {
    /// Authored world position.
    Fixed(Vec2),
    /// Resolved from a provider once, when the curve initializes.
    Dynamic(TargetProvider),
}

/// Arbitrary-order Bézier mover with dynamic control points.
#[derive(Debug, Clone)]
pub struct FreeBezierMover {
    authored: Vec<ControlPoint>,
    resolved: Vec<Vec2>,
    duration: f32,
    easing: Easing,
}

impl FreeBezierMover {
    /// Creates a mover over authored control points.
    #[must_use]
    pub fn new(points: Vec<ControlPoint>, duration: f32, easing: Easing) -> Self {
        Self {
            authored: points,
            resolved: Vec::new(),
            duration,
            easing,
        }
    }

    /// Resolves every control point and prepends the curve start.
    pub fn initialize(&mut self, state: &mut KinematicState, current_pos: Vec2) {
        state.position = current_pos;

        self.resolved.clear();
        self.resolved.reserve(self.authored.len() + 1);
        for point in &self.authored {
            self.resolved.push(match point {
                ControlPoint::Fixed(p) => *p,
                ControlPoint::Dynamic(provider) => provider.resolve(),
            });
        }
        prepend_start(&mut self.resolved, current_pos);

        state.elapsed_time = 0.0;
        state.is_initialized = true;
    }

    /// Evaluates via de Casteljau; tangents stop updating at the endpoint.
    pub fn advance(&mut self, state: &mut KinematicState, dt: f32) {
        state.elapsed_time += dt;

        let t = (state.elapsed_time / self.duration).min(1.0);
        let eased = self.easing.apply(t);

        state.position = de_casteljau(&self.resolved, eased);

        if t < 1.0 {
            let before = de_casteljau(&self.resolved, (eased - TANGENT_STEP).max(0.0));
            let after = de_casteljau(&self.resolved, (eased + TANGENT_STEP).min(1.0));
            write_tangent(state, after - before);
        }
    }
}

// ===== Composite Bézier =====

/// One stitchable piece of a composite curve.
#[derive(Debug, Clone)]
pub struct BezierSegment {
    /// Control points, without the stitched start point.
    pub points: Vec<Vec2>,
    /// Seconds this segment takes.
    pub duration: f32,
    /// Easing applied within the segment.
    pub easing: Easing,
}

/// Composite mover chaining segments end to end.
#[derive(Debug, Clone)]
pub struct ChainBezierMover {
    segments: Vec<BezierSegment>,
    total_duration: f32,
    stitched: bool,
}

impl ChainBezierMover {
    /// Creates a chain over the authored segments.
    #[must_use]
    pub fn new(segments: Vec<BezierSegment>) -> Self {
        let total_duration = segments.iter().map(|s| s.duration).sum();
        Self {
            segments,
            total_duration,
            stitched: false,
        }
    }

    /// Total duration across all segments.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Stitches segment starts: the first from the current position, each
    /// later one from the previous segment's endpoint. Runs once.
    pub fn initialize(&mut self, state: &mut KinematicState, current_pos: Vec2) {
        state.position = current_pos;

        if !self.stitched && !self.segments.is_empty() {
            if !self.segments[0].points.is_empty() {
                self.segments[0].points.insert(0, current_pos);
            }
            for i in 1..self.segments.len() {
                if !self.segments[i].points.is_empty() && !self.segments[i - 1].points.is_empty() {
                    let prev_end = self.segments[i - 1].points[self.segments[i - 1].points.len() - 1];
                    self.segments[i].points.insert(0, prev_end);
                }
            }
            self.stitched = true;
        }

        state.elapsed_time = 0.0;
        state.is_initialized = true;
    }

    /// Selects the active segment by cumulative time and evaluates it.
    pub fn advance(&mut self, state: &mut KinematicState, dt: f32) {
        state.elapsed_time += dt;
        if self.segments.is_empty() {
            return;
        }

        let mut accumulated = 0.0;
        let mut index = self.segments.len() - 1;
        for (i, segment) in self.segments.iter().enumerate() {
            if state.elapsed_time < accumulated + segment.duration {
                index = i;
                break;
            }
            accumulated += segment.duration;
        }
        if state.elapsed_time >= self.total_duration {
            index = self.segments.len() - 1;
            accumulated = self.total_duration - self.segments[index].duration;
        }

        let segment = &self.segments[index];
        let t = ((state.elapsed_time - accumulated) / segment.duration).min(1.0);
        let eased = segment.easing.apply(t);

        state.position = de_casteljau(&segment.points, eased);

        if t < 1.0 {
            let before = de_casteljau(&segment.points, (eased - TANGENT_STEP).max(0.0));
            let after = de_casteljau(&segment.points, (eased + TANGENT_STEP).min(1.0));
            write_tangent(state, after - before);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_hits_endpoints() {
        let mut state = KinematicState::new();
        let mut mover = BezierMover::new(
            vec![Vec2::new(50.0, 80.0), Vec2::new(100.0, 0.0)],
            2.0,
            Easing::Linear,
        );
        mover.initialize(&mut state, Vec2::ZERO);
        assert_eq!(state.position, Vec2::ZERO);

        for _ in 0..200 {
            mover.advance(&mut state, 0.01);
        }
        assert!(state.position.distance(Vec2::new(100.0, 0.0)) < 1e-3);
    }

    #[test]
    fn test_start_point_not_duplicated_when_close() {
        let mut state = KinematicState::new();
        let mut mover = BezierMover::new(
            vec![Vec2::new(0.3, 0.0), Vec2::new(50.0, 80.0), Vec2::new(100.0, 0.0)],
            1.0,
            Easing::Linear,
        );
        mover.initialize(&mut state, Vec2::ZERO);
        // Authored start within one unit: still a quadratic, not a cubic.
        assert_eq!(mover.points.len(), 3);
    }

    #[test]
    fn test_free_bezier_resolves_dynamic_points_once() {
        let moving = std::sync::Arc::new(parking_lot::Mutex::new(Vec2::new(100.0, 100.0)));
        let shared = std::sync::Arc::clone(&moving);

        let mut state = KinematicState::new();
        let mut mover = FreeBezierMover::new(
            vec![
                ControlPoint::Fixed(Vec2::new(50.0, 0.0)),
                ControlPoint::Dynamic(TargetProvider::new(move || *shared.lock())),
            ],
            1.0,
            Easing::Linear,
        );
        mover.initialize(&mut state, Vec2::ZERO);

        // Moving the provider target after init must not bend the curve.
        *moving.lock() = Vec2::new(-500.0, -500.0);
        for _ in 0..100 {
            mover.advance(&mut state, 0.01);
        }
        assert!(state.position.distance(Vec2::new(100.0, 100.0)) < 1e-2);
    }

    #[test]
    fn test_free_bezier_tangent_frozen_at_endpoint() {
        let mut state = KinematicState::new();
        let mut mover = FreeBezierMover::new(
            vec![ControlPoint::Fixed(Vec2::new(100.0, 0.0))],
            1.0,
            Easing::Linear,
        );
        mover.initialize(&mut state, Vec2::ZERO);
        for _ in 0..150 {
            mover.advance(&mut state, 0.01);
        }
        let heading_at_end = state.heading;
        mover.advance(&mut state, 0.5);
        assert_eq!(state.heading, heading_at_end);
    }

    #[test]
    fn test_chain_stitches_segments() {
        let mut state = KinematicState::new();
        let mut mover = ChainBezierMover::new(vec![
            BezierSegment {
                points: vec![Vec2::new(50.0, 50.0), Vec2::new(100.0, 0.0)],
                duration: 1.0,
                easing: Easing::Linear,
            },
            BezierSegment {
                points: vec![Vec2::new(150.0, -50.0), Vec2::new(200.0, 0.0)],
                duration: 1.0,
                easing: Easing::Linear,
            },
        ]);
        assert!((mover.total_duration() - 2.0).abs() < 1e-6);

        mover.initialize(&mut state, Vec2::ZERO);
        // Second segment begins at the first segment's endpoint.
        assert_eq!(mover.segments[1].points[0], Vec2::new(100.0, 0.0));

        for _ in 0..250 {
            mover.advance(&mut state, 0.01);
        }
        assert!(state.position.distance(Vec2::new(200.0, 0.0)) < 1e-3);
    }

    proptest::proptest! {
        // De Casteljau must hit the first and last control points exactly
        // at the parameter extremes, for any order.
        #[test]
        fn prop_curve_endpoints_exact(
            points in proptest::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 1..6)
        ) {
            let points: Vec<Vec2> = points.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
            let first = points[0];
            let last = points[points.len() - 1];
            proptest::prop_assert_eq!(de_casteljau(&points, 0.0), first);
            // One lerp rounding step per reduction level at t = 1.
            proptest::prop_assert!(de_casteljau(&points, 1.0).distance(last) < 1e-3);
        }
    }

    #[test]
    fn test_chain_holds_past_total_duration() {
        let mut state = KinematicState::new();
        let mut mover = ChainBezierMover::new(vec![BezierSegment {
            points: vec![Vec2::new(10.0, 10.0)],
            duration: 0.5,
            easing: Easing::Linear,
        }]);
        mover.initialize(&mut state, Vec2::ZERO);
        for _ in 0..100 {
            mover.advance(&mut state, 0.05);
        }
        assert!(state.position.distance(Vec2::new(10.0, 10.0)) < 1e-3);
    }
}

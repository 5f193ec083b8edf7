//! Burst pattern generation.
//!
//! A [`DanmakuAction`] sits in an actor's fire queue and emits bursts of
//! projectiles on a fixed cadence. `update` only decides whether a burst is
//! due or the action is finished; the actual emission happens in [`fire`],
//! keeping the decide/act split of the action protocol.
//!
//! [`fire`]: DanmakuAction::fire

use crate::builder::LinearMotion;
use crate::kinematics::TargetProvider;
use crate::motion::{wrap_degrees, MotionAction, SPRITE_HEADING_OFFSET};
use crate::pool::ProjectilePool;
use crate::projectile::{Projectile, ShotKind};
use serde::{Deserialize, Serialize};
use starfall_common::Vec2;
use std::fmt;
use tracing::trace;

/// Burst layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirePattern {
    /// One projectile along the burst angle.
    Single,
    /// Evenly spaced full ring.
    Ring,
    /// Arc centered on the burst angle.
    Fan,
    /// Ring whose base angle advances every round.
    Spiral,
}

type MotionFactory = Box<dyn Fn() -> MotionAction + Send + Sync>;
type FinishPredicate = Box<dyn Fn() -> bool + Send + Sync>;

/// Fire-queue action emitting projectile bursts on a cadence.
pub struct DanmakuAction {
    kind: ShotKind,
    color: u16,
    pattern: FirePattern,
    count: u32,
    rounds: i32,
    round_interval: f32,
    elapsed: f32,
    current_round: u32,
    last_fire_time: f32,
    aim_at_target: bool,
    target_provider: Option<TargetProvider>,
    colors: Vec<u16>,
    color_cursor: Option<usize>,
    base_angle: f32,
    base_speed: f32,
    angle_step: f32,
    angle_per_round: f32,
    speed_variation: f32,
    position_offset: Vec2,
    fire_radius: f32,
    align_to_radius: bool,
    acceleration: f32,
    acceleration_duration: f32,
    motion_duration: f32,
    never_stop: bool,
    sync_rotation: bool,
    motion_factories: Vec<MotionFactory>,
    finish_when: Option<FinishPredicate>,
}

impl Default for DanmakuAction {
    fn default() -> Self {
        Self {
            kind: ShotKind::Rice,
            color: 1,
            pattern: FirePattern::Single,
            count: 1,
            rounds: 1,
            round_interval: 1.0,
            elapsed: 0.0,
            current_round: 0,
            last_fire_time: 0.0,
            aim_at_target: false,
            target_provider: None,
            colors: Vec::new(),
            color_cursor: None,
            base_angle: 0.0,
            base_speed: 200.0,
            angle_step: 0.0,
            angle_per_round: 0.0,
            speed_variation: 0.0,
            position_offset: Vec2::ZERO,
            fire_radius: 0.0,
            align_to_radius: true,
            acceleration: 0.0,
            acceleration_duration: -1.0,
            motion_duration: 10.0,
            never_stop: false,
            sync_rotation: false,
            motion_factories: Vec::new(),
            finish_when: None,
        }
    }
}

impl fmt::Debug for DanmakuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DanmakuAction")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern)
            .field("count", &self.count)
            .field("rounds", &self.rounds)
            .field("current_round", &self.current_round)
            .finish_non_exhaustive()
    }
}

impl DanmakuAction {
    /// Creates an action with defaults: one rice shot per second.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds fired so far.
    #[must_use]
    pub fn rounds_fired(&self) -> u32 {
        self.current_round
    }

    // ===== Fluent configuration =====

    /// Shot kind and palette color.
    pub fn shot(mut self, kind: ShotKind, color: u16) -> Self {
        self.kind = kind;
        self.color = color;
        self
    }

    /// Burst layout.
    pub fn pattern(mut self, pattern: FirePattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Projectiles per burst.
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Colors cycled once per burst.
    pub fn colors(mut self, colors: Vec<u16>) -> Self {
        self.colors = colors;
        self
    }

    /// Number of bursts and the interval between them.
    pub fn rounds(mut self, rounds: u32, interval: f32) -> Self {
        self.rounds = rounds as i32;
        self.round_interval = interval;
        self
    }

    /// Fires forever at the given interval.
    pub fn infinite_rounds(mut self, interval: f32) -> Self {
        self.rounds = -1;
        self.round_interval = interval;
        self
    }

    /// Interval between bursts, keeping the round count.
    pub fn interval(mut self, interval: f32) -> Self {
        self.round_interval = interval;
        self
    }

    /// Degrees added to the burst angle per round.
    pub fn rotate_per_round(mut self, degrees: f32) -> Self {
        self.angle_per_round = degrees;
        self
    }

    /// Base burst angle in degrees.
    pub fn direction(mut self, degrees: f32) -> Self {
        self.base_angle = degrees;
        self
    }

    /// Aims the burst at a dynamic target, resolved once per burst.
    pub fn at_target(mut self, provider: TargetProvider) -> Self {
        self.target_provider = Some(provider);
        self.aim_at_target = true;
        self
    }

    /// Aims each burst at the owning actor's aim provider, attached when
    /// the action is queued.
    pub fn at_aim(mut self) -> Self {
        self.aim_at_target = true;
        self
    }

    pub(crate) fn seed_target(&mut self, provider: &TargetProvider) {
        if self.target_provider.is_none() {
            self.target_provider = Some(provider.clone());
        }
    }

    /// Base projectile speed.
    pub fn speed(mut self, speed: f32) -> Self {
        self.base_speed = speed;
        self
    }

    /// Angular spacing within a burst, degrees. Zero derives it.
    pub fn angle_step(mut self, degrees: f32) -> Self {
        self.angle_step = degrees;
        self
    }

    /// Per-projectile speed spread across the burst.
    pub fn speed_variation(mut self, variation: f32) -> Self {
        self.speed_variation = variation;
        self
    }

    /// Displaces the emission point from the actor.
    pub fn offset(mut self, offset: Vec2) -> Self {
        self.position_offset = offset;
        self
    }

    /// Accelerates projectiles along their heading.
    pub fn accelerate(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Limits projectile acceleration to the first `duration` seconds.
    pub fn accelerate_during(mut self, duration: f32) -> Self {
        self.acceleration_duration = duration;
        self
    }

    /// Accelerated projectiles keep their motion unit forever.
    pub fn never_stop(mut self) -> Self {
        self.never_stop = true;
        self
    }

    /// Projectile sprites follow their heading.
    pub fn sync_rotation(mut self, enable: bool) -> Self {
        self.sync_rotation = enable;
        self
    }

    /// Attaches a motion unit factory invoked once per projectile.
    pub fn with_motion(mut self, factory: impl Fn() -> MotionAction + Send + Sync + 'static) -> Self {
        self.motion_factories.push(Box::new(factory));
        self
    }

    /// Drops every motion factory.
    pub fn clear_motions(mut self) -> Self {
        self.motion_factories.clear();
        self
    }

    /// Emits from a circle of `radius` around the emission point.
    pub fn fire_from_radius(mut self, radius: f32) -> Self {
        self.fire_radius = radius;
        self
    }

    /// Whether fan projectiles emit from their own angle on the circle or
    /// from the single center-angle point.
    pub fn align_to_radius(mut self, align: bool) -> Self {
        self.align_to_radius = align;
        self
    }

    /// Finishes the action as soon as the predicate returns true.
    pub fn finish_when(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.finish_when = Some(Box::new(predicate));
        self
    }

    /// Seals the configuration into a queueable action.
    #[must_use]
    pub fn build(self) -> crate::actor::Action {
        crate::actor::Action::Fire(self)
    }

    // ===== Action protocol =====

    /// Advances the cadence clock. Returns true when the action is finished.
    pub fn update(&mut self, dt: f32) -> bool {
        self.elapsed += dt;

        if let Some(predicate) = &self.finish_when {
            if predicate() {
                return true;
            }
        }

        if (self.rounds == -1 || (self.current_round as i32) < self.rounds)
            && self.elapsed >= self.last_fire_time + self.round_interval
        {
            // A burst is due; fire happens on the apply side.
            return false;
        }

        self.rounds != -1 && self.current_round as i32 >= self.rounds
    }

    /// Emits one burst into `out` when a burst is due, checking projectiles
    /// out of `pool`. No-op otherwise.
    pub fn fire(&mut self, origin: Vec2, pool: &ProjectilePool, out: &mut Vec<Projectile>) {
        if self.rounds != -1 && self.current_round as i32 >= self.rounds {
            return;
        }
        if self.elapsed < self.last_fire_time + self.round_interval {
            return;
        }

        let emit_from = origin + self.position_offset;

        // Aim is resolved once per burst, never per projectile.
        if self.aim_at_target {
            if let Some(provider) = &self.target_provider {
                let to_target = provider.resolve() - origin;
                self.base_angle = to_target.to_degrees();
            }
        }

        // Each round is offset by exactly round * rotate_per_round from the
        // configured base; the base itself is never mutated.
        let burst_angle = self.base_angle + self.angle_per_round * self.current_round as f32;

        if !self.colors.is_empty() {
            let next = self.color_cursor.map_or(0, |c| (c + 1) % self.colors.len());
            self.color_cursor = Some(next);
            self.color = self.colors[next];
        }

        match self.pattern {
            FirePattern::Single => self.fire_single(emit_from, burst_angle, pool, out),
            FirePattern::Ring => self.fire_ring(emit_from, burst_angle, pool, out),
            FirePattern::Fan => self.fire_fan(emit_from, burst_angle, pool, out),
            FirePattern::Spiral => self.fire_spiral(emit_from, burst_angle, pool, out),
        }

        trace!(
            round = self.current_round,
            count = self.count,
            pattern = ?self.pattern,
            "fired burst"
        );

        self.current_round += 1;
        self.last_fire_time = self.elapsed;
    }

    // ===== Burst layouts =====

    fn radius_point(&self, from: Vec2, degrees: f32) -> Vec2 {
        if self.fire_radius > 0.0 {
            from + Vec2::from_degrees(degrees) * self.fire_radius
        } else {
            from
        }
    }

    fn spawn_one(
        &self,
        pool: &ProjectilePool,
        out: &mut Vec<Projectile>,
        position: Vec2,
        angle: f32,
        speed: f32,
    ) {
        let mut shot = pool.checkout(self.kind, self.color, position, angle, speed);
        shot.transform.rotation = wrap_degrees(angle - SPRITE_HEADING_OFFSET);
        shot.sync_rotation = self.sync_rotation;

        if self.acceleration != 0.0 {
            let motion = LinearMotion::new()
                .direction(angle)
                .speed(speed)
                .accelerate(self.acceleration)
                .accelerate_during(self.acceleration_duration);
            let motion = if self.never_stop {
                motion.never_stop()
            } else {
                motion.stop_after(self.motion_duration)
            };
            shot.add_motion(motion.build_projectile());
        } else {
            for factory in &self.motion_factories {
                shot.add_motion(factory());
            }
        }

        out.push(shot);
    }

    fn fire_single(
        &self,
        from: Vec2,
        burst_angle: f32,
        pool: &ProjectilePool,
        out: &mut Vec<Projectile>,
    ) {
        let position = self.radius_point(from, burst_angle);
        self.spawn_one(pool, out, position, burst_angle, self.base_speed);
    }

    fn fire_ring(
        &self,
        from: Vec2,
        burst_angle: f32,
        pool: &ProjectilePool,
        out: &mut Vec<Projectile>,
    ) {
        let step = if self.angle_step > 0.0 {
            self.angle_step
        } else {
            360.0 / self.count as f32
        };

        for i in 0..self.count {
            let angle = burst_angle + step * i as f32;
            let speed =
                self.base_speed + self.speed_variation * (i as f32 - self.count as f32 / 2.0);
            let position = self.radius_point(from, angle);
            self.spawn_one(pool, out, position, angle, speed);
        }
    }

    fn fire_fan(
        &self,
        from: Vec2,
        burst_angle: f32,
        pool: &ProjectilePool,
        out: &mut Vec<Projectile>,
    ) {
        if self.count <= 1 {
            self.fire_single(from, burst_angle, pool, out);
            return;
        }

        let total = self.angle_step * (self.count - 1) as f32;
        let start = burst_angle - total / 2.0;

        for i in 0..self.count {
            let angle = start + self.angle_step * i as f32;
            let speed =
                self.base_speed + self.speed_variation * (i as f32 - self.count as f32 / 2.0);
            let position = if self.align_to_radius {
                self.radius_point(from, angle)
            } else {
                self.radius_point(from, burst_angle)
            };
            self.spawn_one(pool, out, position, angle, speed);
        }
    }

    fn fire_spiral(
        &self,
        from: Vec2,
        burst_angle: f32,
        pool: &ProjectilePool,
        out: &mut Vec<Projectile>,
    ) {
        let step = 360.0 / self.count as f32;
        for i in 0..self.count {
            let angle = burst_angle + step * i as f32;
            let position = self.radius_point(from, angle);
            self.spawn_one(pool, out, position, angle, self.base_speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn fire_due_burst(action: &mut DanmakuAction, pool: &ProjectilePool) -> Vec<Projectile> {
        // Advance exactly one interval, then emit.
        let mut out = Vec::new();
        action.update(action.round_interval);
        action.fire(Vec2::ZERO, pool, &mut out);
        out
    }

    fn headings(shots: &[Projectile]) -> Vec<f32> {
        shots.iter().map(Projectile::heading).collect()
    }

    #[test]
    fn test_fan_is_symmetric_around_base() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new()
            .pattern(FirePattern::Fan)
            .count(5)
            .angle_step(10.0)
            .direction(90.0);

        let shots = fire_due_burst(&mut action, &pool);
        let angles = headings(&shots);
        assert_eq!(angles, vec![70.0, 80.0, 90.0, 100.0, 110.0]);
    }

    #[test]
    fn test_single_shot_fan_degrades() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new()
            .pattern(FirePattern::Fan)
            .count(1)
            .direction(45.0);
        let shots = fire_due_burst(&mut action, &pool);
        assert_eq!(headings(&shots), vec![45.0]);
    }

    #[test]
    fn test_ring_spacing_and_speed_spread() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new()
            .pattern(FirePattern::Ring)
            .count(4)
            .speed(100.0)
            .speed_variation(10.0);

        let shots = fire_due_burst(&mut action, &pool);
        assert_eq!(headings(&shots), vec![0.0, 90.0, 180.0, 270.0]);
        let speeds: Vec<f32> = shots.iter().map(Projectile::speed).collect();
        assert_eq!(speeds, vec![80.0, 90.0, 100.0, 110.0]);
    }

    #[test]
    fn test_spiral_round_offset_is_exact_multiple() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new()
            .pattern(FirePattern::Spiral)
            .count(4)
            .rounds(3, 0.1)
            .rotate_per_round(15.0);

        for round in 0..3u32 {
            let shots = fire_due_burst(&mut action, &pool);
            let expected = 15.0 * round as f32;
            assert!(
                (shots[0].heading() - expected).abs() < 1e-4,
                "round {round} fired at {}",
                shots[0].heading()
            );
        }
    }

    #[test]
    fn test_aim_resolved_once_per_burst() {
        let pool = ProjectilePool::default();
        let target = Arc::new(parking_lot::Mutex::new(Vec2::new(100.0, 0.0)));
        let shared = Arc::clone(&target);

        let mut action = DanmakuAction::new()
            .pattern(FirePattern::Single)
            .rounds(2, 0.1)
            .at_target(TargetProvider::new(move || *shared.lock()));

        let first = fire_due_burst(&mut action, &pool);
        assert!((first[0].heading() - 0.0).abs() < 1e-4);

        // The next burst re-aims at the moved target.
        *target.lock() = Vec2::new(0.0, 50.0);
        let second = fire_due_burst(&mut action, &pool);
        assert!((second[0].heading() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_colors_cycle_once_per_burst() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new()
            .pattern(FirePattern::Ring)
            .count(3)
            .rounds(4, 0.1)
            .colors(vec![1, 2, 3]);

        let mut seen = Vec::new();
        for _ in 0..4 {
            let shots = fire_due_burst(&mut action, &pool);
            // Every projectile in a burst shares the burst color.
            assert!(shots.iter().all(|s| s.color == shots[0].color));
            seen.push(shots[0].color);
        }
        assert_eq!(seen, vec![1, 2, 3, 1]);
    }

    #[test]
    fn test_not_due_fire_is_noop() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new().rounds(1, 1.0);
        let mut out = Vec::new();

        action.update(0.5);
        action.fire(Vec2::ZERO, &pool, &mut out);
        assert!(out.is_empty());
        assert_eq!(action.rounds_fired(), 0);
    }

    #[test]
    fn test_finite_rounds_complete() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new().rounds(2, 0.5);
        let mut out = Vec::new();

        let mut done = false;
        for _ in 0..40 {
            done = action.update(0.1);
            if done {
                break;
            }
            action.fire(Vec2::ZERO, &pool, &mut out);
        }
        assert!(done);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_infinite_rounds_until_finish_predicate() {
        let pool = ProjectilePool::default();
        let flag = Arc::new(AtomicBool::new(false));
        let shared = Arc::clone(&flag);

        let mut action = DanmakuAction::new()
            .infinite_rounds(0.2)
            .finish_when(move || shared.load(Ordering::Relaxed));
        let mut out = Vec::new();

        for _ in 0..10 {
            assert!(!action.update(0.2));
            action.fire(Vec2::ZERO, &pool, &mut out);
        }
        assert!(out.len() >= 9);

        flag.store(true, Ordering::Relaxed);
        assert!(action.update(0.2));
    }

    #[test]
    fn test_fire_radius_offsets_emission() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new()
            .pattern(FirePattern::Single)
            .direction(0.0)
            .fire_from_radius(30.0);

        let shots = fire_due_burst(&mut action, &pool);
        assert_eq!(shots[0].transform.position, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_acceleration_attaches_motion() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new()
            .pattern(FirePattern::Single)
            .accelerate(50.0)
            .accelerate_during(2.0);

        let shots = fire_due_burst(&mut action, &pool);
        assert_eq!(shots[0].motion_count(), 1);
    }

    #[test]
    fn test_motion_factory_runs_per_projectile() {
        let pool = ProjectilePool::default();
        let mut action = DanmakuAction::new()
            .pattern(FirePattern::Ring)
            .count(3)
            .with_motion(|| {
                LinearMotion::new()
                    .direction(270.0)
                    .speed(40.0)
                    .build_projectile()
            });

        let shots = fire_due_burst(&mut action, &pool);
        assert!(shots.iter().all(|s| s.motion_count() == 1));
    }
}

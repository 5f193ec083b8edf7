//! Pooled projectiles.
//!
//! A [`Projectile`] is a flat, reusable record: shot kind, palette color,
//! transform, heading/speed, and a FIFO queue of motion units. While the
//! queue has a head unit the unit drives the projectile; once the queue
//! drains the projectile keeps flying straight from its last heading and
//! speed.

use crate::actor::Transform;
use crate::motion::{wrap_degrees, MotionAction, MotionTarget, SPRITE_HEADING_OFFSET};
use serde::{Deserialize, Serialize};
use starfall_common::Vec2;
use std::collections::VecDeque;

/// Parking spot for checked-in projectiles, far outside any play field.
pub const PARKED_POSITION: Vec2 = Vec2 {
    x: -1000.0,
    y: -1000.0,
};

/// Sprite sheets are drawn at double scale; collision radii scale with them.
const SPRITE_SCALE: f32 = 2.0;

/// Shot sprite families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotKind {
    /// Small round pellet.
    Pellet,
    /// Tiny dot.
    Dot,
    /// Rice grain.
    Rice,
    /// Kunai blade.
    Kunai,
    /// Crystal shard.
    Shard,
    /// Talisman seal.
    Seal,
    /// Throwing knife.
    Knife,
    /// Large orb.
    Orb,
    /// Oversized bubble.
    Bubble,
    /// Heavy droplet.
    Droplet,
}

impl ShotKind {
    /// Base collision radius in texture units.
    #[must_use]
    pub fn base_radius(self) -> f32 {
        match self {
            Self::Dot => 2.0,
            Self::Pellet | Self::Kunai => 2.4,
            Self::Shard => 2.8,
            Self::Seal => 3.2,
            Self::Rice | Self::Knife => 4.0,
            Self::Droplet => 7.0,
            Self::Orb => 12.0,
            Self::Bubble => 14.0,
        }
    }

    /// Collision radius in world units.
    #[must_use]
    pub fn collision_radius(self) -> f32 {
        self.base_radius() * SPRITE_SCALE
    }

    /// Looks up a kind from its raw sprite-table index.
    #[must_use]
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Pellet),
            2 => Some(Self::Rice),
            3 => Some(Self::Orb),
            5 => Some(Self::Dot),
            6 => Some(Self::Kunai),
            7 => Some(Self::Knife),
            10 => Some(Self::Shard),
            13 => Some(Self::Seal),
            19 => Some(Self::Bubble),
            20 => Some(Self::Droplet),
            _ => None,
        }
    }
}

/// One live or pooled projectile.
#[derive(Debug)]
pub struct Projectile {
    /// Sprite family.
    pub kind: ShotKind,
    /// Palette index within the sprite family.
    pub color: u16,
    /// Drawable transform.
    pub transform: Transform,
    /// Collision radius in world units.
    pub collision_radius: f32,
    /// Sprite rotation follows the heading when set.
    pub sync_rotation: bool,
    heading: f32,
    speed: f32,
    motions: VecDeque<MotionAction>,
    graze_clock: f32,
}

impl Projectile {
    /// Creates a live projectile.
    #[must_use]
    pub fn new(kind: ShotKind, color: u16, position: Vec2, heading: f32, speed: f32) -> Self {
        Self {
            kind,
            color,
            transform: Transform::at(position),
            collision_radius: kind.collision_radius(),
            sync_rotation: false,
            heading,
            speed,
            motions: VecDeque::new(),
            graze_clock: 0.0,
        }
    }

    /// Current heading in degrees.
    #[must_use]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Current scalar speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Number of queued motion units.
    #[must_use]
    pub fn motion_count(&self) -> usize {
        self.motions.len()
    }

    /// Queues a motion unit.
    pub fn add_motion(&mut self, motion: MotionAction) {
        self.motions.push_back(motion);
    }

    /// Drops every queued motion unit.
    pub fn clear_motions(&mut self) {
        self.motions.clear();
    }

    /// Whether the graze cooldown has elapsed.
    #[must_use]
    pub fn can_graze(&self, cooldown: f32) -> bool {
        self.graze_clock >= cooldown
    }

    /// Restarts the graze cooldown.
    pub fn record_graze(&mut self) {
        self.graze_clock = 0.0;
    }

    /// Re-arms a pooled record as a fresh projectile.
    pub fn reset(&mut self, kind: ShotKind, color: u16, position: Vec2, heading: f32, speed: f32) {
        self.kind = kind;
        self.color = color;
        self.transform = Transform::at(position);
        self.collision_radius = kind.collision_radius();
        self.sync_rotation = false;
        self.heading = heading;
        self.speed = speed;
        self.motions.clear();
        self.graze_clock = 0.0;
    }

    /// Parks the record off-screen for pooling.
    pub fn park(&mut self) {
        self.motions.clear();
        self.transform.position = PARKED_POSITION;
        self.transform.visible = false;
        self.speed = 0.0;
    }

    /// Advances one frame: head motion unit first, straight flight otherwise.
    pub fn update(&mut self, dt: f32) {
        self.graze_clock += dt;
        self.update_motions(dt);

        if self.motions.is_empty() {
            let velocity = Vec2::from_degrees(self.heading) * self.speed;
            self.transform.position += velocity * dt;
        }

        if self.sync_rotation {
            self.transform.rotation = wrap_degrees(self.heading - SPRITE_HEADING_OFFSET);
        }
    }

    fn update_motions(&mut self, dt: f32) {
        // Apply before update so a freshly queued unit initializes from the
        // projectile's real position. A completed unit is dropped and the
        // next one starts on the following frame.
        if let Some(mut head) = self.motions.pop_front() {
            head.apply(self);
            if !head.update(dt) {
                self.motions.push_front(head);
            }
        }
    }
}

impl MotionTarget for Projectile {
    fn position(&self) -> Vec2 {
        self.transform.position
    }
    fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
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
        self.transform.rotation = rotation;
    }
    fn wants_rotation_sync(&self) -> bool {
        self.sync_rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::LinearMotion;

    #[test]
    fn test_fallback_straight_flight() {
        let mut shot = Projectile::new(ShotKind::Pellet, 0, Vec2::ZERO, 90.0, 100.0);
        for _ in 0..10 {
            shot.update(0.1);
        }
        assert!(shot.transform.position.x.abs() < 0.01);
        assert!((shot.transform.position.y - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_rotation_sync_matches_on_both_paths() {
        let mut driven = Projectile::new(ShotKind::Rice, 1, Vec2::ZERO, 180.0, 50.0);
        driven.sync_rotation = true;
        driven.add_motion(
            LinearMotion::new()
                .direction(180.0)
                .speed(50.0)
                .build_projectile(),
        );
        driven.update(0.1);
        let motion_rotation = driven.transform.rotation;

        let mut free = Projectile::new(ShotKind::Rice, 1, Vec2::ZERO, 180.0, 50.0);
        free.sync_rotation = true;
        free.update(0.1);

        assert_eq!(motion_rotation, free.transform.rotation);
        assert_eq!(motion_rotation, 90.0);
    }

    #[test]
    fn test_continues_straight_after_motion_completes() {
        let mut shot = Projectile::new(ShotKind::Kunai, 0, Vec2::ZERO, 0.0, 0.0);
        shot.add_motion(
            LinearMotion::new()
                .direction(90.0)
                .speed(60.0)
                .stop_after(0.5)
                .build_projectile(),
        );

        for _ in 0..5 {
            shot.update(0.1);
        }
        assert_eq!(shot.motion_count(), 0);

        // The last written heading and speed carry into free flight.
        let y_before = shot.transform.position.y;
        shot.update(0.1);
        assert!((shot.transform.position.y - y_before - 6.0).abs() < 0.01);
    }

    #[test]
    fn test_graze_cooldown() {
        let mut shot = Projectile::new(ShotKind::Orb, 2, Vec2::ZERO, 0.0, 10.0);
        assert!(!shot.can_graze(0.5));
        for _ in 0..6 {
            shot.update(0.1);
        }
        assert!(shot.can_graze(0.5));
        shot.record_graze();
        assert!(!shot.can_graze(0.5));
    }

    #[test]
    fn test_reset_rearms_record() {
        let mut shot = Projectile::new(ShotKind::Bubble, 3, Vec2::new(50.0, 50.0), 45.0, 30.0);
        shot.add_motion(LinearMotion::new().direction(0.0).build_projectile());
        shot.park();
        assert_eq!(shot.transform.position, PARKED_POSITION);
        assert!(!shot.transform.visible);

        shot.reset(ShotKind::Dot, 0, Vec2::ZERO, 90.0, 80.0);
        assert_eq!(shot.kind, ShotKind::Dot);
        assert_eq!(shot.collision_radius, ShotKind::Dot.collision_radius());
        assert_eq!(shot.motion_count(), 0);
        assert!(shot.transform.visible);
    }

    #[test]
    fn test_kind_lookup() {
        assert_eq!(ShotKind::from_raw(19), Some(ShotKind::Bubble));
        assert_eq!(ShotKind::from_raw(200), None);
        assert!((ShotKind::Bubble.collision_radius() - 28.0).abs() < 1e-6);
    }
}

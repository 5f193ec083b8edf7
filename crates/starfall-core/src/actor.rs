//! Actors, action queues, and the play field.
//!
//! An [`Actor`] owns four action slots: a FIFO motion queue, a FIFO fire
//! queue, a single spawn slot, and a single death slot. Each tick drives the
//! spawn slot exclusively when present, otherwise the head of each FIFO
//! queue, then the actor's projectiles. Bursts emitted during the tick are
//! appended after the projectile pass, so a new projectile's first apply
//! runs on the following tick with a full frame step.

use crate::danmaku::DanmakuAction;
use crate::kinematics::TargetProvider;
use crate::motion::{AwaitAction, MotionAction, MotionTarget};
use crate::pool::ProjectilePool;
use crate::projectile::Projectile;
use serde::{Deserialize, Serialize};
use starfall_common::{ActorId, Vec2};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Drawable surface: where, how rotated, and whether to draw at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position.
    pub position: Vec2,
    /// Sprite rotation in degrees.
    pub rotation: f32,
    /// Whether the sprite is drawn.
    pub visible: bool,
}

impl Transform {
    /// Visible, unrotated transform at `position`.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            visible: true,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

/// Culling bounds for projectiles, with a margin past the visible screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// Extra border kept alive outside the visible area.
    pub margin: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            width: 896.0,
            height: 960.0,
            margin: 50.0,
        }
    }
}

impl PlayField {
    /// Whether a point is inside the field including the margin.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= -self.margin
            && point.x <= self.width + self.margin
            && point.y >= -self.margin
            && point.y <= self.height + self.margin
    }
}

/// Which slot an action is queued into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    /// FIFO queue driving the actor's own movement.
    Motion,
    /// FIFO queue emitting projectile bursts.
    Fire,
    /// Single slot run exclusively before anything else.
    Spawn,
    /// Single slot run when the actor dies, or as a lifetime timer.
    Death,
}

/// Actor roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// Regular stage enemy.
    Normal,
    /// Boss with phase scripting layered on top.
    Boss,
    /// Invisible, unhittable burst source.
    Emitter,
}

/// Anything an actor can queue.
#[derive(Debug)]
pub enum Action {
    /// Drives the owner along a trajectory.
    Motion(MotionAction),
    /// Pauses the queue for a fixed time.
    Await(AwaitAction),
    /// Emits projectile bursts on a cadence.
    Fire(DanmakuAction),
}

/// Movable body of an actor.
#[derive(Debug, Clone)]
pub struct ActorBody {
    /// Drawable transform.
    pub transform: Transform,
    heading: f32,
    speed: f32,
}

impl ActorBody {
    fn at(position: Vec2) -> Self {
        Self {
            transform: Transform::at(position),
            heading: 0.0,
            speed: 0.0,
        }
    }
}

impl MotionTarget for ActorBody {
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
}

/// One scripted entity: enemy, boss, or emitter.
#[derive(Debug)]
pub struct Actor {
    /// Unique id.
    pub id: ActorId,
    /// Role.
    pub kind: ActorKind,
    /// Movable body.
    pub body: ActorBody,
    /// Current hit points.
    pub hp: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// Whether projectiles owned by this actor are reclaimed on death.
    pub clear_shots_on_death: bool,
    hittable: bool,
    motion_queue: VecDeque<Action>,
    fire_queue: VecDeque<Action>,
    spawn_action: Option<Action>,
    death_action: Option<Action>,
    projectiles: Vec<Projectile>,
    aim: Option<TargetProvider>,
    live: Arc<AtomicBool>,
    parent_liveness: Option<Arc<AtomicBool>>,
}

impl Actor {
    /// Creates a live actor at `position`.
    #[must_use]
    pub fn new(kind: ActorKind, position: Vec2, hp: f32) -> Self {
        Self {
            id: ActorId::new(),
            kind,
            body: ActorBody::at(position),
            hp,
            max_hp: hp,
            clear_shots_on_death: false,
            hittable: kind != ActorKind::Emitter,
            motion_queue: VecDeque::new(),
            fire_queue: VecDeque::new(),
            spawn_action: None,
            death_action: None,
            projectiles: Vec::new(),
            aim: None,
            live: Arc::new(AtomicBool::new(true)),
            parent_liveness: None,
        }
    }

    /// Creates an invisible, unhittable burst source.
    #[must_use]
    pub fn emitter(position: Vec2) -> Self {
        let mut actor = Self::new(ActorKind::Emitter, position, 1.0);
        actor.body.transform.visible = false;
        actor
    }

    /// Whether the actor is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }

    /// Whether the actor can be removed: dead with all queues drained.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.is_alive() && self.motion_queue.is_empty() && self.fire_queue.is_empty()
    }

    /// Whether hits land right now. Spawning and dead actors are immune,
    /// emitters always.
    #[must_use]
    pub fn is_hittable(&self) -> bool {
        self.hittable && self.spawn_action.is_none() && self.is_alive()
    }

    /// Liveness token other actors can observe.
    #[must_use]
    pub fn liveness(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.live)
    }

    /// Finishes this actor when `token` goes dead.
    pub fn bind_lifetime_to(&mut self, token: Arc<AtomicBool>) {
        self.parent_liveness = Some(token);
    }

    /// Kills the actor after `seconds`, via an await in the death slot.
    pub fn set_lifetime(&mut self, seconds: f32) {
        self.death_action = Some(Action::Await(AwaitAction::new(seconds)));
    }

    /// Projectiles currently owned by this actor.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Sets the provider burst actions aim with.
    pub fn set_aim_provider(&mut self, provider: TargetProvider) {
        self.aim = Some(provider);
    }

    /// Starts a burst action; seal it with `build` and queue via
    /// [`add_action`](Self::add_action). The actor's aim provider is
    /// attached when the action does not carry its own.
    #[must_use]
    pub fn shoot(&self) -> DanmakuAction {
        let mut action = DanmakuAction::new();
        if let Some(aim) = &self.aim {
            action.seed_target(aim);
        }
        action
    }

    /// Queues an action into the given slot.
    pub fn add_action(&mut self, action: Action, kind: QueueKind) {
        match kind {
            QueueKind::Motion => self.motion_queue.push_back(action),
            QueueKind::Fire => self.fire_queue.push_back(action),
            QueueKind::Spawn => self.spawn_action = Some(action),
            QueueKind::Death => self.death_action = Some(action),
        }
    }

    /// Pauses both FIFO queues for `seconds`.
    pub fn add_await(&mut self, seconds: f32) {
        self.motion_queue
            .push_back(Action::Await(AwaitAction::new(seconds)));
        self.fire_queue
            .push_back(Action::Await(AwaitAction::new(seconds)));
    }

    /// Drops every queued action. The spawn and death slots are kept.
    pub fn clear_actions(&mut self) {
        self.motion_queue.clear();
        self.fire_queue.clear();
    }

    /// Applies damage. Reaching zero kills the actor.
    pub fn on_hit(&mut self, damage: f32, pool: &ProjectilePool) {
        if !self.is_hittable() {
            return;
        }
        self.hp -= damage;
        if self.hp <= 0.0 {
            self.die(pool);
        }
    }

    fn die(&mut self, pool: &ProjectilePool) {
        if !self.live.swap(false, Ordering::Relaxed) {
            return;
        }
        debug!(id = self.id.raw(), "actor died");
        self.hittable = false;
        self.body.transform.visible = false;
        self.clear_actions();
        if self.clear_shots_on_death {
            for shot in self.projectiles.drain(..) {
                pool.checkin(shot);
            }
        }
        // A non-await death action runs as a final fire script.
        if let Some(action) = self.death_action.take() {
            if matches!(action, Action::Fire(_)) {
                self.fire_queue.push_back(action);
            }
        }
    }

    /// Advances one frame.
    pub fn update(&mut self, dt: f32, pool: &ProjectilePool, field: &PlayField) {
        let mut pending: Vec<Projectile> = Vec::new();

        if let Some(action) = &mut self.spawn_action {
            // The spawn slot blocks everything else while present.
            let done = match action {
                Action::Motion(m) => {
                    m.apply(&mut self.body);
                    m.update(dt)
                }
                Action::Await(a) => {
                    a.apply(&mut self.body);
                    a.update(dt)
                }
                Action::Fire(f) => {
                    if f.update(dt) {
                        true
                    } else {
                        f.fire(self.body.transform.position, pool, &mut pending);
                        false
                    }
                }
            };
            if done {
                self.spawn_action = None;
            }
        } else if self.is_alive() || !self.is_finished() {
            self.drive_motion_head(dt);
            self.drive_fire_head(dt, pool, &mut pending);
            self.drive_death_slot(dt, pool);
        }

        if let Some(parent) = &self.parent_liveness {
            if !parent.load(Ordering::Relaxed) {
                self.die(pool);
            }
        }

        let mut i = 0;
        while i < self.projectiles.len() {
            self.projectiles[i].update(dt);
            if field.contains(self.projectiles[i].transform.position) {
                i += 1;
            } else {
                let shot = self.projectiles.swap_remove(i);
                pool.checkin(shot);
            }
        }

        // First apply of a fresh burst happens next tick.
        self.projectiles.append(&mut pending);

        if self.is_alive()
            && self.kind != ActorKind::Emitter
            && self.motion_queue.is_empty()
            && self.fire_queue.is_empty()
            && self.death_action.is_none()
        {
            self.body.transform.visible = false;
            self.hittable = false;
        }
    }

    fn drive_motion_head(&mut self, dt: f32) {
        let Some(head) = self.motion_queue.front_mut() else {
            return;
        };
        let done = match head {
            Action::Motion(m) => {
                m.apply(&mut self.body);
                m.update(dt)
            }
            Action::Await(a) => {
                a.apply(&mut self.body);
                a.update(dt)
            }
            // Fire actions do not belong here; drop them.
            Action::Fire(_) => true,
        };
        if done {
            self.motion_queue.pop_front();
        }
    }

    fn drive_fire_head(&mut self, dt: f32, pool: &ProjectilePool, pending: &mut Vec<Projectile>) {
        let Some(head) = self.fire_queue.front_mut() else {
            return;
        };
        let done = match head {
            Action::Fire(f) => {
                if f.update(dt) {
                    true
                } else {
                    f.fire(self.body.transform.position, pool, pending);
                    false
                }
            }
            Action::Await(a) => {
                // Gates the queue without parking the body.
                a.start();
                a.update(dt)
            }
            Action::Motion(_) => true,
        };
        if done {
            self.fire_queue.pop_front();
        }
    }

    fn drive_death_slot(&mut self, dt: f32, pool: &ProjectilePool) {
        let expired = match &mut self.death_action {
            Some(Action::Await(a)) => {
                a.start();
                a.update(dt)
            }
            _ => false,
        };
        if expired {
            self.death_action = None;
            self.die(pool);
        }
    }
}

//! # Starfall Core
//!
//! Procedural motion and bullet-pattern generation for Starfall.
//!
//! This crate provides the simulation layer under the stage scripts:
//! - Kinematic state and trajectory evaluators (linear, orbital, wave, Bézier)
//! - Stop conditions composing into termination predicates
//! - Fluent motion builders producing queueable actions
//! - Burst pattern generation (single, ring, fan, spiral)
//! - Pooled projectiles and the actors that own them
//!
//! Everything here is deterministic and render-agnostic: a fixed sequence of
//! frame steps produces the same trajectories and bursts every run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod bezier;
pub mod builder;
pub mod danmaku;
pub mod ease;
pub mod kinematics;
pub mod linear;
pub mod motion;
pub mod orbit;
pub mod pool;
pub mod projectile;
pub mod stop;
pub mod wave;

/// Convenient imports for stage scripts.
pub mod prelude {
    pub use crate::actor::{Action, Actor, ActorKind, PlayField, QueueKind, Transform};
    pub use crate::builder::{
        BezierMotion, ChainBezierMotion, CircularMotion, EllipticalMotion, FreeBezierMotion,
        LinearMotion, WaveMotion,
    };
    pub use crate::danmaku::{DanmakuAction, FirePattern};
    pub use crate::ease::Easing;
    pub use crate::kinematics::{KinematicState, TargetProvider};
    pub use crate::motion::{AwaitAction, MotionAction, MotionTarget};
    pub use crate::pool::ProjectilePool;
    pub use crate::projectile::{Projectile, ShotKind};
    pub use crate::stop::StopCondition;
    pub use starfall_common::prelude::*;
}

pub use prelude::*;

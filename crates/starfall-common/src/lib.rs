//! # Starfall Common
//!
//! Common types and shared abstractions for the Starfall engine.
//!
//! This crate provides foundational types used across all Starfall subsystems:
//! - 2D vector math (`Vec2`)
//! - ID types (`ActorId`)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod vec;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::vec::*;
}

pub use prelude::*;

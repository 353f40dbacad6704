//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Physics in per-tick units; measured time only drives the beat clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod beat;
pub mod collision;
pub mod field;
pub mod particles;
pub mod scroll;
pub mod session;
pub mod state;
pub mod tick;
pub mod tuning;

pub use beat::BeatClock;
pub use collision::{Aabb, first_fatal, spheres_touch};
pub use field::{CollectibleField, ObstacleField};
pub use scroll::{Viewport, WorldScroller};
pub use session::{Command, RunOutcome, Session};
pub use state::{
    Ball, Collectible, GameEvent, GamePhase, GameState, Obstacle, ObstacleShape, Particle, TrailPoint,
    MAX_PARTICLES,
};
pub use tick::{TickInput, tick};
pub use tuning::{Tuning, Variant};

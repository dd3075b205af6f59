//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed order of collision resolution
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;
pub mod torus;

pub use state::{
    Asteroid, Body, GameMode, GamePhase, GameState, Player, Projectile, SizeClass, SpeedClass,
    kill_award,
};
pub use tick::{PlayerInput, TickInput, tick};
pub use torus::{torus_distance, wrap_index, wrap_position};

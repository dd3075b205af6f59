//! Cosmo Blast - a toroidal-field Asteroids clone
//!
//! Core modules:
//! - `sim`: Deterministic simulation (toroidal physics, collisions, game state)
//! - `render`: Software rasterizer writing into a host-supplied pixel buffer
//! - `platform`: Host input/window abstraction
//! - `settings`: Data-driven game rules and balance
//! - `app`: Frame-loop facade tying input, simulation, and drawing together

pub mod app;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use app::App;
pub use settings::Rules;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Field dimensions in pixels; the plane wraps at both edges
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Player ship
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const ROTATION_SPEED: f32 = 2.0;
    pub const ACCELERATION: f32 = 50.0;
    pub const MAX_SPEED: f32 = 120.0;
    pub const START_LIVES: u32 = 3;
    pub const SHOOT_COOLDOWN: f32 = 0.7;
    pub const INVINCIBLE_TIME: f32 = 3.0;

    /// Projectiles
    pub const PROJECTILE_RADIUS: f32 = 3.0;
    pub const PROJECTILE_SPEED: f32 = 200.0;
    pub const PROJECTILE_LIFETIME: f32 = 3.0;

    /// Fresh asteroids never spawn closer than this to a player spawn point
    pub const NO_SPAWN_RADIUS: f32 = 300.0;

    /// Win bonuses
    pub const LIFE_BONUS: u64 = 5000;
    pub const TIME_BUDGET_SECS: u32 = 1000;
    pub const BONUS_PER_SECOND: u64 = 100;
}

/// Normalize an angle into [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let a = angle % TAU;
    if a < 0.0 { a + TAU } else { a }
}

/// Unit vector pointing along a heading angle
#[inline]
pub fn heading_vec(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

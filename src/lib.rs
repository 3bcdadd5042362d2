//! Galactic Rage - a wave-based arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, collisions, per-frame step)
//! - `session`: Session controller (start/pause/resume/end, command entry points)
//! - `schedule`: Cancellable frame loop and delayed tasks
//! - `platform`: Ports for storage, time and notifications
//! - `settings`: Runtime configuration

pub mod error;
pub mod platform;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::StoreError;
pub use session::{SessionController, SessionPhase};
pub use settings::Settings;

/// Game balance constants
///
/// Speeds are in pixels per nominal frame; times are in milliseconds.
pub mod consts {
    /// Nominal frame length that per-frame speeds are expressed against
    pub const NOMINAL_FRAME_MS: f64 = 16.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 8.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_START_LIVES: u32 = 3;
    /// Distance of the ship's top edge from the bottom of the viewport
    pub const PLAYER_BOTTOM_OFFSET: f32 = 100.0;
    pub const PLAYER_BULLET_COOLDOWN_MS: f64 = 300.0;

    /// Player bullets
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_SIZE: (f32, f32) = (6.0, 12.0);
    pub const POWERED_BULLET_SIZE: (f32, f32) = (8.0, 16.0);
    /// Horizontal offset of the side shots while the weapon is upgraded
    pub const SPREAD_OFFSET: f32 = 10.0;

    /// Enemy defaults
    pub const ENEMY_SPEED: f32 = 1.5;
    pub const ENEMY_DIVE_SPEED: f32 = 5.0;
    /// Vertical step taken each time a marching enemy bounces off an edge
    pub const ENEMY_DESCENT_STEP: f32 = 10.0;
    pub const ENEMY_BULLET_SPEED: f32 = 5.0;
    pub const ENEMY_BULLET_SIZE: (f32, f32) = (4.0, 8.0);
    pub const ENEMY_BULLET_COOLDOWN_MS: f64 = 2000.0;
    /// Per-tick fire probability at difficulty 1.0
    pub const ENEMY_FIRE_CHANCE: f64 = 0.1;
    /// Per-tick dive probability at difficulty 1.0
    pub const DIVE_CHANCE: f64 = 0.005;
    /// Delay between a wave being cleared and the next one spawning
    pub const ENEMY_SPAWN_DELAY_MS: f64 = 1000.0;
    /// Difficulty growth per level
    pub const DIFFICULTY_STEP: f64 = 0.1;

    /// Power-ups
    pub const POWER_UP_SPEED: f32 = 2.0;
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_CHANCE: f64 = 0.05;
    pub const POWER_UP_DURATION_MS: f64 = 10_000.0;
    pub const SPEED_BOOST_FACTOR: f32 = 1.5;

    /// Explosion lifetimes
    pub const EXPLOSION_SHORT_MS: f64 = 300.0;
    pub const EXPLOSION_MS: f64 = 500.0;
    pub const EXPLOSION_LONG_MS: f64 = 1000.0;
}

/// Difficulty multiplier for a level (level 1 plays at 1.0)
#[inline]
pub fn difficulty_for_level(level: u32) -> f64 {
    1.0 + (level.max(1) - 1) as f64 * consts::DIFFICULTY_STEP
}

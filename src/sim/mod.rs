//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Game time only (no wall clock)
//! - Injected RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Aabb, aabb_overlap};
pub use events::GameEvent;
pub use state::{
    Bullet, Enemy, EnemyKind, EnemyStats, Explosion, ExplosionSize, GamePhase, GameState,
    MoveDirection, Player, PowerUp, PowerUpKind, PowerUpWindow, Viewport,
};
pub use tick::{Advance, advance, fire, move_player};
pub use wave::{spawn_wave, wave_count};

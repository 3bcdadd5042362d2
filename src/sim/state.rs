//! Game state and entity types
//!
//! Everything the presentation layer draws, and everything the next tick needs,
//! lives in [`GameState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Play-area dimensions, supplied by the host on start and on every resize
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Session phase, derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Horizontal movement commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveDirection {
    #[default]
    None,
    Left,
    Right,
}

/// Explosion size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionSize {
    Small,
    Medium,
    Large,
}

/// Per-kind enemy constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    /// Square side length
    pub size: f32,
    /// Formation row (y of the top edge at spawn)
    pub row_y: f32,
    pub base_health: i32,
    /// Multiplier on [`ENEMY_SPEED`]
    pub speed_factor: f32,
    pub point_value: u64,
    pub explosion: ExplosionSize,
    pub explosion_ms: f64,
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Bomber,
    Elite,
    Boss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Basic,
        EnemyKind::Bomber,
        EnemyKind::Elite,
        EnemyKind::Boss,
    ];

    pub const fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                size: 40.0,
                row_y: 50.0,
                base_health: 1,
                speed_factor: 1.0,
                point_value: 100,
                explosion: ExplosionSize::Small,
                explosion_ms: EXPLOSION_MS,
            },
            EnemyKind::Bomber => EnemyStats {
                size: 50.0,
                row_y: 100.0,
                base_health: 2,
                speed_factor: 0.8,
                point_value: 200,
                explosion: ExplosionSize::Medium,
                explosion_ms: EXPLOSION_MS,
            },
            EnemyKind::Elite => EnemyStats {
                size: 60.0,
                row_y: 150.0,
                base_health: 3,
                speed_factor: 1.2,
                point_value: 300,
                explosion: ExplosionSize::Medium,
                explosion_ms: EXPLOSION_MS,
            },
            EnemyKind::Boss => EnemyStats {
                size: 80.0,
                row_y: 80.0,
                base_health: 10,
                speed_factor: 0.7,
                point_value: 1000,
                explosion: ExplosionSize::Large,
                explosion_ms: EXPLOSION_LONG_MS,
            },
        }
    }

    /// Starting health at a given level (bosses toughen with level)
    pub fn health_at(self, level: u32) -> i32 {
        let base = self.stats().base_health;
        match self {
            EnemyKind::Boss => base + level as i32,
            _ => base,
        }
    }
}

/// An enemy ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Signed horizontal speed; the sign is the marching direction
    pub speed: f32,
    pub health: i32,
    pub is_diving: bool,
    /// Game time of the last shot
    pub last_bullet_time: f64,
    pub point_value: u64,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// A bullet, fired either by the player or by an enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub damage: i32,
    pub from_player: bool,
    pub powered_up: bool,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A cosmetic explosion, removed once its duration has elapsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    /// Center of the blast
    pub pos: Vec2,
    pub size: ExplosionSize,
    /// Game time at which the explosion started
    pub start_time: f64,
    pub duration: f64,
}

impl Explosion {
    pub fn is_finished(&self, now: f64) -> bool {
        now - self.start_time >= self.duration
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExtraLife,
    SpeedBoost,
    WeaponUpgrade,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::ExtraLife,
        PowerUpKind::SpeedBoost,
        PowerUpKind::WeaponUpgrade,
        PowerUpKind::Shield,
    ];
}

/// A falling power-up capsule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Length of the player-side effect once collected
    pub duration: f64,
}

impl PowerUp {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A timed player buff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpWindow {
    pub kind: PowerUpKind,
    pub time_remaining: f64,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub lives: u32,
    /// Transient, visual-only movement flag
    pub is_moving: bool,
    pub moving: MoveDirection,
    /// Active timed buff, if any
    pub power_up: Option<PowerUpWindow>,
    pub is_shielded: bool,
    /// Game time of the last shot
    pub last_bullet_time: Option<f64>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            lives: PLAYER_START_LIVES,
            is_moving: false,
            moving: MoveDirection::None,
            power_up: None,
            is_shielded: false,
            last_bullet_time: None,
        }
    }
}

impl Player {
    /// Player centred horizontally near the bottom of the viewport
    pub fn spawn(viewport: Viewport) -> Self {
        let mut player = Self::default();
        player.pos = Vec2::new(
            viewport.width / 2.0 - player.size.x / 2.0,
            viewport.height - PLAYER_BOTTOM_OFFSET,
        );
        player
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn power_up_active(&self) -> bool {
        self.power_up.is_some()
    }

    pub fn weapon_upgraded(&self) -> bool {
        matches!(
            self.power_up,
            Some(PowerUpWindow {
                kind: PowerUpKind::WeaponUpgrade,
                ..
            })
        )
    }

    /// Clamp x into `[0, viewport.width - width]`
    pub fn clamp_to(&mut self, viewport: Viewport) {
        let max_x = (viewport.width - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }
}

/// Complete game snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub started: bool,
    pub paused: bool,
    pub game_over: bool,
    pub score: u64,
    pub high_score: u64,
    /// Current wave (0 until the first wave spawns)
    pub level: u32,
    pub difficulty_multiplier: f64,
    /// Accumulated simulation time (ms)
    pub game_time: f64,
    /// Game time of the last wave spawn
    pub last_enemy_spawn_time: Option<f64>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub power_ups: Vec<PowerUp>,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            started: false,
            paused: false,
            game_over: false,
            score: 0,
            high_score: 0,
            level: 0,
            difficulty_multiplier: 1.0,
            game_time: 0.0,
            last_enemy_spawn_time: None,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            power_ups: Vec::new(),
            next_id: 1,
        }
    }
}

impl GameState {
    /// An idle session that has not started yet
    pub fn idle(high_score: u64) -> Self {
        Self {
            high_score,
            ..Self::default()
        }
    }

    /// A fresh, running game that keeps the given high score
    pub fn new_game(viewport: Viewport, high_score: u64) -> Self {
        Self {
            started: true,
            high_score,
            player: Player::spawn(viewport),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else if !self.started {
            GamePhase::NotStarted
        } else if self.paused {
            GamePhase::Paused
        } else {
            GamePhase::Running
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_enemy(&mut self, mut enemy: Enemy) {
        enemy.id = self.next_entity_id();
        self.enemies.push(enemy);
    }

    pub fn push_bullet(&mut self, mut bullet: Bullet) {
        bullet.id = self.next_entity_id();
        self.bullets.push(bullet);
    }

    pub fn push_power_up(&mut self, mut power_up: PowerUp) {
        power_up.id = self.next_entity_id();
        self.power_ups.push(power_up);
    }

    /// Start an explosion at the current game time
    pub fn push_explosion(&mut self, pos: Vec2, size: ExplosionSize, duration: f64) {
        let id = self.next_entity_id();
        self.explosions.push(Explosion {
            id,
            pos,
            size,
            start_time: self.game_time,
            duration,
        });
    }

    /// Sort entity collections by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
        self.explosions.sort_by_key(|e| e.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_follows_flags() {
        let mut state = GameState::default();
        assert_eq!(state.phase(), GamePhase::NotStarted);
        state.started = true;
        assert_eq!(state.phase(), GamePhase::Running);
        state.paused = true;
        assert_eq!(state.phase(), GamePhase::Paused);
        state.game_over = true;
        assert_eq!(state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_new_game_centres_player() {
        let state = GameState::new_game(Viewport::new(800.0, 600.0), 4200);
        assert_eq!(state.player.pos, Vec2::new(380.0, 500.0));
        assert_eq!(state.high_score, 4200);
        assert_eq!(state.level, 0);
        assert!(state.started);
    }

    #[test]
    fn test_idle_keeps_high_score() {
        let state = GameState::idle(700);
        assert_eq!(state.phase(), GamePhase::NotStarted);
        assert_eq!(state.high_score, 700);
        assert_eq!(state.level, 0);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::default();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_table() {
        assert_eq!(EnemyKind::Boss.health_at(5), 15);
        assert_eq!(EnemyKind::Elite.health_at(5), 3);
        assert_eq!(EnemyKind::Basic.stats().explosion, ExplosionSize::Small);
        assert_eq!(EnemyKind::Boss.stats().explosion_ms, 1000.0);
    }
}

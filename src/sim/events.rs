//! Semantic events emitted for the notification sink.

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;

/// Fire-and-forget notifications; the core never waits on delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    GameStarted,
    Paused,
    Resumed,
    /// A new wave spawned
    WaveStarted { level: u32 },
    PowerUpCollected { kind: PowerUpKind },
    /// The timed buff ran out
    PowerUpExpired,
    /// Player hit by an enemy bullet
    HitTaken { lives: u32 },
    /// Player rammed by an enemy
    Crashed { lives: u32 },
    ShieldAbsorbed,
    /// Lives reached zero this tick
    LivesExhausted,
    GameOver { score: u64 },
    NewHighScore { score: u64 },
    HighScoreSaveFailed { reason: String },
}

impl GameEvent {
    /// Short human-readable text for toasts and logs
    pub fn message(&self) -> String {
        match self {
            GameEvent::GameStarted => "Game started! Destroy the alien invaders!".to_string(),
            GameEvent::Paused => "Game paused".to_string(),
            GameEvent::Resumed => "Game resumed".to_string(),
            GameEvent::WaveStarted { level } => format!("Level {level} - Difficulty increased!"),
            GameEvent::PowerUpCollected { kind } => match kind {
                PowerUpKind::ExtraLife => "Extra life collected!".to_string(),
                PowerUpKind::SpeedBoost => "Speed boost activated!".to_string(),
                PowerUpKind::WeaponUpgrade => "Weapon upgrade activated!".to_string(),
                PowerUpKind::Shield => "Shield activated!".to_string(),
            },
            GameEvent::PowerUpExpired => "Power-up expired!".to_string(),
            GameEvent::HitTaken { lives } => format!("Hit! Lives remaining: {lives}"),
            GameEvent::Crashed { lives } => format!("Crash! Lives remaining: {lives}"),
            GameEvent::ShieldAbsorbed => "Shield absorbed the hit!".to_string(),
            GameEvent::LivesExhausted => "No lives left".to_string(),
            GameEvent::GameOver { score } => format!("Game over! Final score: {score}"),
            GameEvent::NewHighScore { score } => format!("New high score: {score}!"),
            GameEvent::HighScoreSaveFailed { reason } => {
                format!("Could not save high score: {reason}")
            }
        }
    }
}

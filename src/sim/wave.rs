//! Wave generation
//!
//! Enemy rosters are fully determined by level, difficulty and viewport width:
//! each kind forms an evenly spaced row, the boss sits centred.

use glam::Vec2;

use super::state::{Enemy, EnemyKind};
use crate::consts::ENEMY_SPEED;

/// Number of enemies of a kind in the wave for `level`
pub fn wave_count(kind: EnemyKind, level: u32) -> usize {
    let level = level as usize;
    match kind {
        EnemyKind::Basic => (5 + level).min(10),
        EnemyKind::Bomber if level >= 2 => (2 + level / 2).min(6),
        EnemyKind::Elite if level >= 3 => (1 + level / 3).min(4),
        EnemyKind::Boss if level % 5 == 0 => 1,
        _ => 0,
    }
}

/// Build the enemy roster for a wave
///
/// Returned enemies carry id 0; [`GameState::push_enemy`](super::GameState::push_enemy)
/// assigns real IDs when the wave is placed.
pub fn spawn_wave(level: u32, difficulty_multiplier: f64, viewport_width: f32) -> Vec<Enemy> {
    let multiplier = difficulty_multiplier as f32;
    let mut enemies = Vec::new();

    for kind in EnemyKind::ALL {
        let count = wave_count(kind, level);
        if count == 0 {
            continue;
        }
        let stats = kind.stats();

        for i in 0..count {
            let x = match kind {
                EnemyKind::Boss => viewport_width / 2.0 - stats.size / 2.0,
                _ => viewport_width / (count + 1) as f32 * (i + 1) as f32,
            };
            enemies.push(Enemy {
                id: 0,
                kind,
                pos: Vec2::new(x, stats.row_y),
                size: Vec2::splat(stats.size),
                speed: ENEMY_SPEED * stats.speed_factor * multiplier,
                health: kind.health_at(level),
                is_diving: false,
                last_bullet_time: 0.0,
                point_value: stats.point_value,
            });
        }
    }

    log::debug!(
        "Wave {}: {} enemies (difficulty {:.1})",
        level,
        enemies.len(),
        difficulty_multiplier
    );
    enemies
}

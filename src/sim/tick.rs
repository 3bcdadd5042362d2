//! Per-frame simulation step and player commands
//!
//! [`advance`] consumes one snapshot and returns the next. The ordering of the
//! phases below matters: each one reads what the previous produced.

use glam::Vec2;
use rand::Rng;

use super::collision::aabb_overlap;
use super::events::GameEvent;
use super::state::{
    Bullet, EnemyKind, ExplosionSize, GamePhase, GameState, MoveDirection, PowerUp, PowerUpKind,
    PowerUpWindow, Viewport,
};
use super::wave::spawn_wave;
use crate::consts::*;
use crate::difficulty_for_level;

/// Result of one simulation step
#[derive(Debug, Clone)]
pub struct Advance {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

/// Advance the game by `elapsed_ms`
///
/// Returns the state untouched unless the game is running.
pub fn advance<R: Rng>(
    state: GameState,
    elapsed_ms: f64,
    viewport: Viewport,
    rng: &mut R,
) -> Advance {
    let mut events = Vec::new();
    if state.phase() != GamePhase::Running {
        return Advance { state, events };
    }

    let mut state = state;
    state.normalize_order();
    let frames = (elapsed_ms / NOMINAL_FRAME_MS) as f32;

    state.game_time += elapsed_ms;
    decay_power_up(&mut state, elapsed_ms, &mut events);
    move_bullets(&mut state, frames, viewport);
    move_power_ups(&mut state, frames, viewport);

    let now = state.game_time;
    state.explosions.retain(|e| !e.is_finished(now));

    spawn_next_wave(&mut state, viewport, &mut events);
    update_enemies(&mut state, frames, viewport, rng);
    resolve_player_bullets(&mut state, rng);
    resolve_enemy_bullets(&mut state, &mut events);
    resolve_ramming(&mut state, &mut events);
    collect_power_ups(&mut state, &mut events);

    Advance { state, events }
}

fn decay_power_up(state: &mut GameState, elapsed_ms: f64, events: &mut Vec<GameEvent>) {
    let Some(window) = state.player.power_up.as_mut() else {
        return;
    };
    window.time_remaining -= elapsed_ms;
    if window.time_remaining <= 0.0 {
        state.player.power_up = None;
        state.player.speed = PLAYER_SPEED;
        events.push(GameEvent::PowerUpExpired);
    }
}

fn move_bullets(state: &mut GameState, frames: f32, viewport: Viewport) {
    for bullet in &mut state.bullets {
        let dy = if bullet.from_player {
            -bullet.speed
        } else {
            bullet.speed
        };
        bullet.pos.y += dy * frames;
    }
    state
        .bullets
        .retain(|b| b.pos.y > -b.size.y && b.pos.y < viewport.height + b.size.y);
}

fn move_power_ups(state: &mut GameState, frames: f32, viewport: Viewport) {
    for power_up in &mut state.power_ups {
        power_up.pos.y += POWER_UP_SPEED * frames;
    }
    state
        .power_ups
        .retain(|p| p.pos.y < viewport.height + p.size.y);
}

/// Spawn the next wave once the field is clear and the spawn delay has passed
fn spawn_next_wave(state: &mut GameState, viewport: Viewport, events: &mut Vec<GameEvent>) {
    if !state.enemies.is_empty() {
        return;
    }
    let now = state.game_time;
    let cooled = state
        .last_enemy_spawn_time
        .is_none_or(|t| now - t > ENEMY_SPAWN_DELAY_MS);
    if !cooled {
        return;
    }

    state.level += 1;
    state.difficulty_multiplier = difficulty_for_level(state.level);
    for enemy in spawn_wave(state.level, state.difficulty_multiplier, viewport.width) {
        state.push_enemy(enemy);
    }
    state.last_enemy_spawn_time = Some(now);

    log::info!(
        "Level {} spawned: {} enemies, difficulty {:.1}",
        state.level,
        state.enemies.len(),
        state.difficulty_multiplier
    );
    events.push(GameEvent::WaveStarted { level: state.level });
}

/// Marching, diving and enemy fire
fn update_enemies<R: Rng>(state: &mut GameState, frames: f32, viewport: Viewport, rng: &mut R) {
    let now = state.game_time;
    let multiplier = state.difficulty_multiplier;
    let fire_cooldown = ENEMY_BULLET_COOLDOWN_MS / multiplier;
    // Chances are per nominal frame
    let dive_chance = DIVE_CHANCE * multiplier * frames as f64;
    let fire_chance = ENEMY_FIRE_CHANCE * multiplier * frames as f64;
    let mut shots = Vec::new();

    for enemy in &mut state.enemies {
        if enemy.is_diving {
            enemy.pos.y += ENEMY_DIVE_SPEED * multiplier as f32 * frames;
            if enemy.pos.y > viewport.height {
                // Recycle to the top of the screen
                let span = viewport.width - enemy.size.x;
                enemy.is_diving = false;
                enemy.pos.y = 0.0;
                enemy.pos.x = if span > 0.0 {
                    rng.random_range(0.0..span)
                } else {
                    0.0
                };
            }
            continue;
        }

        let new_x = enemy.pos.x + enemy.speed * frames;
        let max_x = (viewport.width - enemy.size.x).max(0.0);
        if new_x <= 0.0 || new_x >= max_x {
            enemy.speed = -enemy.speed;
            enemy.pos.x = if new_x <= 0.0 { 0.0 } else { max_x };
            enemy.pos.y += ENEMY_DESCENT_STEP;
            continue;
        }
        enemy.pos.x = new_x;

        if rng.random::<f64>() < dive_chance {
            enemy.is_diving = true;
            continue;
        }

        if now - enemy.last_bullet_time > fire_cooldown
            && rng.random::<f64>() < fire_chance
        {
            enemy.last_bullet_time = now;
            let (w, h) = ENEMY_BULLET_SIZE;
            shots.push(Bullet {
                id: 0,
                pos: Vec2::new(enemy.pos.x + enemy.size.x / 2.0, enemy.pos.y + enemy.size.y),
                size: Vec2::new(w, h),
                speed: ENEMY_BULLET_SPEED,
                damage: 1,
                from_player: false,
                powered_up: false,
            });
        }
    }

    for bullet in shots {
        state.push_bullet(bullet);
    }
}

/// Player bullets against enemies
///
/// Each bullet damages at most one enemy: the live enemy with the lowest id
/// among those it overlaps. Enemies killed earlier in the pass cannot absorb
/// later bullets.
pub(crate) fn resolve_player_bullets<R: Rng>(state: &mut GameState, rng: &mut R) {
    let mut spent = Vec::new();
    let mut blasts = Vec::new();
    let mut drops = Vec::new();

    for bullet in state.bullets.iter().filter(|b| b.from_player) {
        let bullet_box = bullet.bounds();
        let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|e| e.is_alive() && aabb_overlap(&e.bounds(), &bullet_box))
        else {
            continue;
        };

        spent.push(bullet.id);
        enemy.health -= bullet.damage;
        if enemy.is_alive() {
            continue;
        }

        let stats = enemy.kind.stats();
        state.score += enemy.point_value;
        blasts.push((enemy.center(), stats.explosion, stats.explosion_ms));

        if rng.random::<f64>() < POWER_UP_CHANCE {
            let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
            drops.push(PowerUp {
                id: 0,
                kind,
                pos: Vec2::new(
                    enemy.pos.x + enemy.size.x / 2.0 - POWER_UP_SIZE / 2.0,
                    enemy.pos.y,
                ),
                size: Vec2::splat(POWER_UP_SIZE),
                duration: POWER_UP_DURATION_MS,
            });
        }
    }

    state.enemies.retain(|e| e.is_alive());
    state.bullets.retain(|b| !spent.contains(&b.id));
    for (pos, size, duration) in blasts {
        state.push_explosion(pos, size, duration);
    }
    for power_up in drops {
        state.push_power_up(power_up);
    }
}

/// Take one life; returns the event describing the outcome
fn lose_life(state: &mut GameState, survived: fn(u32) -> GameEvent) -> Option<GameEvent> {
    if state.player.lives == 0 {
        return None;
    }
    state.player.lives -= 1;
    if state.player.lives == 0 {
        Some(GameEvent::LivesExhausted)
    } else {
        Some(survived(state.player.lives))
    }
}

/// Enemy bullets against the player
fn resolve_enemy_bullets(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player_box = state.player.bounds();
    let mut hits = Vec::new();
    state.bullets.retain(|b| {
        if !b.from_player && aabb_overlap(&b.bounds(), &player_box) {
            hits.push(b.pos);
            false
        } else {
            true
        }
    });

    for pos in hits {
        if state.player.is_shielded {
            state.player.is_shielded = false;
            events.push(GameEvent::ShieldAbsorbed);
        } else if let Some(event) = lose_life(state, |lives| GameEvent::HitTaken { lives }) {
            events.push(event);
        }
        state.push_explosion(pos, ExplosionSize::Small, EXPLOSION_SHORT_MS);
    }
}

/// Enemies crashing into the player; the enemy is always destroyed
fn resolve_ramming(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player_box = state.player.bounds();
    let (rammed, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| aabb_overlap(&e.bounds(), &player_box));
    state.enemies = remaining;

    for enemy in rammed {
        if state.player.is_shielded {
            state.player.is_shielded = false;
            state.score += enemy.point_value;
            state.push_explosion(enemy.center(), ExplosionSize::Medium, EXPLOSION_MS);
            events.push(GameEvent::ShieldAbsorbed);
        } else {
            state.score += enemy.point_value / 2;
            // Crashes are never small
            let (size, duration) = match enemy.kind {
                EnemyKind::Boss => (ExplosionSize::Large, EXPLOSION_LONG_MS),
                _ => (ExplosionSize::Medium, EXPLOSION_MS),
            };
            state.push_explosion(enemy.center(), size, duration);
            if let Some(event) = lose_life(state, |lives| GameEvent::Crashed { lives }) {
                events.push(event);
            }
        }
    }
}

fn collect_power_ups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.player.lives == 0 {
        return;
    }
    let player_box = state.player.bounds();
    let (collected, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut state.power_ups)
        .into_iter()
        .partition(|p| aabb_overlap(&p.bounds(), &player_box));
    state.power_ups = remaining;

    for power_up in collected {
        apply_power_up(state, &power_up);
        events.push(GameEvent::PowerUpCollected {
            kind: power_up.kind,
        });
    }
}

fn apply_power_up(state: &mut GameState, power_up: &PowerUp) {
    let player = &mut state.player;
    match power_up.kind {
        PowerUpKind::ExtraLife => player.lives += 1,
        PowerUpKind::SpeedBoost => {
            player.speed = PLAYER_SPEED * SPEED_BOOST_FACTOR;
            player.power_up = Some(PowerUpWindow {
                kind: PowerUpKind::SpeedBoost,
                time_remaining: power_up.duration,
            });
        }
        PowerUpKind::WeaponUpgrade => {
            player.power_up = Some(PowerUpWindow {
                kind: PowerUpKind::WeaponUpgrade,
                time_remaining: power_up.duration,
            });
        }
        // Binary shield: collecting another one while shielded changes nothing
        PowerUpKind::Shield => player.is_shielded = true,
    }
}

/// Move the player one step, clamped to the viewport
///
/// Ignored unless the game is running.
pub fn move_player(state: &mut GameState, direction: MoveDirection, viewport: Viewport) {
    if state.phase() != GamePhase::Running {
        return;
    }
    let player = &mut state.player;
    match direction {
        MoveDirection::Left => player.pos.x -= player.speed,
        MoveDirection::Right => player.pos.x += player.speed,
        MoveDirection::None => return,
    }
    player.clamp_to(viewport);
    player.is_moving = true;
    player.moving = direction;
}

/// Fire from the player's ship
///
/// Returns false when the shot is still on cooldown.
pub fn fire(state: &mut GameState) -> bool {
    let now = state.game_time;
    if state
        .player
        .last_bullet_time
        .is_some_and(|last| now - last < PLAYER_BULLET_COOLDOWN_MS)
    {
        return false;
    }

    let player = &state.player;
    let upgraded = player.weapon_upgraded();
    let (w, h) = if upgraded {
        POWERED_BULLET_SIZE
    } else {
        BULLET_SIZE
    };
    let center = Bullet {
        id: 0,
        pos: Vec2::new(
            player.pos.x + player.size.x / 2.0 - w / 2.0,
            player.pos.y - h,
        ),
        size: Vec2::new(w, h),
        speed: BULLET_SPEED,
        damage: if upgraded { 2 } else { 1 },
        from_player: true,
        powered_up: upgraded,
    };

    state.player.last_bullet_time = Some(now);
    if upgraded {
        for dx in [-SPREAD_OFFSET, SPREAD_OFFSET] {
            let mut side = center.clone();
            side.pos.x += dx;
            state.push_bullet(side);
        }
    }
    state.push_bullet(center);
    true
}

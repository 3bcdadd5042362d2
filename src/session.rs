//! Session controller
//!
//! Owns the authoritative [`GameState`], the frame loop and the ports. The
//! host drives it with [`SessionController::on_frame`] once per animation
//! frame and relays input through the command methods; commands are applied
//! immediately, between ticks.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::platform::{Clock, HighScoreStore, NotificationSink};
use crate::schedule::{DelayedTask, FrameLoop};
use crate::settings::Settings;
use crate::sim::{self, Advance, GameEvent, GameState, MoveDirection, Viewport};

pub use crate::sim::GamePhase as SessionPhase;

pub struct SessionController {
    settings: Settings,
    state: GameState,
    viewport: Viewport,
    rng: Pcg32,
    frames: FrameLoop,
    /// Clears the player's transient "moving" flag
    moving_reset: DelayedTask,
    /// Bumped on every start so stale timers can be recognised
    generation: u64,
    store: Box<dyn HighScoreStore>,
    sink: Box<dyn NotificationSink>,
    clock: Box<dyn Clock>,
}

impl SessionController {
    /// Create an idle session, reading the stored high score
    pub fn new(
        settings: Settings,
        viewport: Viewport,
        store: Box<dyn HighScoreStore>,
        sink: Box<dyn NotificationSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let high_score = match store.load() {
            Ok(score) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Err(e) => {
                log::warn!("High score unavailable, starting from 0: {}", e);
                0
            }
        };
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Session seed: {}", seed);

        Self {
            frames: FrameLoop::new(settings.frame_ms, settings.max_substeps),
            settings,
            state: GameState::idle(high_score),
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            moving_reset: DelayedTask::new(),
            generation: 0,
            store,
            sink,
            clock,
        }
    }

    /// Current snapshot for the presentation layer
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The play area changed size; used from the next tick on
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.state.player.clamp_to(viewport);
    }

    /// Start a new run from any phase, keeping the high score
    pub fn start(&mut self) {
        self.generation += 1;
        self.moving_reset.cancel();
        self.state = GameState::new_game(self.viewport, self.state.high_score);
        self.frames.start();
        log::info!("Session {} started", self.generation);
        self.emit(&GameEvent::GameStarted);
    }

    /// Running -> Paused; otherwise a no-op
    pub fn pause(&mut self) {
        if self.phase() != SessionPhase::Running {
            return;
        }
        self.state.paused = true;
        self.frames.cancel();
        self.cancel_moving();
        self.emit(&GameEvent::Paused);
    }

    /// Paused -> Running; otherwise a no-op
    pub fn resume(&mut self) {
        if self.phase() != SessionPhase::Paused {
            return;
        }
        self.state.paused = false;
        self.frames.start();
        self.emit(&GameEvent::Resumed);
    }

    /// Move the ship one step; only while running
    pub fn move_player(&mut self, direction: MoveDirection, viewport: Viewport) {
        if self.phase() != SessionPhase::Running || direction == MoveDirection::None {
            return;
        }
        sim::move_player(&mut self.state, direction, viewport);
        self.moving_reset.schedule(
            self.clock.now_ms(),
            self.settings.moving_flag_ms,
            self.generation,
        );
    }

    /// Fire; returns false while the shot is on cooldown
    pub fn fire(&mut self) -> bool {
        sim::fire(&mut self.state)
    }

    /// Host frame callback: service timers and run any due ticks
    pub fn on_frame(&mut self) {
        let now = self.clock.now_ms();
        if self.moving_reset.poll(now, self.generation) {
            self.clear_moving();
        }

        let steps = self.frames.due_steps(now);
        for _ in 0..steps {
            self.tick(self.frames.step_ms());
            if !self.frames.is_running() {
                break;
            }
        }
    }

    /// Run one simulation step and react to what it reported
    fn tick(&mut self, elapsed_ms: f64) {
        let Advance { state, events } = sim::advance(
            std::mem::take(&mut self.state),
            elapsed_ms,
            self.viewport,
            &mut self.rng,
        );
        self.state = state;

        let mut exhausted = false;
        for event in &events {
            match event {
                GameEvent::LivesExhausted => exhausted = true,
                _ => self.emit(event),
            }
        }
        if exhausted {
            self.end();
        }
    }

    /// Running -> GameOver, persisting a beaten high score
    fn end(&mut self) {
        if self.phase() != SessionPhase::Running {
            return;
        }
        self.state.game_over = true;
        self.frames.cancel();
        self.cancel_moving();

        let score = self.state.score;
        log::info!("Game over: score {}, level {}", score, self.state.level);
        self.emit(&GameEvent::GameOver { score });

        if score > self.state.high_score {
            self.state.high_score = score;
            if let Err(e) = self.store.save(score) {
                log::warn!("Failed to save high score {}: {}", score, e);
                self.emit(&GameEvent::HighScoreSaveFailed {
                    reason: e.to_string(),
                });
            }
            self.emit(&GameEvent::NewHighScore { score });
        }
    }

    fn cancel_moving(&mut self) {
        self.moving_reset.cancel();
        self.clear_moving();
    }

    fn clear_moving(&mut self) {
        self.state.player.is_moving = false;
        self.state.player.moving = MoveDirection::None;
    }

    fn emit(&self, event: &GameEvent) {
        self.sink.notify(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ManualClock, MemoryStore};
    use crate::sim::{Bullet, PowerUpKind};
    use glam::Vec2;
    use proptest::prelude::*;
    use std::sync::mpsc;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    struct Harness {
        session: SessionController,
        clock: ManualClock,
        store: MemoryStore,
        events: mpsc::Receiver<GameEvent>,
    }

    impl Harness {
        fn new(high_score: u64, seed: u64) -> Self {
            let clock = ManualClock::new(0.0);
            let store = MemoryStore::with_score(high_score);
            let (tx, events) = mpsc::channel();
            let settings = Settings {
                seed: Some(seed),
                ..Settings::default()
            };
            let session = SessionController::new(
                settings,
                VIEW,
                Box::new(store.clone()),
                Box::new(tx),
                Box::new(clock.clone()),
            );
            Self {
                session,
                clock,
                store,
                events,
            }
        }

        /// Advance the wall clock one nominal frame and run the frame callback
        fn frame(&mut self) {
            self.clock.advance(16.0);
            self.session.on_frame();
        }

        fn drain(&self) -> Vec<GameEvent> {
            self.events.try_iter().collect()
        }

        fn shoot_player(&mut self) {
            let pos = self.session.state.player.pos + Vec2::new(10.0, 10.0);
            self.session.state.push_bullet(Bullet {
                id: 0,
                pos,
                size: Vec2::new(4.0, 8.0),
                speed: 0.0,
                damage: 1,
                from_player: false,
                powered_up: false,
            });
        }
    }

    #[test]
    fn test_new_session_loads_high_score() {
        let h = Harness::new(900, 1);
        assert_eq!(h.session.high_score(), 900);
        assert_eq!(h.session.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn test_unavailable_store_starts_at_zero() {
        let store = MemoryStore::with_score(900);
        store.set_unavailable(true);
        let (tx, _rx) = mpsc::channel();
        let session = SessionController::new(
            Settings::default(),
            VIEW,
            Box::new(store),
            Box::new(tx),
            Box::new(ManualClock::new(0.0)),
        );
        assert_eq!(session.high_score(), 0);
    }

    #[test]
    fn test_start_runs_first_wave() {
        let mut h = Harness::new(0, 1);
        h.session.start();
        assert_eq!(h.session.phase(), SessionPhase::Running);
        h.frame();
        assert_eq!(h.session.state().level, 1);
        assert_eq!(h.session.state().enemies.len(), 6);
        let events = h.drain();
        assert_eq!(events[0], GameEvent::GameStarted);
        assert!(events.contains(&GameEvent::WaveStarted { level: 1 }));
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let mut h = Harness::new(0, 1);
        h.session.pause();
        assert_eq!(h.session.phase(), SessionPhase::NotStarted);

        h.session.start();
        h.session.resume();
        assert_eq!(h.session.phase(), SessionPhase::Running);

        h.session.pause();
        let paused = h.session.state().clone();
        h.session.pause();
        assert_eq!(h.session.state(), &paused);

        h.session.resume();
        h.session.resume();
        assert_eq!(h.session.phase(), SessionPhase::Running);
        let events = h.drain();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Paused).count(), 1);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Resumed).count(), 1);
    }

    #[test]
    fn test_no_ticks_while_paused_and_no_replay() {
        let mut h = Harness::new(0, 1);
        h.session.start();
        h.frame();
        h.frame();
        h.session.pause();
        let time = h.session.state().game_time;

        h.clock.advance(5_000.0);
        h.session.on_frame();
        assert_eq!(h.session.state().game_time, time);

        h.session.resume();
        h.frame();
        assert_eq!(h.session.state().game_time, time + 16.0);
    }

    #[test]
    fn test_moving_flag_clears_after_delay() {
        let mut h = Harness::new(0, 1);
        h.session.start();
        h.session.move_player(MoveDirection::Right, VIEW);
        assert!(h.session.state().player.is_moving);

        h.frame();
        assert!(h.session.state().player.is_moving);
        for _ in 0..6 {
            h.frame();
        }
        assert!(!h.session.state().player.is_moving);
        assert_eq!(h.session.state().player.moving, MoveDirection::None);
    }

    #[test]
    fn test_restart_ignores_old_moving_timer() {
        let mut h = Harness::new(0, 1);
        h.session.start();
        h.session.move_player(MoveDirection::Left, VIEW);
        h.clock.advance(60.0);
        h.session.start();
        h.session.move_player(MoveDirection::Right, VIEW);

        // The first session's timer would have fired at 100 ms
        h.clock.set(120.0);
        h.session.on_frame();
        assert!(h.session.state().player.is_moving);

        h.clock.set(170.0);
        h.session.on_frame();
        assert!(!h.session.state().player.is_moving);
    }

    #[test]
    fn test_resize_keeps_player_inside() {
        let mut h = Harness::new(0, 1);
        h.session.start();
        for _ in 0..60 {
            h.session.move_player(MoveDirection::Right, VIEW);
        }
        assert_eq!(h.session.state().player.pos.x, 760.0);

        let narrow = Viewport::new(400.0, 600.0);
        h.session.resize(narrow);
        assert_eq!(h.session.viewport(), narrow);
        assert_eq!(h.session.state().player.pos.x, 360.0);
        for _ in 0..5 {
            h.frame();
        }
        assert!(h.session.state().player.pos.x <= 360.0);
    }

    #[test]
    fn test_move_only_while_running() {
        let mut h = Harness::new(0, 1);
        h.session.start();
        h.session.pause();
        let x = h.session.state().player.pos.x;
        h.session.move_player(MoveDirection::Left, VIEW);
        assert_eq!(h.session.state().player.pos.x, x);
    }

    #[test]
    fn test_game_over_once_and_high_score_saved() {
        let mut h = Harness::new(100, 1);
        h.session.start();
        h.frame();
        h.session.state.score = 450;
        h.session.state.player.lives = 1;
        h.shoot_player();
        h.frame();

        assert_eq!(h.session.phase(), SessionPhase::GameOver);
        assert_eq!(h.session.high_score(), 450);
        assert_eq!(h.store.stored(), Some(450));

        for _ in 0..10 {
            h.frame();
        }
        let events = h.drain();
        let overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(events.contains(&GameEvent::NewHighScore { score: 450 }));
    }

    #[test]
    fn test_game_over_below_high_score_keeps_it() {
        let mut h = Harness::new(5_000, 1);
        h.session.start();
        h.frame();
        h.session.state.score = 300;
        h.session.state.player.lives = 1;
        h.shoot_player();
        h.frame();
        assert_eq!(h.session.phase(), SessionPhase::GameOver);
        assert_eq!(h.session.high_score(), 5_000);
        assert_eq!(h.store.stored(), Some(5_000));

        h.session.start();
        let state = h.session.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 5_000);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert!(state.explosions.is_empty());
        assert!(state.power_ups.is_empty());
        assert_eq!(h.session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_failed_save_does_not_stop_play() {
        let mut h = Harness::new(0, 1);
        h.session.start();
        h.frame();
        h.store.set_unavailable(true);
        h.session.state.score = 800;
        h.session.state.player.lives = 1;
        h.shoot_player();
        h.frame();

        assert_eq!(h.session.phase(), SessionPhase::GameOver);
        assert_eq!(h.session.high_score(), 800);
        let events = h.drain();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::HighScoreSaveFailed { .. }))
        );

        h.session.start();
        h.frame();
        assert_eq!(h.session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_fire_spawns_bullet() {
        let mut h = Harness::new(0, 1);
        h.session.start();
        assert!(h.session.fire());
        assert!(!h.session.fire());
        assert_eq!(h.session.state().bullets.len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_lives_only_rise_from_extra_life(seed in any::<u64>()) {
            let mut h = Harness::new(0, seed);
            h.session.start();
            let mut overs = 0;
            let mut lives = h.session.state().player.lives;

            for frame in 0..1500u32 {
                if frame % 3 == 0 {
                    let target = h.session.state().enemies.first().map(|e| e.center().x);
                    if let Some(x) = target {
                        let player = &h.session.state().player;
                        let player_x = player.pos.x + player.size.x / 2.0;
                        let dir = if x < player_x { MoveDirection::Left } else { MoveDirection::Right };
                        h.session.move_player(dir, VIEW);
                    }
                }
                h.session.fire();
                h.frame();

                let events = h.drain();
                overs += events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count();
                let now = h.session.state().player.lives;
                if now > lives {
                    let extra_life = GameEvent::PowerUpCollected { kind: PowerUpKind::ExtraLife };
                    let collected = events.contains(&extra_life);
                    prop_assert!(collected);
                }
                if now == 0 {
                    prop_assert_eq!(h.session.phase(), SessionPhase::GameOver);
                }
                lives = now;
            }
            prop_assert!(overs <= 1);
        }
    }
}

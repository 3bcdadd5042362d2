//! Browser bindings (WASM only)
//!
//! Exposes [`WebGame`] to JavaScript. The page owns the canvas, keyboard and
//! `requestAnimationFrame`; it calls [`WebGame::frame`] once per animation
//! frame and reads [`WebGame::snapshot_json`] to draw.

use wasm_bindgen::prelude::*;

use crate::platform::{DateClock, LocalStorageStore, LogSink, NotificationSink};
use crate::session::{SessionController, SessionPhase};
use crate::settings::Settings;
use crate::sim::{GameEvent, MoveDirection, Viewport};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Galactic Rage core loaded");
}

/// Logs every event and forwards it to an optional page callback
///
/// The callback receives the toast text and the event as JSON.
struct PageSink {
    callback: Option<js_sys::Function>,
}

impl NotificationSink for PageSink {
    fn notify(&self, event: &GameEvent) {
        LogSink.notify(event);
        let Some(callback) = &self.callback else {
            return;
        };
        let json = serde_json::to_string(event).unwrap_or_default();
        if let Err(e) = callback.call2(
            &JsValue::NULL,
            &JsValue::from_str(&event.message()),
            &JsValue::from_str(&json),
        ) {
            log::warn!("Notification callback failed: {:?}", e);
        }
    }
}

#[wasm_bindgen]
pub struct WebGame {
    session: SessionController,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a session for a play area of `width` x `height` pixels
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, on_event: Option<js_sys::Function>) -> WebGame {
        let settings = Settings::load();
        let store = LocalStorageStore::new(settings.storage_key.clone());
        let session = SessionController::new(
            settings,
            Viewport::new(width, height),
            Box::new(store),
            Box::new(PageSink { callback: on_event }),
            Box::new(DateClock),
        );
        WebGame { session }
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.session.resume();
    }

    /// Pause/resume key handler
    pub fn toggle_pause(&mut self) {
        match self.session.phase() {
            SessionPhase::Running => self.session.pause(),
            SessionPhase::Paused => self.session.resume(),
            _ => {}
        }
    }

    pub fn move_left(&mut self) {
        let viewport = self.session.viewport();
        self.session.move_player(MoveDirection::Left, viewport);
    }

    pub fn move_right(&mut self) {
        let viewport = self.session.viewport();
        self.session.move_player(MoveDirection::Right, viewport);
    }

    pub fn fire(&mut self) -> bool {
        self.session.fire()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(Viewport::new(width, height));
    }

    /// Animation-frame callback
    pub fn frame(&mut self) {
        self.session.on_frame();
    }

    /// "not_started", "running", "paused" or "game_over"
    pub fn phase(&self) -> String {
        match self.session.phase() {
            SessionPhase::NotStarted => "not_started",
            SessionPhase::Running => "running",
            SessionPhase::Paused => "paused",
            SessionPhase::GameOver => "game_over",
        }
        .to_string()
    }

    pub fn score(&self) -> f64 {
        self.session.state().score as f64
    }

    pub fn high_score(&self) -> f64 {
        self.session.high_score() as f64
    }

    /// Full game state for rendering
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.state()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

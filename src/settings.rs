//! Session settings
//!
//! Persisted separately from the high score. Balance constants live in
//! [`crate::consts`]; these are the knobs the host may change.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default LocalStorage / store key for the high score
pub const DEFAULT_STORAGE_KEY: &str = "galactic_rage_high_score";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed simulation step (ms)
    pub frame_ms: f64,
    /// Maximum simulation steps per host frame
    pub max_substeps: u32,
    /// How long the player's "moving" flag stays set after a move (ms)
    pub moving_flag_ms: f64,
    /// RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Key the high score is stored under
    pub storage_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_ms: crate::consts::NOMINAL_FRAME_MS,
            max_substeps: 4,
            moving_flag_ms: 100.0,
            seed: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Keep timing values usable
    fn sanitize(&mut self) {
        if !(self.frame_ms.is_finite() && self.frame_ms > 0.0) {
            self.frame_ms = crate::consts::NOMINAL_FRAME_MS;
        }
        self.max_substeps = self.max_substeps.max(1);
        if !(self.moving_flag_ms.is_finite() && self.moving_flag_ms >= 0.0) {
            self.moving_flag_ms = 100.0;
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring invalid settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "galactic_rage_settings";

    /// Settings stored by the page in LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        match stored.map(|json| Self::from_json(&json)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring invalid stored settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"seed": 7, "max_substeps": 2}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.max_substeps, 2);
        assert_eq!(settings.frame_ms, 16.0);
        assert_eq!(settings.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_bad_timings_are_repaired() {
        let settings = Settings::from_json(r#"{"frame_ms": 0, "max_substeps": 0}"#).unwrap();
        assert_eq!(settings.frame_ms, 16.0);
        assert_eq!(settings.max_substeps, 1);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Settings::from_json("{").is_err());
    }

    #[test]
    fn test_missing_file_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/galactic-rage.json"));
        assert_eq!(settings, Settings::default());
    }
}

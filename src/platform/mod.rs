//! Platform abstraction layer
//!
//! Ports the session controller depends on, with browser/native adapters:
//! - Storage (high score; LocalStorage on web, JSON file on native)
//! - Time (wall clock for frame pacing)
//! - Notifications (fire-and-forget event sink)

pub mod notify;
pub mod storage;
pub mod time;

pub use notify::{LogSink, NotificationSink};
pub use storage::{FileStore, HighScoreStore, MemoryStore};
pub use time::{Clock, ManualClock};

#[cfg(not(target_arch = "wasm32"))]
pub use time::SystemClock;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
#[cfg(target_arch = "wasm32")]
pub use time::DateClock;

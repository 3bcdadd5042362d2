//! Notification sinks
//!
//! The core hands every [`GameEvent`] to a sink and moves on. Sinks must not
//! block and the core never looks at whether delivery worked.

use std::sync::mpsc;

use crate::sim::GameEvent;

/// Fire-and-forget event port
pub trait NotificationSink {
    fn notify(&self, event: &GameEvent);
}

/// Writes events to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, event: &GameEvent) {
        match event {
            GameEvent::HighScoreSaveFailed { .. } => log::warn!("{}", event.message()),
            _ => log::info!("{}", event.message()),
        }
    }
}

/// Forward events over a channel; a dropped receiver is ignored
impl NotificationSink for mpsc::Sender<GameEvent> {
    fn notify(&self, event: &GameEvent) {
        let _ = self.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (tx, rx) = mpsc::channel();
        tx.notify(&GameEvent::Paused);
        assert_eq!(rx.try_recv().unwrap(), GameEvent::Paused);
        drop(rx);
        tx.notify(&GameEvent::Resumed);
    }
}

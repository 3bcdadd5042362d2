//! Cooperative scheduling primitives
//!
//! The host calls in once per animation frame; nothing here sleeps or spawns.
//! [`FrameLoop`] turns real frame deltas into fixed simulation steps and
//! [`DelayedTask`] runs a one-shot action after a delay. Both can be
//! cancelled, and delayed tasks carry the session generation they were
//! scheduled under so a restart never acts on a stale session.

/// Longest real delta a single frame may feed into the loop (ms)
const MAX_FRAME_DELTA_MS: f64 = 100.0;

/// Cancellable fixed-step repeating task
#[derive(Debug, Clone)]
pub struct FrameLoop {
    step_ms: f64,
    max_substeps: u32,
    running: bool,
    last_time: Option<f64>,
    accumulator: f64,
}

impl FrameLoop {
    pub fn new(step_ms: f64, max_substeps: u32) -> Self {
        Self {
            step_ms,
            max_substeps: max_substeps.max(1),
            running: false,
            last_time: None,
            accumulator: 0.0,
        }
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    /// Begin producing steps; time spent stopped is never replayed
    pub fn start(&mut self) {
        self.running = true;
        self.last_time = None;
        self.accumulator = 0.0;
    }

    pub fn cancel(&mut self) {
        self.running = false;
        self.last_time = None;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of fixed steps to run for a frame at `now`
    ///
    /// The first frame after [`start`](Self::start) always yields one step.
    pub fn due_steps(&mut self, now: f64) -> u32 {
        if !self.running {
            return 0;
        }
        let delta = match self.last_time.replace(now) {
            Some(last) => (now - last).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => self.step_ms,
        };
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= self.step_ms && steps < self.max_substeps {
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    due_at: f64,
    generation: u64,
}

/// Cancellable one-shot timer
#[derive(Debug, Clone, Default)]
pub struct DelayedTask {
    pending: Option<Pending>,
}

impl DelayedTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule (or reschedule) the task `delay_ms` after `now`
    pub fn schedule(&mut self, now: f64, delay_ms: f64, generation: u64) {
        self.pending = Some(Pending {
            due_at: now + delay_ms,
            generation,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the task if it is due and belongs to `generation`
    ///
    /// A task from another generation is discarded without firing.
    pub fn poll(&mut self, now: f64, generation: u64) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if pending.generation != generation {
            self.pending = None;
            return false;
        }
        if now < pending.due_at {
            return false;
        }
        self.pending = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_idle_until_started() {
        let mut frames = FrameLoop::new(16.0, 4);
        assert_eq!(frames.due_steps(0.0), 0);
        frames.start();
        assert_eq!(frames.due_steps(100.0), 1);
        assert_eq!(frames.due_steps(116.0), 1);
        assert_eq!(frames.due_steps(124.0), 0);
        assert_eq!(frames.due_steps(132.0), 1);
    }

    #[test]
    fn test_loop_caps_substeps() {
        let mut frames = FrameLoop::new(16.0, 4);
        frames.start();
        frames.due_steps(0.0);
        assert_eq!(frames.due_steps(5_000.0), 4);
    }

    #[test]
    fn test_cancel_does_not_replay() {
        let mut frames = FrameLoop::new(16.0, 8);
        frames.start();
        frames.due_steps(0.0);
        frames.cancel();
        assert_eq!(frames.due_steps(1_000.0), 0);
        frames.start();
        assert_eq!(frames.due_steps(10_000.0), 1);
    }

    #[test]
    fn test_delayed_task_fires_once() {
        let mut task = DelayedTask::new();
        task.schedule(0.0, 100.0, 1);
        assert!(!task.poll(50.0, 1));
        assert!(task.poll(100.0, 1));
        assert!(!task.poll(200.0, 1));
    }

    #[test]
    fn test_delayed_task_reschedule_and_cancel() {
        let mut task = DelayedTask::new();
        task.schedule(0.0, 100.0, 1);
        task.schedule(80.0, 100.0, 1);
        assert!(!task.poll(150.0, 1));
        task.cancel();
        assert!(!task.poll(500.0, 1));
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut task = DelayedTask::new();
        task.schedule(0.0, 100.0, 1);
        assert!(!task.poll(200.0, 2));
        assert!(!task.is_pending());
    }
}

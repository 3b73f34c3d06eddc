use std::time::{Duration, Instant};

// At most one schedule is outstanding. `schedule` replaces any previous one
pub trait Timer {
    fn schedule(&mut self, period: Duration);
    fn cancel(&mut self);
    fn period(&self) -> Option<Duration>;

    fn is_armed(&self) -> bool {
        self.period().is_some()
    }
}

/// Deadline-based timer polled by the terminal loop.
pub struct FrameTimer {
    armed: Option<(Duration, Instant)>,
}

impl FrameTimer {
    pub fn new() -> Self {
        FrameTimer { armed: None }
    }

    pub fn time_until_due(&self) -> Option<Duration> {
        self.armed.map(|(_, deadline)| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns true once per elapsed period and moves the deadline forward.
    pub fn fire_if_due(&mut self) -> bool {
        match self.armed {
            Some((period, deadline)) if Instant::now() >= deadline => {
                self.armed = Some((period, Instant::now() + period));
                true
            }
            _ => false,
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for FrameTimer {
    fn schedule(&mut self, period: Duration) {
        self.cancel();
        self.armed = Some((period, Instant::now() + period));
    }

    fn cancel(&mut self) {
        self.armed = None;
    }

    fn period(&self) -> Option<Duration> {
        self.armed.map(|(period, _)| period)
    }
}

use std::time::{Duration, Instant};

/// [Stopwatch] measures wall clock time between laps, for timing setup
/// steps in the logs.
pub struct Stopwatch {
    last: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Time since the previous lap, or since the stopwatch was started.
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);

        self.last = now;
        elapsed
    }
}

//! Elapsed game time, shown next to the board.

use web_time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy)]
pub struct Stopwatch {
    /// When the current run started, `None` while stopped.
    start_time: Option<Instant>,
    /// Time accumulated by previous runs.
    elapsed: Duration,
}

impl Stopwatch {
    /// Starts the stopwatch. Does nothing if it is already running.
    pub fn start(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
    }

    pub fn stop(&mut self) {
        self.elapsed = self.elapsed();
        self.start_time = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        let mut elapsed = self.elapsed;
        if let Some(start_time) = self.start_time {
            elapsed += start_time.elapsed();
        }
        elapsed
    }
}

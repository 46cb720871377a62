//! Timing helpers for the sub-step batch.
//!
//! `ProfilerScope` reports its lifetime through `tracing` when dropped;
//! `FrameTimer` keeps a rolling view of whole-frame cost.
use std::time::Instant;

use tracing::trace;

/// RAII timer, emits a `trace!` event with the elapsed time on drop.
pub struct ProfilerScope {
    start: Instant,
    name: &'static str,
}

impl ProfilerScope {
    /// Starts timing `name`.
    pub fn new(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfilerScope {
    fn drop(&mut self) {
        trace!(scope = self.name, elapsed_ms = self.elapsed_ms(), "profiler scope");
    }
}

/// Last and exponentially averaged frame times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTimer {
    last_frame_time_ms: f64,
    average_frame_time_ms: f64,
    frames: u64,
}

impl FrameTimer {
    /// Weight of the newest sample in the running average
    const SMOOTHING: f64 = 0.1;

    /// Timer with no recorded frames.
    pub fn new() -> Self {
        Self {
            last_frame_time_ms: 0.0,
            average_frame_time_ms: 0.0,
            frames: 0,
        }
    }

    /// Records one frame time in milliseconds.
    pub fn record(&mut self, time_ms: f64) {
        self.last_frame_time_ms = time_ms;
        self.average_frame_time_ms = if self.frames == 0 {
            time_ms
        } else {
            self.average_frame_time_ms + Self::SMOOTHING * (time_ms - self.average_frame_time_ms)
        };
        self.frames += 1;
    }

    /// Most recent frame time.
    pub fn last_frame_time_ms(&self) -> f64 {
        self.last_frame_time_ms
    }

    /// Smoothed frame time.
    pub fn average_frame_time_ms(&self) -> f64 {
        self.average_frame_time_ms
    }

    /// Number of recorded frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_profiler_scope_measures_time() {
        let scope = ProfilerScope::new("test");
        thread::sleep(Duration::from_millis(10));
        let elapsed = scope.elapsed_ms();
        assert!(elapsed >= 10.0, "Expected at least 10ms, got {elapsed}");
    }

    #[test]
    fn test_frame_timer() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.last_frame_time_ms(), 0.0);
        assert_eq!(timer.frames(), 0);

        timer.record(16.0);
        assert_eq!(timer.last_frame_time_ms(), 16.0);
        assert_eq!(timer.average_frame_time_ms(), 16.0);

        timer.record(26.0);
        assert_eq!(timer.last_frame_time_ms(), 26.0);
        assert_relative_eq!(timer.average_frame_time_ms(), 17.0);
        assert_eq!(timer.frames(), 2);
    }
}

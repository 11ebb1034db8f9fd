//! Time management utilities

use std::time::{Duration, Instant};

/// Monotonic clock started when the display is created
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Start a new clock
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the clock started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Seconds since the clock started
    pub fn timer_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Milliseconds since the clock started, wrapping every ~49.7 days
    pub fn millisecond_timer(&self) -> u32 {
        wrap_millis(self.elapsed())
    }
}

fn wrap_millis(elapsed: Duration) -> u32 {
    (elapsed.as_millis() % (u128::from(u32::MAX) + 1)) as u32
}

/// Frame timing statistics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Frames presented since the timer started
    pub frame_count: u64,
    /// Seconds between the last two presented frames
    pub last_frame_secs: f32,
    /// Seconds covered by all presented frames
    pub total_secs: f32,
}

impl FrameStats {
    /// Average frames per second since the timer started
    pub fn average_fps(&self) -> f32 {
        if self.total_secs > 0.0 {
            self.frame_count as f32 / self.total_secs
        } else {
            0.0
        }
    }

    /// Frames per second based on the last frame time
    pub fn current_fps(&self) -> f32 {
        if self.last_frame_secs > 0.0 {
            1.0 / self.last_frame_secs
        } else {
            0.0
        }
    }
}

/// Frame timer advanced once per presented frame
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last_frame: Instant,
    stats: FrameStats,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a timer whose first frame is measured from `start`
    pub fn starting_at(start: Instant) -> Self {
        Self {
            last_frame: start,
            stats: FrameStats::default(),
        }
    }

    /// Record a frame presented at `now`
    pub fn record_frame(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.stats.last_frame_secs = elapsed.as_secs_f32();
        self.stats.total_secs += self.stats.last_frame_secs;
        self.stats.frame_count += 1;
        self.last_frame = now;
    }

    /// Get the statistics so far
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Restart measurement from `now`
    pub fn reset(&mut self, now: Instant) {
        *self = Self::starting_at(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_millisecond_timer_wraps() {
        assert_eq!(wrap_millis(Duration::from_millis(1500)), 1500);
        let past_wrap = Duration::from_millis(u64::from(u32::MAX) + 11);
        assert_eq!(wrap_millis(past_wrap), 10);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::new();
        let a = clock.timer_seconds();
        let b = clock.timer_seconds();
        assert!(b >= a);
    }

    #[test]
    fn test_frame_stats() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);
        assert_eq!(timer.stats().average_fps(), 0.0);

        timer.record_frame(start + Duration::from_millis(20));
        timer.record_frame(start + Duration::from_millis(40));
        let stats = timer.stats();
        assert_eq!(stats.frame_count, 2);
        assert_relative_eq!(stats.last_frame_secs, 0.02, epsilon = 1e-5);
        assert_relative_eq!(stats.average_fps(), 50.0, epsilon = 1e-2);
        assert_relative_eq!(stats.current_fps(), 50.0, epsilon = 1e-2);
    }
}

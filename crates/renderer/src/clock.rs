use std::time::{Duration, Instant};

/// Frame timestamp handed to the background on every animation frame.
///
/// Mirrors a display-refresh callback timestamp: time since the clock's
/// origin plus a running frame index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStamp {
    pub elapsed: Duration,
    pub frame_index: u64,
}

impl FrameStamp {
    pub fn new(elapsed: Duration, frame_index: u64) -> Self {
        Self {
            elapsed,
            frame_index,
        }
    }

    /// Shader time for this frame: milliseconds × 0.001 × speed.
    pub fn scaled(&self, speed: f32) -> f32 {
        scaled_time(self.elapsed, speed)
    }
}

/// Converts a frame timestamp into the `uTime` value for a given speed.
pub fn scaled_time(elapsed: Duration, speed: f32) -> f32 {
    let millis = elapsed.as_secs_f64() * 1000.0;
    (millis * 0.001 * f64::from(speed)) as f32
}

/// Where frame timestamps come from.
pub trait TimeSource {
    fn sample(&mut self) -> FrameStamp;
}

/// Monotonic wall clock starting at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn sample(&mut self) -> FrameStamp {
        let stamp = FrameStamp::new(self.origin.elapsed(), self.frame);
        self.frame = self.frame.saturating_add(1);
        stamp
    }
}

/// Clock frozen at one timestamp, used for `--freeze-time` captures.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: Duration,
    frame: u64,
}

impl FixedTimeSource {
    pub fn new(time: Duration) -> Self {
        Self { time, frame: 0 }
    }
}

impl TimeSource for FixedTimeSource {
    fn sample(&mut self) -> FrameStamp {
        let stamp = FrameStamp::new(self.time, self.frame);
        self.frame = self.frame.saturating_add(1);
        stamp
    }
}

pub type BoxedTimeSource = Box<dyn TimeSource>;

/// Picks the wall clock, or a frozen clock when a timestamp is pinned.
pub fn time_source_for(frozen: Option<Duration>) -> BoxedTimeSource {
    match frozen {
        Some(time) => Box::new(FixedTimeSource::new(time)),
        None => Box::new(SystemTimeSource::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_time_is_linear_in_speed() {
        let elapsed = Duration::from_millis(4_000);
        let slow = scaled_time(elapsed, 0.15);
        let fast = scaled_time(elapsed, 0.30);
        assert!((slow - 0.6).abs() < 1e-6);
        assert!((fast - 2.0 * slow).abs() < 1e-6);
    }

    #[test]
    fn system_clock_never_goes_backwards() {
        let mut clock = SystemTimeSource::new();
        let mut last = clock.sample();
        for _ in 0..64 {
            let next = clock.sample();
            assert!(next.elapsed >= last.elapsed);
            assert_eq!(next.frame_index, last.frame_index + 1);
            last = next;
        }
    }

    #[test]
    fn frozen_clock_repeats_timestamp() {
        let mut clock = time_source_for(Some(Duration::from_secs(12)));
        let first = clock.sample();
        let second = clock.sample();
        assert_eq!(first.elapsed, Duration::from_secs(12));
        assert_eq!(second.elapsed, first.elapsed);
        assert_eq!(second.frame_index, 1);
    }
}

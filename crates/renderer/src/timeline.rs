use std::time::Duration;

/// Cubic ease-out: fast start, gentle settle. Input is clamped to `[0, 1]`.
pub fn ease_out(t: f32) -> f32 {
    let inverse = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inverse * inverse * inverse
}

/// Opacity ramp measured on the frame clock rather than wall time, so frozen
/// captures render a stable frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeEnvelope {
    start: Duration,
    duration: Duration,
}

impl FadeEnvelope {
    pub fn new(start: Duration, duration: Duration) -> Self {
        Self { start, duration }
    }

    /// Opacity in `[0, 1]` at `elapsed`; zero-length fades are fully opaque.
    pub fn opacity(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let progress = elapsed.saturating_sub(self.start).as_secs_f32()
            / self.duration.as_secs_f32().max(f32::EPSILON);
        ease_out(progress)
    }
}

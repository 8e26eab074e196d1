const MAX_FRAME_DELTA: f64 = 0.25;

/// Converts wall-clock frame timestamps into bounded animation steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_tick: Option<f64>,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self { last_tick: None }
    }

    /// Seconds of animation time since the previous call.
    ///
    /// The first tick only records the time. Backwards jumps yield zero and
    /// long gaps (a hidden tab, a debugger pause) are clamped.
    pub fn advance(&mut self, now_seconds: f64) -> f64 {
        let delta = self
            .last_tick
            .map_or(0.0, |last| (now_seconds - last).clamp(0.0, MAX_FRAME_DELTA));
        self.last_tick = Some(now_seconds);
        delta
    }

    pub const fn last_tick(&self) -> Option<f64> {
        self.last_tick
    }
}

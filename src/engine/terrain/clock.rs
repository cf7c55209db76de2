/// Monotonic animation clock.
///
/// Time is derived from an integer tick count (`time = ticks * step`) instead of
/// being accumulated, so K ticks always land exactly on `K * step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    ticks: u64,
    step: f64,
}

impl AnimationClock {
    pub fn new(step: f64) -> Self {
        Self { ticks: 0, step }
    }

    pub fn advance(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.ticks as f64 * self.step
    }
}

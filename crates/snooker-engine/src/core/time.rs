/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Tick-driven game clock that counts down from a fixed number of seconds.
#[derive(Debug, Clone)]
pub struct Countdown {
    total_ticks: u64,
    elapsed: u64,
    ticks_per_second: u32,
}

impl Countdown {
    pub fn new(seconds: u32, ticks_per_second: u32) -> Self {
        let ticks_per_second = ticks_per_second.max(1);
        Self {
            total_ticks: seconds as u64 * ticks_per_second as u64,
            elapsed: 0,
            ticks_per_second,
        }
    }

    /// Advance one tick. Returns `true` only on the tick the clock reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.is_expired() {
            return false;
        }
        self.elapsed += 1;
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.total_ticks
    }

    /// Whole seconds left, rounded up so the display only reads 0 once expired.
    pub fn remaining_secs(&self) -> u32 {
        let left = self.total_ticks.saturating_sub(self.elapsed);
        left.div_ceil(self.ticks_per_second as u64) as u32
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(0.008); // half a frame
        assert_eq!(steps, 0);
        let steps = ts.accumulate(0.010); // over one frame total
        assert_eq!(steps, 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0);
        assert_eq!(steps, 10);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        ts.accumulate(0.008);
        let a = ts.alpha();
        assert!((0.0..=1.0).contains(&a), "alpha was {}", a);
    }

    #[test]
    fn countdown_expires_once() {
        let mut clock = Countdown::new(2, 3);
        assert_eq!(clock.remaining_secs(), 2);
        let fired: Vec<bool> = (0..8).map(|_| clock.tick()).collect();
        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert!(fired[5]);
        assert!(clock.is_expired());
        assert_eq!(clock.remaining_secs(), 0);
    }

    #[test]
    fn countdown_rounds_up() {
        let mut clock = Countdown::new(10, 60);
        clock.tick();
        assert_eq!(clock.remaining_secs(), 10);
        for _ in 0..59 {
            clock.tick();
        }
        assert_eq!(clock.remaining_secs(), 9);
        clock.reset();
        assert_eq!(clock.remaining_secs(), 10);
    }
}

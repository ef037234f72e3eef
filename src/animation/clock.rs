/// Radians of root rotation per unit of elapsed time
pub const SPIN_RATE: f32 = 0.7;

/// Converts animation-frame timestamps (milliseconds) to clock units
pub const TIMESTAMP_SCALE: f64 = 0.0008;

/// Accumulates elapsed time and exposes the current rotation angle
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Accumulated time in clock units
    pub elapsed: f32,
    /// Last timestamp seen by [`FrameClock::tick`], already scaled
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current root rotation in radians
    pub fn angle(&self) -> f32 {
        self.elapsed * SPIN_RATE
    }

    /// Add a frame delta; negative or non-finite deltas are ignored
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Delta since the previous timestamp, in clock units.
    ///
    /// The first tick measures from zero, matching a loop whose previous
    /// timestamp starts at 0. Timestamps going backwards yield 0.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let now = timestamp_ms * TIMESTAMP_SCALE;
        let then = self.last_timestamp.replace(now).unwrap_or(0.0);
        (now - then).max(0.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_follows_elapsed() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.angle(), 0.0);

        clock.advance(1.0);
        clock.advance(0.5);
        assert!((clock.angle() - 1.5 * SPIN_RATE).abs() < 1e-6);
    }

    #[test]
    fn test_advance_ignores_bad_deltas() {
        let mut clock = FrameClock::new();
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        clock.advance(f32::INFINITY);
        assert_eq!(clock.elapsed, 0.0);
    }

    #[test]
    fn test_tick_scales_timestamps() {
        let mut clock = FrameClock::new();
        assert!((clock.tick(1000.0) - 0.8).abs() < 1e-6);
        assert!((clock.tick(1500.0) - 0.4).abs() < 1e-6);
        assert_eq!(clock.tick(1200.0), 0.0);
    }
}

//! Frame clock with clamped delta time

use std::time::Instant;

/// Longest step the simulation will ever take, in seconds. A stalled frame
/// (backgrounded tab, slow device) advances by at most this much.
pub const MAX_FRAME_DELTA: f32 = 0.05;

/// Tracks time between frame callbacks.
///
/// The host decides the cadence; the clock only measures it. Callers pass the
/// callback timestamp in so tests can simulate stalls without sleeping.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Total simulated time in seconds (sum of clamped deltas)
    pub total_time: f32,
    /// Clamped time since the previous frame in seconds
    pub delta_time: f32,
    /// Upper bound for `delta_time`
    pub max_delta: f32,
    last_instant: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::with_max_delta(MAX_FRAME_DELTA)
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            max_delta,
            last_instant: None,
        }
    }

    /// Advance the clock to `now`. Call once per frame. Returns the clamped delta.
    ///
    /// The first tick after a reset yields zero so the first frame never jumps.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let Some(last) = self.last_instant.replace(now) else {
            self.delta_time = 0.0;
            return 0.0;
        };

        // saturating: a host may hand out timestamps slightly out of order
        let elapsed = now.saturating_duration_since(last).as_secs_f32();
        self.delta_time = elapsed.min(self.max_delta);
        self.total_time += self.delta_time;
        self.delta_time
    }

    /// Forget the previous timestamp, e.g. after the loop was stopped.
    pub fn reset(&mut self) {
        self.total_time = 0.0;
        self.delta_time = 0.0;
        self.last_instant = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clock_defaults() {
        let clock = FrameClock::new();
        assert_eq!(clock.max_delta, MAX_FRAME_DELTA);
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Instant::now()), 0.0);
    }

    #[test]
    fn test_regular_frame() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        let dt = clock.tick(t0 + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-4);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        let dt = clock.tick(t0 + Duration::from_secs(2));
        assert!(dt <= MAX_FRAME_DELTA);
        assert_eq!(dt, MAX_FRAME_DELTA);
        assert_eq!(clock.total_time, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_out_of_order_timestamp() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.tick(t0);
        assert_eq!(clock.tick(t0 - Duration::from_millis(10)), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        clock.tick(t0 + Duration::from_millis(20));
        clock.reset();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.tick(t0 + Duration::from_secs(5)), 0.0);
    }
}

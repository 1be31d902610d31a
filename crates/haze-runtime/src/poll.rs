//! Polling fallback for host state
//!
//! Host events are not guaranteed to be exhaustive. Once per interval the
//! machine asks a [`HostProbe`] for the player and overlay state directly and
//! corrects whatever the push events missed.

use std::time::{Duration, Instant};

/// Default polling interval (about 1 Hz)
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Best-effort inspection of host state.
///
/// Returning `None` means the probe could not tell (element missing, host API
/// threw); callers treat that as the safe default `false`.
pub trait HostProbe {
    fn player_active(&mut self) -> Option<bool>;
    fn overlay_open(&mut self) -> Option<bool>;
}

/// Rate limiter for probe calls
#[derive(Debug, Clone)]
pub struct Poller {
    pub interval: Duration,
    last_poll: Option<Instant>,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_poll: None,
        }
    }

    /// True if a poll should run at `now`; marks it as done if so.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last_poll {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_poll = Some(now);
                true
            }
        }
    }
}

/// A probe with fixed answers, for hosts without inspectable state and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProbe {
    pub player: Option<bool>,
    pub overlay: Option<bool>,
}

impl HostProbe for StaticProbe {
    fn player_active(&mut self) -> Option<bool> {
        self.player
    }

    fn overlay_open(&mut self) -> Option<bool> {
        self.overlay
    }
}

//! Platform tier classification
//!
//! The host is probed once at startup. The probe result is reduced to a closed
//! set of tiers that the lookup tables in [`crate::config`] are keyed on.

use crate::error::{HazeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse device class used for performance tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformTier {
    /// Smart TVs and set-top boxes: weak GPUs, remote-control input.
    ConstrainedTv,
    Mobile,
    Desktop,
    Other,
}

/// Raw capability information gathered from the host environment.
#[derive(Debug, Clone, Default)]
pub struct PlatformProbe {
    pub user_agent: String,
    pub max_touch_points: u32,
    pub screen_width: u32,
}

const TV_MARKERS: &[&str] = &[
    "tizen",
    "webos",
    "web0s",
    "smart-tv",
    "smarttv",
    "hbbtv",
    "netcast",
    "android tv",
    "googletv",
    "aft",
    "crkey",
    "appletv",
    "bravia",
];

const MOBILE_MARKERS: &[&str] = &["android", "iphone", "ipad", "ipod", "mobile"];

const DESKTOP_MARKERS: &[&str] = &["windows", "macintosh", "mac os x", "x11", "linux", "cros"];

impl PlatformTier {
    pub const ALL: [PlatformTier; 4] = [
        PlatformTier::ConstrainedTv,
        PlatformTier::Mobile,
        PlatformTier::Desktop,
        PlatformTier::Other,
    ];

    /// Classify a probe. TV markers win over mobile markers, which win over
    /// desktop markers; anything unrecognised is `Other`.
    pub fn classify(probe: &PlatformProbe) -> Self {
        let ua = probe.user_agent.to_ascii_lowercase();

        if TV_MARKERS.iter().any(|m| contains_word(&ua, m)) {
            return PlatformTier::ConstrainedTv;
        }
        if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
            return PlatformTier::Mobile;
        }
        if probe.max_touch_points > 0 && probe.screen_width > 0 && probe.screen_width < 1024 {
            return PlatformTier::Mobile;
        }
        if DESKTOP_MARKERS.iter().any(|m| ua.contains(m)) {
            return PlatformTier::Desktop;
        }
        PlatformTier::Other
    }

    /// Row index into the tuning tables
    pub(crate) fn index(self) -> usize {
        match self {
            PlatformTier::ConstrainedTv => 0,
            PlatformTier::Mobile => 1,
            PlatformTier::Desktop => 2,
            PlatformTier::Other => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlatformTier::ConstrainedTv => "tv",
            PlatformTier::Mobile => "mobile",
            PlatformTier::Desktop => "desktop",
            PlatformTier::Other => "other",
        }
    }
}

/// Short markers such as `aft` (Fire TV model prefix) must not match in the
/// middle of unrelated words, so they are only accepted at a word start.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.len() > 4 {
        return haystack.contains(needle);
    }
    haystack.match_indices(needle).any(|(i, _)| {
        i == 0
            || !haystack[..i]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric())
    })
}

impl FromStr for PlatformTier {
    type Err = HazeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tv" | "constrained_tv" | "constrained-tv" => Ok(PlatformTier::ConstrainedTv),
            "mobile" => Ok(PlatformTier::Mobile),
            "desktop" => Ok(PlatformTier::Desktop),
            "other" => Ok(PlatformTier::Other),
            other => Err(HazeError::UnknownPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for PlatformTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

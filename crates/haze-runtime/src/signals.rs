//! Activation signals: the last observed host context

use std::fmt;

/// One observable aspect of the host context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    OnAllowedScreen,
    InPlayer,
    OverlayOpen,
    InDetailsContext,
}

impl Signal {
    pub const ALL: [Signal; 4] = [
        Signal::OnAllowedScreen,
        Signal::InPlayer,
        Signal::OverlayOpen,
        Signal::InDetailsContext,
    ];
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Signal::OnAllowedScreen => "on_allowed_screen",
            Signal::InPlayer => "in_player",
            Signal::OverlayOpen => "overlay_open",
            Signal::InDetailsContext => "in_details_context",
        })
    }
}

/// Most recent value of every signal. Starts all-false: until the host
/// reports a screen, the effect stays off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationSignals {
    pub on_allowed_screen: bool,
    pub in_player: bool,
    pub overlay_open: bool,
    pub in_details_context: bool,
}

impl ActivationSignals {
    pub fn get(&self, signal: Signal) -> bool {
        match signal {
            Signal::OnAllowedScreen => self.on_allowed_screen,
            Signal::InPlayer => self.in_player,
            Signal::OverlayOpen => self.overlay_open,
            Signal::InDetailsContext => self.in_details_context,
        }
    }

    /// Store `value`. Returns true if it differs from the previous value.
    pub fn set(&mut self, signal: Signal, value: bool) -> bool {
        let slot = match signal {
            Signal::OnAllowedScreen => &mut self.on_allowed_screen,
            Signal::InPlayer => &mut self.in_player,
            Signal::OverlayOpen => &mut self.overlay_open,
            Signal::InDetailsContext => &mut self.in_details_context,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_false() {
        let s = ActivationSignals::default();
        for signal in Signal::ALL {
            assert!(!s.get(signal));
        }
    }

    #[test]
    fn set_reports_change() {
        let mut s = ActivationSignals::default();
        assert!(s.set(Signal::InPlayer, true));
        assert!(!s.set(Signal::InPlayer, true));
        assert!(s.get(Signal::InPlayer));
        assert!(s.set(Signal::InPlayer, false));
        assert!(!s.get(Signal::InPlayer));
    }

    #[test]
    fn signals_are_independent() {
        let mut s = ActivationSignals::default();
        s.set(Signal::OverlayOpen, true);
        assert!(s.overlay_open);
        assert!(!s.on_allowed_screen && !s.in_player && !s.in_details_context);
    }
}

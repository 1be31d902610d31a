//! Events pushed by the host application

use crate::screen::ScreenDescriptor;
use haze_core::{SimulationConfig, Viewport};

/// Something the host told us about. Delivery is best-effort: the host may
/// drop or reorder these, which is why the poller exists.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ScreenActivated(ScreenDescriptor),
    PlayerStarted,
    PlayerStopped,
    /// A modal, menu or settings overlay opened (`true`) or closed (`false`).
    OverlayChanged(bool),
    ViewportResized(Viewport),
    /// The user edited a setting; carries the freshly resolved config.
    SettingsChanged(SimulationConfig),
}

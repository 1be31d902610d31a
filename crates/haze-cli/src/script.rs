//! Scripted host sessions for `haze simulate`
//!
//! ```toml
//! [screens]
//! allowed = ["main", "catalog"]
//!
//! [[event]]
//! frame = 0
//! kind = "screen"
//! component = "main"
//!
//! [[event]]
//! frame = 120
//! kind = "player_start"
//!
//! [[event]]
//! frame = 300
//! kind = "setting"
//! key = "density"
//! value = 3
//! ```

use haze_core::settings::check_key;
use haze_core::{HazeError, Result, Viewport};
use haze_runtime::{HostEvent, ScreenDescriptor, ScreenRules};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptAction {
    Screen { component: String },
    PlayerStart,
    PlayerStop,
    Overlay { open: bool },
    Resize { width: f32, height: f32 },
    Setting { key: String, value: toml::Value },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptEvent {
    pub frame: u64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub screens: Option<ScreenRules>,
    #[serde(default, rename = "event")]
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a script. Events come back ordered by frame;
    /// events on the same frame keep their file order.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut script: Script = toml::from_str(content)?;
        for event in &script.events {
            if let ScriptAction::Setting { key, .. } = &event.action {
                check_key(key)
                    .map_err(|e| HazeError::ScriptError(format!("frame {}: {}", event.frame, e)))?;
            }
        }
        script.events.sort_by_key(|e| e.frame);
        Ok(script)
    }

    /// Events scheduled for exactly `frame`
    pub fn events_at(&self, frame: u64) -> impl Iterator<Item = &ScriptEvent> {
        self.events.iter().filter(move |e| e.frame == frame)
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.events.last().map(|e| e.frame)
    }
}

impl ScriptAction {
    /// The host event this action stands for. Setting edits have none: the
    /// caller resolves them into a `SettingsChanged` event itself.
    pub fn to_host_event(&self) -> Option<HostEvent> {
        match self {
            ScriptAction::Screen { component } => Some(HostEvent::ScreenActivated(
                ScreenDescriptor::new(component.as_str()),
            )),
            ScriptAction::PlayerStart => Some(HostEvent::PlayerStarted),
            ScriptAction::PlayerStop => Some(HostEvent::PlayerStopped),
            ScriptAction::Overlay { open } => Some(HostEvent::OverlayChanged(*open)),
            ScriptAction::Resize { width, height } => {
                Some(HostEvent::ViewportResized(Viewport::new(*width, *height)))
            }
            ScriptAction::Setting { .. } => None,
        }
    }
}

//! Screen classification
//!
//! Hosts describe the screen that just became active with an opaque
//! descriptor. Only the component name matters to us: it decides whether the
//! effect is allowed on that screen at all, and whether the screen is a
//! details card (where visibility is a separate user preference).

use serde::{Deserialize, Serialize};

/// A screen-activation payload from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenDescriptor {
    pub component: String,
}

impl ScreenDescriptor {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

/// How a screen affects activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenClass {
    /// Browsing screens where the effect may run.
    Allowed,
    /// A details card: allowed only when the in-card preference is on.
    Details,
    /// Anything else (settings, search input, player chrome...).
    Other,
}

impl ScreenClass {
    /// `(on_allowed_screen, in_details_context)` signal values for this class
    pub fn signals(self) -> (bool, bool) {
        match self {
            ScreenClass::Allowed => (true, false),
            ScreenClass::Details => (true, true),
            ScreenClass::Other => (false, false),
        }
    }
}

/// Which host components count as allowed or details screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenRules {
    pub allowed: Vec<String>,
    pub details: Vec<String>,
}

impl Default for ScreenRules {
    fn default() -> Self {
        let owned =
            |names: &[&str]| -> Vec<String> { names.iter().map(|s| s.to_string()).collect() };
        Self {
            allowed: owned(&[
                "main",
                "category",
                "category_full",
                "catalog",
                "favorite",
                "bookmarks",
                "history",
            ]),
            details: owned(&["full", "details"]),
        }
    }
}

impl ScreenRules {
    /// Component names compare case-insensitively; details rules win if a
    /// name appears in both lists.
    pub fn classify(&self, screen: &ScreenDescriptor) -> ScreenClass {
        let name = screen.component.trim();
        let matches = |list: &[String]| list.iter().any(|c| c.eq_ignore_ascii_case(name));

        if matches(&self.details) {
            ScreenClass::Details
        } else if matches(&self.allowed) {
            ScreenClass::Allowed
        } else {
            ScreenClass::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules() {
        let rules = ScreenRules::default();
        assert_eq!(rules.classify(&ScreenDescriptor::new("main")), ScreenClass::Allowed);
        assert_eq!(rules.classify(&ScreenDescriptor::new("Category_Full")), ScreenClass::Allowed);
        assert_eq!(rules.classify(&ScreenDescriptor::new("full")), ScreenClass::Details);
        assert_eq!(rules.classify(&ScreenDescriptor::new("settings")), ScreenClass::Other);
        assert_eq!(rules.classify(&ScreenDescriptor::new("")), ScreenClass::Other);
    }

    #[test]
    fn details_win_over_allowed() {
        let rules = ScreenRules {
            allowed: vec!["full".into()],
            details: vec!["full".into()],
        };
        assert_eq!(rules.classify(&ScreenDescriptor::new("full")), ScreenClass::Details);
    }

    #[test]
    fn signal_pairs() {
        assert_eq!(ScreenClass::Allowed.signals(), (true, false));
        assert_eq!(ScreenClass::Details.signals(), (true, true));
        assert_eq!(ScreenClass::Other.signals(), (false, false));
    }

    #[test]
    fn rules_from_toml() {
        let rules: ScreenRules = toml::from_str(r#"allowed = ["home"]"#).unwrap();
        assert_eq!(rules.classify(&ScreenDescriptor::new("home")), ScreenClass::Allowed);
        // details keeps its default
        assert_eq!(rules.classify(&ScreenDescriptor::new("full")), ScreenClass::Details);
    }
}

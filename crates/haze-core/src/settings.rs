//! Settings store: the host's persistent key-value configuration.
//!
//! Values are kept as [`toml::Value`] because hosts store whatever their
//! settings UI produced (booleans, integers, and quite often strings). The
//! typed accessors below are lenient: they coerce what they can and report
//! `None` for anything unusable so the resolver can fall back to defaults.

use crate::error::{HazeError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Known setting keys
pub mod keys {
    pub const ENABLED: &str = "enabled";
    pub const DENSITY: &str = "density";
    pub const SETTLE: &str = "settle";
    pub const PARTICLE_SIZE: &str = "particle_size";
    pub const SETTLE_SPEED: &str = "settle_speed";
    pub const FALL_SPEED: &str = "fall_speed";
    pub const IN_CARD_VISIBLE: &str = "in_card_visible";
    pub const SKIN: &str = "skin";

    pub const ALL: [&str; 8] = [
        ENABLED,
        DENSITY,
        SETTLE,
        PARTICLE_SIZE,
        SETTLE_SPEED,
        FALL_SPEED,
        IN_CARD_VISIBLE,
        SKIN,
    ];
}

/// Reject keys the resolver doesn't read.
pub fn check_key(key: &str) -> Result<()> {
    if keys::ALL.contains(&key) {
        Ok(())
    } else {
        Err(HazeError::InvalidSetting {
            key: key.to_string(),
            reason: format!("unknown key; valid keys: {}", keys::ALL.join(", ")),
        })
    }
}

/// A key-value store of raw setting values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    data: HashMap<String, toml::Value>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Set a value by key. Overwrites any existing value.
    pub fn set(&mut self, key: &str, value: impl Into<toml::Value>) {
        self.data.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.data.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a key, returning the old value if it existed.
    pub fn remove(&mut self, key: &str) -> Option<toml::Value> {
        self.data.remove(key)
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// All keys, sorted for stable output.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.data.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// Read a boolean. Accepts `true`/`false`, integers (non-zero is true)
    /// and the strings "true", "false", "1", "0", "yes", "no", "on", "off".
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.data.get(key)? {
            toml::Value::Boolean(b) => Some(*b),
            toml::Value::Integer(i) => Some(*i != 0),
            toml::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Read an integer. Floats are truncated toward zero and numeric strings
    /// are parsed; non-finite values are rejected.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.data.get(key)? {
            toml::Value::Integer(i) => Some(*i),
            toml::Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            toml::Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
            }
            toml::Value::Boolean(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key)?.as_str()
    }

    /// Save the store to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let mut table = toml::map::Map::new();
        for k in self.keys() {
            table.insert(k.to_string(), self.data[k].clone());
        }
        let content = toml::to_string_pretty(&table)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the store from a TOML file, replacing all current data.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        *self = Self::from_toml_str(&content)?;
        log::debug!("loaded {} setting(s) from {}", self.data.len(), path.display());
        Ok(())
    }

    /// Parse a flat TOML document into a store.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::map::Map<String, toml::Value> = toml::from_str(content)?;
        Ok(Self {
            data: table.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_only() {
        for key in keys::ALL {
            assert!(check_key(key).is_ok());
        }
        assert!(matches!(
            check_key("sparkle"),
            Err(HazeError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn set_and_get() {
        let mut store = SettingsStore::new();
        store.set(keys::DENSITY, 2);
        assert_eq!(store.get(keys::DENSITY), Some(&toml::Value::Integer(2)));
        assert_eq!(store.get_int(keys::DENSITY), Some(2));
    }

    #[test]
    fn has_and_remove() {
        let mut store = SettingsStore::new();
        store.set(keys::SKIN, "smoke");
        assert!(store.has(keys::SKIN));
        assert!(!store.has("missing"));

        let removed = store.remove(keys::SKIN);
        assert_eq!(removed, Some(toml::Value::String("smoke".into())));
        assert!(!store.has(keys::SKIN));
    }

    #[test]
    fn clear_and_keys() {
        let mut store = SettingsStore::new();
        store.set("b", 1);
        store.set("a", 2);
        assert_eq!(store.keys(), vec!["a", "b"]);

        store.clear();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn lenient_bool() {
        let mut store = SettingsStore::new();
        store.set("a", "true");
        store.set("b", "0");
        store.set("c", 3);
        store.set("d", "maybe");
        store.set("e", 1.5);
        assert_eq!(store.get_bool("a"), Some(true));
        assert_eq!(store.get_bool("b"), Some(false));
        assert_eq!(store.get_bool("c"), Some(true));
        assert_eq!(store.get_bool("d"), None);
        assert_eq!(store.get_bool("e"), None);
        assert_eq!(store.get_bool("missing"), None);
    }

    #[test]
    fn lenient_int() {
        let mut store = SettingsStore::new();
        store.set("a", "3");
        store.set("b", 2.9);
        store.set("c", " -7 ");
        store.set("d", "2.5");
        store.set("e", "lots");
        store.set("f", f64::NAN);
        assert_eq!(store.get_int("a"), Some(3));
        assert_eq!(store.get_int("b"), Some(2));
        assert_eq!(store.get_int("c"), Some(-7));
        assert_eq!(store.get_int("d"), Some(2));
        assert_eq!(store.get_int("e"), None);
        assert_eq!(store.get_int("f"), None);
    }

    #[test]
    fn save_and_load() {
        let dir = std::env::temp_dir().join("haze_settings_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("settings.toml");

        let mut store = SettingsStore::new();
        store.set(keys::DENSITY, 3);
        store.set(keys::SETTLE, false);
        store.set(keys::SKIN, "smoke");
        store.save_to_file(&path).expect("save failed");

        let mut loaded = SettingsStore::new();
        loaded.set("stale", true);
        loaded.load_from_file(&path).expect("load failed");
        assert_eq!(loaded, store);
        assert!(!loaded.has("stale"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_rejects_invalid_toml() {
        assert!(SettingsStore::from_toml_str("density = ").is_err());
    }
}

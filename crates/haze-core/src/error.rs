//! Error types for Haze

use thiserror::Error;

/// The main error type for Haze operations
#[derive(Debug, Error)]
pub enum HazeError {
    #[error("Rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Unknown platform tier: {0}")]
    UnknownPlatform(String),

    #[error("Unknown skin: {0}")]
    UnknownSkin(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Script error: {0}")]
    ScriptError(String),
}

/// Result type alias for Haze operations
pub type Result<T> = std::result::Result<T, HazeError>;

impl From<toml::de::Error> for HazeError {
    fn from(err: toml::de::Error) -> Self {
        HazeError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for HazeError {
    fn from(err: toml::ser::Error) -> Self {
        HazeError::TomlSerError(err.to_string())
    }
}

//! Settings file commands
//!
//! `set` and `unset` edit the file with `toml_edit` so comments and key
//! order survive.

use anyhow::{Context, Result};
use clap::Subcommand;
use haze_core::settings::{check_key, keys};
use haze_core::SettingsStore;
use std::path::Path;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show stored values for every known key
    Show {
        /// Path to settings file
        #[arg(long)]
        file: String,
    },

    /// Set a value, creating the file if needed
    Set {
        /// Setting key
        key: String,

        /// New value (bool, integer or string)
        value: String,

        /// Path to settings file
        #[arg(long)]
        file: String,
    },

    /// Remove a stored value so its default applies again
    Unset {
        /// Setting key
        key: String,

        /// Path to settings file
        #[arg(long)]
        file: String,
    },
}

pub fn run(cmd: SettingsCommands) -> Result<()> {
    match cmd {
        SettingsCommands::Show { file } => show(&file),
        SettingsCommands::Set { key, value, file } => set(&key, &value, &file),
        SettingsCommands::Unset { key, file } => unset(&key, &file),
    }
}

fn show(file: &str) -> Result<()> {
    let mut store = SettingsStore::new();
    store
        .load_from_file(Path::new(file))
        .with_context(|| format!("Failed to load settings from {}", file))?;

    for key in keys::ALL {
        match store.get(key) {
            Some(value) => println!("{:<16} = {}", key, value),
            None => println!("{:<16}   (default)", key),
        }
    }

    for key in store.keys() {
        if !keys::ALL.contains(&key) {
            println!("{:<16}   (unknown, ignored)", key);
        }
    }
    Ok(())
}

fn set(key: &str, value: &str, file: &str) -> Result<()> {
    check_key(key)?;
    let mut doc = load_document(file)?;
    doc[key] = toml_edit::value(parse_value(value));
    std::fs::write(file, doc.to_string())
        .with_context(|| format!("Failed to write {}", file))?;
    println!("{} = {}", key, value);
    Ok(())
}

fn unset(key: &str, file: &str) -> Result<()> {
    check_key(key)?;
    let mut doc = load_document(file)?;
    if doc.remove(key).is_none() {
        println!("{} was not set", key);
        return Ok(());
    }
    std::fs::write(file, doc.to_string())
        .with_context(|| format!("Failed to write {}", file))?;
    println!("{} removed", key);
    Ok(())
}

fn load_document(file: &str) -> Result<toml_edit::DocumentMut> {
    let path = Path::new(file);
    if !path.exists() {
        return Ok(toml_edit::DocumentMut::new());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", file))?;
    content
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("Failed to parse {}", file))
}

/// Values are stored with the most specific type they parse as. The
/// resolver accepts strings too, so nothing is lost if a guess is wrong.
fn parse_value(raw: &str) -> toml_edit::Value {
    if let Ok(b) = raw.parse::<bool>() {
        toml_edit::Value::from(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        toml_edit::Value::from(i)
    } else {
        toml_edit::Value::from(raw)
    }
}

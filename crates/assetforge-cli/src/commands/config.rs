//! Config command implementation
//!
//! Reads and writes project settings by dot-separated key path
//! (`engine.assets_directory`).

use anyhow::{Context, Result};
use assetforge_spec::config::{ConfigError, SettingsStore};
use colored::Colorize;
use serde_json::Value;
use std::path::Path;
use std::process::ExitCode;

/// Parses a command-line value: JSON when it parses, a plain string otherwise.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Prints the value at `key`.
pub fn get(settings_path: &Path, key: &str) -> Result<ExitCode> {
    let store = SettingsStore::open(settings_path)
        .with_context(|| format!("Failed to open settings {}", settings_path.display()))?;

    match store.get(key) {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("{}: '{}' is not set", "error".red().bold(), key);
            Ok(ExitCode::from(1))
        }
    }
}

/// Sets `key` to `raw` and saves the settings file, creating it when absent.
///
/// The edited document must still load as valid settings; otherwise nothing
/// is written.
pub fn set(settings_path: &Path, key: &str, raw: &str) -> Result<ExitCode> {
    let mut store = match SettingsStore::open(settings_path) {
        Ok(store) => store,
        Err(ConfigError::NotFound(_)) => SettingsStore::create_default(settings_path)
            .with_context(|| format!("Failed to create settings {}", settings_path.display()))?,
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to open settings {}", settings_path.display()))
        }
    };

    store.set(key, parse_value(raw))?;
    store
        .settings()
        .with_context(|| format!("'{}' would make the settings invalid", key))?;
    store.save()?;

    println!("{} {} = {}", "set".green().bold(), key, raw);
    Ok(ExitCode::SUCCESS)
}

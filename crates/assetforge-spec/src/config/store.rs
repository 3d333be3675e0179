//! Project settings document with dot-path access.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::{ConfigError, ProjectSettings};
use crate::fsutil::write_atomic;

/// The project's `settings.json`, loaded once and edited in memory.
///
/// Keys are addressed with dot notation, e.g. `engine.assets_directory`.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    document: Value,
}

impl SettingsStore {
    /// Loads the settings document at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let document = Self::read(&path)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(Self { path, document })
    }

    /// Writes a default settings document to `path` and opens it.
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            document: serde_json::to_value(ProjectSettings::default())?,
        };
        store.save()?;
        Ok(store)
    }

    fn read(path: &Path) -> Result<Value, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw settings document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Looks up a value by dot-separated key path.
    pub fn get(&self, key_path: &str) -> Option<&Value> {
        key_path
            .split('.')
            .try_fold(&self.document, |value, key| value.as_object()?.get(key))
    }

    /// Sets a value by dot-separated key path, creating missing parent objects.
    ///
    /// The change is in memory only until [`SettingsStore::save`].
    pub fn set(&mut self, key_path: &str, value: Value) -> Result<(), ConfigError> {
        let keys: Vec<&str> = key_path.split('.').collect();
        if keys.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "invalid key path '{}'",
                key_path
            )));
        }
        let (last, parents) = keys
            .split_last()
            .ok_or_else(|| ConfigError::Invalid("empty key path".to_string()))?;

        let not_object = |segment: &str| ConfigError::InvalidKeyPath {
            key: key_path.to_string(),
            segment: segment.to_string(),
        };

        let mut current = self.document.as_object_mut().ok_or_else(|| not_object(""))?;
        for &key in parents {
            current = current
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
                .ok_or_else(|| not_object(key))?;
        }
        current.insert(last.to_string(), value);
        Ok(())
    }

    /// Persists the document atomically.
    pub fn save(&self) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&self.document)?;
        write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }

    /// Discards in-memory changes and re-reads the file.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.document = Self::read(&self.path)?;
        Ok(())
    }

    /// Typed view of the document; missing fields take their defaults.
    pub fn settings(&self) -> Result<ProjectSettings, ConfigError> {
        Ok(ProjectSettings::deserialize(&self.document)?)
    }
}

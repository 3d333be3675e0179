//! CLI command implementations

pub mod config;
pub mod export;
pub mod manifest;
pub mod name;
pub mod rules;
pub mod validate;

mod reporting;

use anyhow::{Context, Result};
use assetforge_backend_blender::SceneSnapshot;
use assetforge_spec::config::{ConfigError, ProjectSettings, SettingsStore, SeverityOverrides};
use assetforge_spec::{AssetProfile, ExportConfig};
use clap::Args;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default project settings file.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Suffix of scene snapshot files picked up when a directory is given.
pub const SCENE_SUFFIX: &str = ".scene.json";

/// Options shared by commands that build an export configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Asset type profile (small_prop, hero_prop, modular_piece)
    #[arg(short, long, default_value = "small_prop")]
    pub profile: AssetProfile,

    /// Export directory (default: from settings, else ./Exports)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Mesh naming prefix overriding the profile's
    #[arg(long)]
    pub prefix: Option<String>,

    /// Severity override as RULE=SEVERITY; RULE may be `category/*`
    #[arg(long = "severity", value_name = "RULE=SEVERITY")]
    pub severity: Vec<String>,
}

/// Loads project settings, falling back to defaults when the file is absent.
pub fn load_settings(path: &Path) -> Result<ProjectSettings> {
    match SettingsStore::open(path) {
        Ok(store) => store
            .settings()
            .with_context(|| format!("Invalid settings in {}", path.display())),
        Err(ConfigError::NotFound(_)) => {
            tracing::debug!(path = %path.display(), "no settings file; using defaults");
            Ok(ProjectSettings::default())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load settings {}", path.display())),
    }
}

/// Builds the export configuration from settings and command-line options.
pub fn export_config(settings: &ProjectSettings, args: &ConfigArgs) -> Result<ExportConfig> {
    let mut config = settings.export_config(args.profile);
    if let Some(dir) = &args.out_dir {
        config.export_directory = dir.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.naming_prefix = Some(prefix.clone());
    }
    for pair in &args.severity {
        let (rule, severity) = SeverityOverrides::parse_pair(pair)?;
        config.severity_overrides.insert(rule, severity);
    }
    config.validate().context("Invalid export configuration")?;
    Ok(config)
}

/// Loads a scene snapshot and refreshes texture presence.
///
/// Blender-relative texture paths resolve against the scene file's folder,
/// or the snapshot's folder when the scene was never saved.
pub fn load_scene(path: &Path) -> Result<SceneSnapshot> {
    let mut scene = SceneSnapshot::load(path)
        .with_context(|| format!("Failed to load scene snapshot {}", path.display()))?;
    let base = scene
        .blend_file
        .as_deref()
        .and_then(Path::parent)
        .or_else(|| path.parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    scene.refresh_texture_presence(&base);
    Ok(scene)
}

/// Expands a path into scene snapshot files: the file itself, or every
/// `*.scene.json` below a directory in sorted order.
pub fn scene_files(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(SCENE_SUFFIX))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetforge_spec::Severity;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_settings_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, ProjectSettings::default());
    }

    #[test]
    fn test_export_config_applies_overrides() {
        let args = ConfigArgs {
            profile: AssetProfile::HeroProp,
            out_dir: Some(PathBuf::from("Build/Exports")),
            prefix: Some("PROP_".to_string()),
            severity: vec!["naming/*=warning".to_string()],
        };
        let config = export_config(&ProjectSettings::default(), &args).unwrap();

        assert_eq!(config.profile, AssetProfile::HeroProp);
        assert_eq!(config.export_directory, PathBuf::from("Build/Exports"));
        assert_eq!(config.naming_prefix.as_deref(), Some("PROP_"));
        assert_eq!(
            config.resolve_severity("naming/mesh", Severity::Error),
            Severity::Warning
        );
    }

    #[test]
    fn test_export_config_rejects_bad_severity() {
        let args = ConfigArgs {
            severity: vec!["naming/mesh".to_string()],
            ..Default::default()
        };
        assert!(export_config(&ProjectSettings::default(), &args).is_err());
    }

    #[test]
    fn test_scene_files_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("props")).unwrap();
        std::fs::write(dir.path().join("props/b.scene.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.scene.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let files = scene_files(dir.path());
        assert_eq!(
            files,
            vec![
                dir.path().join("a.scene.json"),
                dir.path().join("props/b.scene.json"),
            ]
        );

        let single = dir.path().join("a.scene.json");
        assert_eq!(scene_files(&single), vec![single.clone()]);
    }
}

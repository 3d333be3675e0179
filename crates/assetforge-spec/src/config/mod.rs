//! Export configuration, asset type profiles and project settings.
//!
//! Configuration comes in three layers:
//!
//! - [`ProfileConfig`]: per-profile naming rules, severity overrides and budgets.
//!   Built-in presets live in [`profiles`].
//! - [`ProjectSettings`]: the project's `settings.json`, managed through
//!   [`SettingsStore`].
//! - [`ExportConfig`]: the options of one export operation, as set in the UI.

mod profiles;
mod store;

pub use store::SettingsStore;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::asset::{AssetProfile, EntityKind};
use crate::finding::Severity;
use crate::texture::TextureRole;

/// Errors raised while loading or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file does not exist.
    #[error("settings file not found at {0}")]
    NotFound(PathBuf),

    /// Failed to read or write the settings file.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings JSON could not be parsed or does not match the schema.
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A dot-separated key path runs through a non-object value.
    #[error("cannot navigate to {key}: '{segment}' is not an object")]
    InvalidKeyPath { key: String, segment: String },

    /// A naming rule pattern is not a valid regular expression.
    #[error("invalid naming pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Any other semantic problem.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Letter case required for the body of a name (between prefix and suffix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseConvention {
    /// No requirement.
    #[default]
    Any,
    /// Every underscore-separated segment starts with an uppercase letter or digit.
    Pascal,
    /// Lowercase letters, digits and underscores only.
    Lower,
    /// Uppercase letters, digits and underscores only.
    Upper,
}

/// Naming requirements for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingRule {
    /// Required prefix, e.g. `SM_`.
    pub prefix: Option<String>,
    /// Required suffix, e.g. `_MOD`.
    pub suffix: Option<String>,
    /// Characters that may not appear in the name.
    pub disallowed_characters: String,
    pub case: CaseConvention,
    /// Optional regular expression the full name must match.
    pub pattern: Option<String>,
}

impl Default for NamingRule {
    fn default() -> Self {
        Self {
            prefix: None,
            suffix: None,
            disallowed_characters: NamingRule::DEFAULT_DISALLOWED.to_string(),
            case: CaseConvention::Any,
            pattern: None,
        }
    }
}

impl NamingRule {
    /// Characters rejected by default: whitespace and path or punctuation
    /// characters engines and file systems trip over.
    pub const DEFAULT_DISALLOWED: &'static str = " \t.-/\\:*?\"<>|()[]{}#%&$@!'`,;=+~^";

    /// Creates a rule requiring `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Default::default()
        }
    }

    /// Builder method to require a suffix.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Builder method to set the case convention.
    pub fn case(mut self, case: CaseConvention) -> Self {
        self.case = case;
        self
    }

    /// Builder method to set a full-name pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Compiles the optional pattern.
    pub fn compiled_pattern(&self) -> Result<Option<Regex>, ConfigError> {
        self.pattern
            .as_deref()
            .map(|p| {
                Regex::new(p).map_err(|source| ConfigError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .transpose()
    }
}

/// Naming rules for every entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConventions {
    pub mesh: NamingRule,
    pub material: NamingRule,
    pub texture: NamingRule,
}

impl NamingConventions {
    pub fn rule(&self, kind: EntityKind) -> &NamingRule {
        match kind {
            EntityKind::Mesh => &self.mesh,
            EntityKind::Material => &self.material,
            EntityKind::Texture => &self.texture,
        }
    }
}

/// Rule-id → severity table.
///
/// Keys are exact rule ids (`geometry/missing-uv`) or category wildcards
/// (`naming/*`). Exact keys win over wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityOverrides(BTreeMap<String, Severity>);

impl SeverityOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add an override.
    pub fn with(mut self, key: impl Into<String>, severity: Severity) -> Self {
        self.0.insert(key.into(), severity);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, severity: Severity) {
        self.0.insert(key.into(), severity);
    }

    /// Looks up the override for a rule, exact key first, then wildcard.
    pub fn lookup(&self, rule_id: &str) -> Option<Severity> {
        if let Some(severity) = self.0.get(rule_id) {
            return Some(*severity);
        }
        let category = rule_id.split('/').next()?;
        self.0.get(&format!("{}/*", category)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Severity)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a `rule-id=severity` pair as given on the command line.
    pub fn parse_pair(pair: &str) -> Result<(String, Severity), ConfigError> {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            ConfigError::Invalid(format!("expected RULE=SEVERITY, got '{}'", pair))
        })?;
        let severity = value.trim().parse::<Severity>().map_err(ConfigError::Invalid)?;
        Ok((key.trim().to_string(), severity))
    }
}

/// Per-profile configuration bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub naming: NamingConventions,
    #[serde(default)]
    pub severity_overrides: SeverityOverrides,
    /// Triangle budget for the evaluated mesh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_triangles: Option<u32>,
}

/// Maps a file-name token to a texture role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRoleToken {
    /// Suffix of the file stem, matched case-insensitively (e.g. `_N`).
    pub token: String,
    pub role: TextureRole,
}

impl TextureRoleToken {
    pub fn new(token: impl Into<String>, role: TextureRole) -> Self {
        Self {
            token: token.into(),
            role,
        }
    }

    /// The default token table.
    pub fn defaults() -> Vec<TextureRoleToken> {
        vec![
            Self::new("_BC", TextureRole::Albedo),
            Self::new("_D", TextureRole::Albedo),
            Self::new("_Albedo", TextureRole::Albedo),
            Self::new("_BaseColor", TextureRole::Albedo),
            Self::new("_N", TextureRole::Normal),
            Self::new("_Normal", TextureRole::Normal),
            Self::new("_R", TextureRole::Roughness),
            Self::new("_Roughness", TextureRole::Roughness),
            Self::new("_M", TextureRole::Metallic),
            Self::new("_Metallic", TextureRole::Metallic),
            Self::new("_AO", TextureRole::AmbientOcclusion),
            Self::new("_E", TextureRole::Emissive),
            Self::new("_Emissive", TextureRole::Emissive),
            Self::new("_O", TextureRole::Opacity),
            Self::new("_Opacity", TextureRole::Opacity),
            Self::new("_H", TextureRole::Height),
            Self::new("_Height", TextureRole::Height),
        ]
    }
}

/// Options passed to the host FBX exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Evaluate modifiers before writing; the exporter contract requires this.
    pub apply_modifiers: bool,
    pub apply_unit_scale: bool,
    pub axis_forward: String,
    pub axis_up: String,
    pub add_leaf_bones: bool,
    pub bake_animation: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            apply_modifiers: true,
            apply_unit_scale: true,
            axis_forward: "-Y".to_string(),
            axis_up: "Z".to_string(),
            add_leaf_bones: false,
            bake_animation: false,
        }
    }
}

/// Engine-side import settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Engine content root the importer places assets under.
    pub assets_directory: String,
    /// Parent material for created material instances.
    pub master_material: Option<String>,
    /// Texture role → material-instance parameter name.
    pub slot_table: BTreeMap<TextureRole, String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let slot_table = [
            (TextureRole::Albedo, "BaseColor"),
            (TextureRole::Normal, "Normal"),
            (TextureRole::Roughness, "Roughness"),
            (TextureRole::Metallic, "Metallic"),
            (TextureRole::AmbientOcclusion, "AmbientOcclusion"),
            (TextureRole::Emissive, "Emissive"),
            (TextureRole::Opacity, "Opacity"),
            (TextureRole::Height, "Height"),
        ]
        .into_iter()
        .map(|(role, slot)| (role, slot.to_string()))
        .collect();

        Self {
            assets_directory: "/Game/Assets".to_string(),
            master_material: None,
            slot_table,
        }
    }
}

/// Export defaults stored in the project settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    pub directory: PathBuf,
    pub naming_prefix: Option<String>,
    pub severity_overrides: SeverityOverrides,
    pub options: ExportOptions,
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("Exports"),
            naming_prefix: None,
            severity_overrides: SeverityOverrides::default(),
            options: ExportOptions::default(),
        }
    }
}

/// Typed view of the project's `settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Profile overrides; profiles missing here use the built-in preset.
    pub profiles: BTreeMap<AssetProfile, ProfileConfig>,
    pub texture_roles: Vec<TextureRoleToken>,
    pub engine: EngineSettings,
    pub export: ExportDefaults,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::new(),
            texture_roles: TextureRoleToken::defaults(),
            engine: EngineSettings::default(),
            export: ExportDefaults::default(),
        }
    }
}

impl ProjectSettings {
    /// Returns the configuration for a profile.
    pub fn profile(&self, profile: AssetProfile) -> ProfileConfig {
        self.profiles
            .get(&profile)
            .cloned()
            .unwrap_or_else(|| ProfileConfig::preset(profile))
    }

    /// Builds the export configuration for one operation.
    pub fn export_config(&self, profile: AssetProfile) -> ExportConfig {
        ExportConfig {
            profile,
            profile_settings: self.profile(profile),
            export_directory: self.export.directory.clone(),
            naming_prefix: self.export.naming_prefix.clone(),
            severity_overrides: self.export.severity_overrides.clone(),
            options: self.export.options.clone(),
            engine: self.engine.clone(),
            texture_roles: self.texture_roles.clone(),
        }
    }
}

/// Configuration of a single export operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub profile: AssetProfile,
    /// Resolved settings for `profile`.
    pub profile_settings: ProfileConfig,
    pub export_directory: PathBuf,
    /// Overrides the mesh prefix required by the profile.
    #[serde(default)]
    pub naming_prefix: Option<String>,
    /// User severity overrides, applied over the profile's.
    #[serde(default)]
    pub severity_overrides: SeverityOverrides,
    #[serde(default)]
    pub options: ExportOptions,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default = "TextureRoleToken::defaults")]
    pub texture_roles: Vec<TextureRoleToken>,
}

impl ExportConfig {
    /// Creates a configuration using the built-in preset for `profile`.
    pub fn new(profile: AssetProfile, export_directory: impl AsRef<Path>) -> Self {
        Self {
            profile,
            profile_settings: ProfileConfig::preset(profile),
            export_directory: export_directory.as_ref().to_path_buf(),
            naming_prefix: None,
            severity_overrides: SeverityOverrides::default(),
            options: ExportOptions::default(),
            engine: EngineSettings::default(),
            texture_roles: TextureRoleToken::defaults(),
        }
    }

    /// Builder method to set the naming prefix.
    pub fn naming_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.naming_prefix = Some(prefix.into());
        self
    }

    /// Builder method to add a severity override.
    pub fn severity_override(mut self, rule_id: impl Into<String>, severity: Severity) -> Self {
        self.severity_overrides.insert(rule_id, severity);
        self
    }

    /// Builder method to set the engine master material.
    pub fn master_material(mut self, path: impl Into<String>) -> Self {
        self.engine.master_material = Some(path.into());
        self
    }

    /// Naming rule for `kind`, with the naming prefix applied to meshes.
    pub fn naming_rule(&self, kind: EntityKind) -> NamingRule {
        let mut rule = self.profile_settings.naming.rule(kind).clone();
        if kind == EntityKind::Mesh {
            if let Some(prefix) = &self.naming_prefix {
                rule.prefix = Some(prefix.clone());
            }
        }
        rule
    }

    /// Effective severity of a rule.
    ///
    /// User overrides win over profile overrides, which win over the default.
    pub fn resolve_severity(&self, rule_id: &str, default: Severity) -> Severity {
        self.severity_overrides
            .lookup(rule_id)
            .or_else(|| self.profile_settings.severity_overrides.lookup(rule_id))
            .unwrap_or(default)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export_directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "export directory must not be empty".to_string(),
            ));
        }
        for kind in [EntityKind::Mesh, EntityKind::Material, EntityKind::Texture] {
            self.naming_rule(kind).compiled_pattern()?;
        }
        if !self.options.apply_modifiers {
            return Err(ConfigError::Invalid(
                "exports must be written with modifiers applied".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_override_lookup_exact_beats_wildcard() {
        let overrides = SeverityOverrides::new()
            .with("naming/*", Severity::Error)
            .with("naming/texture", Severity::Warning);

        assert_eq!(overrides.lookup("naming/mesh"), Some(Severity::Error));
        assert_eq!(overrides.lookup("naming/texture"), Some(Severity::Warning));
        assert_eq!(overrides.lookup("geometry/missing-uv"), None);
    }

    #[test]
    fn test_resolution_order() {
        let config = ExportConfig::new(AssetProfile::HeroProp, "out")
            .severity_override("texture/colorspace-mismatch", Severity::Warning);

        // Hero props escalate colorspace mismatches; the user override wins.
        assert_eq!(
            config.resolve_severity("texture/colorspace-mismatch", Severity::Warning),
            Severity::Warning
        );
        // Profile override applies when the user has none.
        assert_eq!(
            config.resolve_severity("naming/mesh", Severity::Warning),
            Severity::Error
        );
        // Default otherwise.
        assert_eq!(
            config.resolve_severity("material/complex-input", Severity::Warning),
            Severity::Warning
        );
    }

    #[test]
    fn test_naming_prefix_overrides_mesh_rule_only() {
        let config = ExportConfig::new(AssetProfile::SmallProp, "out").naming_prefix("PROP_");
        assert_eq!(
            config.naming_rule(EntityKind::Mesh).prefix.as_deref(),
            Some("PROP_")
        );
        assert_eq!(
            config.naming_rule(EntityKind::Material).prefix.as_deref(),
            Some("MI_")
        );
    }

    #[test]
    fn test_parse_pair() {
        let (rule, severity) = SeverityOverrides::parse_pair("geometry/missing-uv=warning").unwrap();
        assert_eq!(rule, "geometry/missing-uv");
        assert_eq!(severity, Severity::Warning);
        assert!(SeverityOverrides::parse_pair("geometry/missing-uv").is_err());
        assert!(SeverityOverrides::parse_pair("a=fatal").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let mut config = ExportConfig::new(AssetProfile::SmallProp, "out");
        config.profile_settings.naming.mesh.pattern = Some("([".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_validate_requires_modifiers_applied() {
        let mut config = ExportConfig::new(AssetProfile::SmallProp, "out");
        config.options.apply_modifiers = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_project_settings_defaults_from_empty_json() {
        let settings: ProjectSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ProjectSettings::default());
        assert_eq!(
            settings.profile(AssetProfile::HeroProp),
            ProfileConfig::preset(AssetProfile::HeroProp)
        );
    }

    #[test]
    fn test_project_settings_profile_table() {
        let json = r#"{
            "profiles": {
                "small_prop": {
                    "naming": { "mesh": { "prefix": "P_" } },
                    "max_triangles": 1000
                }
            },
            "engine": { "assets_directory": "/Game/Props" }
        }"#;
        let settings: ProjectSettings = serde_json::from_str(json).unwrap();
        let profile = settings.profile(AssetProfile::SmallProp);
        assert_eq!(profile.naming.mesh.prefix.as_deref(), Some("P_"));
        assert_eq!(profile.max_triangles, Some(1000));
        assert_eq!(settings.engine.assets_directory, "/Game/Props");
        // Unlisted fields keep their defaults.
        assert_eq!(
            settings.engine.slot_table.get(&TextureRole::Normal).map(String::as_str),
            Some("Normal")
        );

        let config = settings.export_config(AssetProfile::SmallProp);
        assert_eq!(config.naming_rule(EntityKind::Mesh).prefix.as_deref(), Some("P_"));
    }
}

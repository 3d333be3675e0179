//! Export manifest: the JSON document handed to the engine-side importer.
//!
//! A manifest is written next to the FBX for every successful export. It is
//! the only contract with the importer, so it carries everything needed to
//! recreate the asset on the engine side without re-inspecting the source:
//! mesh statistics, per-material input classification and texture
//! dependencies, the validation summary and engine-import hints.

mod builder;
mod hints;

#[cfg(test)]
mod tests;

pub use builder::{ManifestBuilder, NormalizedNames};
pub use hints::{
    static_switch_name, DestinationFolders, EngineImportHints, MaterialInstanceHint,
    TextureBinding,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::asset::AssetProfile;
use crate::config::{ExportOptions, NamingConventions, SeverityOverrides};
use crate::error::ManifestError;
use crate::finding::ValidationSection;
use crate::hash;
use crate::material::{Complexity, ShaderInput};
use crate::mesh::MeshStats;
use crate::shader::{Colorspace, ShaderSlot};
use crate::texture::TextureRole;

/// Schema identifier written to every manifest.
pub const MANIFEST_SCHEMA: &str = "assetforge.export";

/// Current manifest schema version. Readers accept any version with the
/// same major number.
pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";

/// Export manifest for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub schema: String,
    pub schema_version: String,
    /// Naming-corrected final asset name.
    pub asset_name: String,
    pub asset_type_profile: AssetProfile,
    pub source: SourceInfo,
    /// Snapshot of the configuration the export ran with.
    pub export_config: ExportSection,
    pub mesh_stats: MeshStats,
    pub materials: Vec<MaterialEntry>,
    pub validation: ValidationSection,
    pub engine_import: EngineImportHints,
    /// BLAKE3 of the canonical manifest without `timestamp` and `content_hash`.
    pub content_hash: String,
    /// UTC build time, RFC 3339.
    pub timestamp: String,
}

/// Where the asset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Object name in the host scene.
    pub object_name: String,
    /// Naming-corrected name.
    pub normalized_name: String,
    /// Host scene file, when saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_file: Option<String>,
}

/// Export configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSection {
    /// Target engine, always `unreal`.
    pub target: String,
    /// Mesh interchange format, always `fbx`.
    pub format: String,
    pub directory: String,
    pub fbx_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming_prefix: Option<String>,
    /// Naming rules in effect (profile rules with the naming prefix applied).
    pub naming: NamingConventions,
    /// User severity overrides.
    #[serde(default, skip_serializing_if = "SeverityOverrides::is_empty")]
    pub severity_overrides: SeverityOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_triangles: Option<u32>,
    pub options: ExportOptions,
}

/// One material's analysis as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub material_name: String,
    /// Naming-corrected material-instance name.
    pub normalized_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shader_type: Option<String>,
    /// Worst-case complexity over all inputs.
    pub complexity: Complexity,
    /// Per-slot complexity summary.
    pub slot_complexity: BTreeMap<ShaderSlot, Complexity>,
    pub inputs: BTreeMap<ShaderSlot, ShaderInput>,
    /// Sorted by texture name, then role.
    pub texture_dependencies: Vec<TextureDependency>,
}

impl MaterialEntry {
    /// True if `texture` is one of this material's dependencies.
    pub fn depends_on(&self, texture: &str) -> bool {
        self.texture_dependencies.iter().any(|d| d.name == texture)
    }
}

/// A texture a material depends on, with its inferred role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureDependency {
    pub name: String,
    pub normalized_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub role: TextureRole,
    /// Colorspace the engine must sample the texture with.
    pub colorspace: Colorspace,
}

impl ExportManifest {
    /// Creates a new manifest builder.
    pub fn builder<'a>(
        asset: &'a crate::asset::AssetIdentity,
        config: &'a crate::config::ExportConfig,
        validation: &'a crate::finding::ValidationResult,
    ) -> ManifestBuilder<'a> {
        ManifestBuilder::new(asset, config, validation)
    }

    /// Serializes the manifest to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a manifest, rejecting foreign schemas and newer major versions.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        let schema = value.get("schema").and_then(|v| v.as_str()).unwrap_or("");
        if schema != MANIFEST_SCHEMA {
            return Err(ManifestError::UnknownSchema(schema.to_string()));
        }
        let version = value
            .get("schema_version")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        check_schema_version(version)?;

        Ok(serde_json::from_value(value)?)
    }

    /// Manifest file name for an asset.
    ///
    /// ```
    /// use assetforge_spec::manifest::ExportManifest;
    ///
    /// assert_eq!(ExportManifest::filename("SM_Crate"), "SM_Crate.manifest.json");
    /// ```
    pub fn filename(asset_name: &str) -> String {
        format!("{}.manifest.json", asset_name)
    }

    /// FBX file name for an asset.
    pub fn fbx_filename(asset_name: &str) -> String {
        format!("{}.fbx", asset_name)
    }

    /// Recomputes the content hash from the manifest's current content.
    pub fn compute_content_hash(&self) -> Result<String, ManifestError> {
        let value = serde_json::to_value(self)?;
        Ok(hash::content_hash(&value))
    }

    /// Checks the manifest is one the importer can trust.
    ///
    /// Verifies the schema, that no errors are listed, that every texture
    /// binding refers to a dependency of its material, and the content hash.
    pub fn verify(&self) -> Result<(), ManifestError> {
        if self.schema != MANIFEST_SCHEMA {
            return Err(ManifestError::UnknownSchema(self.schema.clone()));
        }
        check_schema_version(&self.schema_version)?;

        if !self.validation.errors.is_empty() || !self.validation.passed {
            return Err(ManifestError::ContainsErrors(
                self.validation.errors.len(),
            ));
        }

        for binding in self.engine_import.bindings() {
            let known = self
                .materials
                .iter()
                .any(|m| m.material_name == binding.material && m.depends_on(&binding.texture));
            if !known {
                return Err(ManifestError::InconsistentHints {
                    material: binding.material.clone(),
                    texture: binding.texture.clone(),
                });
            }
        }

        let computed = self.compute_content_hash()?;
        if computed != self.content_hash {
            return Err(ManifestError::HashMismatch {
                stored: self.content_hash.clone(),
                computed,
            });
        }
        Ok(())
    }
}

fn check_schema_version(version: &str) -> Result<(), ManifestError> {
    let major = |v: &str| v.split('.').next().and_then(|m| m.parse::<u32>().ok());
    match (major(version), major(MANIFEST_SCHEMA_VERSION)) {
        (Some(found), Some(supported)) if found <= supported => Ok(()),
        _ => Err(ManifestError::UnsupportedVersion {
            found: version.to_string(),
            supported: MANIFEST_SCHEMA_VERSION.to_string(),
        }),
    }
}

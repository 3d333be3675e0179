//! Pure manifest assembly.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::{
    EngineImportHints, ExportManifest, ExportSection, MaterialEntry, SourceInfo,
    TextureDependency, MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION,
};
use crate::asset::{AssetIdentity, EntityKind};
use crate::config::{ExportConfig, NamingConventions};
use crate::error::ManifestError;
use crate::finding::{ValidationResult, ValidationSection};
use crate::material::MaterialAnalysis;
use crate::mesh::MeshStats;
use crate::texture::{TextureClassification, TextureRole};

/// Naming-corrected names for the asset, its materials and textures.
///
/// Entries missing here fall back to the source name (texture stem for
/// textures).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedNames {
    pub asset: Option<String>,
    /// Material name → corrected instance name.
    pub materials: BTreeMap<String, String>,
    /// Texture name → corrected texture asset name.
    pub textures: BTreeMap<String, String>,
}

/// Builder assembling an [`ExportManifest`] from analysis outputs.
///
/// Building is pure: identical inputs give identical manifests apart from the
/// caller-supplied timestamp.
pub struct ManifestBuilder<'a> {
    asset: &'a AssetIdentity,
    config: &'a ExportConfig,
    validation: &'a ValidationResult,
    mesh_stats: Option<&'a MeshStats>,
    materials: &'a [MaterialAnalysis],
    textures: &'a [TextureClassification],
    names: NormalizedNames,
    blend_file: Option<String>,
}

impl<'a> ManifestBuilder<'a> {
    /// Creates a builder for `asset` exported with `config`.
    pub fn new(
        asset: &'a AssetIdentity,
        config: &'a ExportConfig,
        validation: &'a ValidationResult,
    ) -> Self {
        Self {
            asset,
            config,
            validation,
            mesh_stats: None,
            materials: &[],
            textures: &[],
            names: NormalizedNames::default(),
            blend_file: None,
        }
    }

    /// Sets the evaluated mesh statistics.
    pub fn mesh_stats(mut self, stats: &'a MeshStats) -> Self {
        self.mesh_stats = Some(stats);
        self
    }

    /// Sets the material analyses, in material slot order.
    pub fn materials(mut self, materials: &'a [MaterialAnalysis]) -> Self {
        self.materials = materials;
        self
    }

    /// Sets the texture classifications.
    pub fn textures(mut self, textures: &'a [TextureClassification]) -> Self {
        self.textures = textures;
        self
    }

    /// Sets naming-corrected names.
    pub fn normalized_names(mut self, names: NormalizedNames) -> Self {
        self.names = names;
        self
    }

    /// Records the host scene file.
    pub fn blend_file(mut self, path: impl Into<String>) -> Self {
        self.blend_file = Some(path.into());
        self
    }

    /// Builds the manifest.
    ///
    /// Fails when the validation result contains errors or mesh statistics
    /// were not supplied.
    pub fn build(self, timestamp: impl Into<String>) -> Result<ExportManifest, ManifestError> {
        if self.validation.has_errors() {
            return Err(ManifestError::ValidationFailed(
                self.validation.error_count(),
            ));
        }
        let mesh_stats = self
            .mesh_stats
            .ok_or_else(|| ManifestError::MissingMeshStats(self.asset.name.clone()))?;

        let asset_name = self
            .names
            .asset
            .clone()
            .unwrap_or_else(|| self.asset.name.clone());

        let materials: Vec<MaterialEntry> = self
            .materials
            .iter()
            .map(|analysis| self.material_entry(analysis))
            .collect();

        let engine_import = EngineImportHints::derive(&asset_name, &materials, &self.config.engine);

        let mut manifest = ExportManifest {
            schema: MANIFEST_SCHEMA.to_string(),
            schema_version: MANIFEST_SCHEMA_VERSION.to_string(),
            asset_name: asset_name.clone(),
            asset_type_profile: self.asset.profile,
            source: SourceInfo {
                object_name: self.asset.name.clone(),
                normalized_name: asset_name.clone(),
                blend_file: self.blend_file.clone(),
            },
            export_config: self.export_section(&asset_name),
            mesh_stats: mesh_stats.clone(),
            materials,
            validation: ValidationSection::from(self.validation),
            engine_import,
            content_hash: String::new(),
            timestamp: timestamp.into(),
        };
        manifest.content_hash = manifest.compute_content_hash()?;

        tracing::debug!(
            asset = %manifest.asset_name,
            materials = manifest.materials.len(),
            warnings = manifest.validation.warnings.len(),
            hash = %manifest.content_hash,
            "built manifest"
        );
        Ok(manifest)
    }

    fn export_section(&self, asset_name: &str) -> ExportSection {
        let directory = &self.config.export_directory;
        let fbx_path = directory.join(ExportManifest::fbx_filename(asset_name));
        ExportSection {
            target: "unreal".to_string(),
            format: "fbx".to_string(),
            directory: path_string(directory),
            fbx_path: path_string(&fbx_path),
            naming_prefix: self.config.naming_prefix.clone(),
            naming: NamingConventions {
                mesh: self.config.naming_rule(EntityKind::Mesh),
                material: self.config.naming_rule(EntityKind::Material),
                texture: self.config.naming_rule(EntityKind::Texture),
            },
            severity_overrides: self.config.severity_overrides.clone(),
            max_triangles: self.config.profile_settings.max_triangles,
            options: self.config.options.clone(),
        }
    }

    fn material_entry(&self, analysis: &MaterialAnalysis) -> MaterialEntry {
        let normalized_name = self
            .names
            .materials
            .get(&analysis.material_name)
            .cloned()
            .unwrap_or_else(|| analysis.material_name.clone());

        MaterialEntry {
            material_name: analysis.material_name.clone(),
            normalized_name,
            shader_type: analysis.shader_type.clone(),
            complexity: analysis.complexity,
            slot_complexity: analysis.slot_complexity(),
            inputs: analysis.inputs.clone(),
            texture_dependencies: self.dependencies(analysis),
        }
    }

    /// Dependencies of one material, one entry per (texture, role).
    fn dependencies(&self, analysis: &MaterialAnalysis) -> Vec<TextureDependency> {
        let mut deps = BTreeSet::new();

        for texture in &analysis.texture_dependencies {
            let normalized_name = self
                .names
                .textures
                .get(&texture.name)
                .cloned()
                .unwrap_or_else(|| texture.stem().to_string());

            let mut classified = self
                .textures
                .iter()
                .filter(|c| c.material == analysis.material_name && c.texture == texture.name)
                .peekable();

            if classified.peek().is_none() {
                deps.insert(TextureDependency {
                    name: texture.name.clone(),
                    normalized_name,
                    path: texture.path.clone(),
                    role: TextureRole::Unknown,
                    colorspace: texture.colorspace,
                });
                continue;
            }
            for classification in classified {
                deps.insert(TextureDependency {
                    name: texture.name.clone(),
                    normalized_name: normalized_name.clone(),
                    path: texture.path.clone(),
                    role: classification.role,
                    colorspace: classification.colorspace,
                });
            }
        }

        deps.into_iter().collect()
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

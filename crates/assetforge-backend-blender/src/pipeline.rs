//! The export pipeline.
//!
//! inspect → analyze → classify → check names → validate → build manifest →
//! hand off to the mesh exporter → write the manifest. Everything up to the
//! hand-off is pure and runs in [`analyze_selection`]; [`run_export`] adds
//! the file writes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use assetforge_analysis::mesh::inspect;
use assetforge_analysis::naming::{NamingCheck, NamingEngine};
use assetforge_analysis::shader::analyze_material;
use assetforge_analysis::texture::TextureClassifier;
use assetforge_lint::{RuleContext, RuleRegistry};
use assetforge_spec::asset::{AssetIdentity, EntityKind};
use assetforge_spec::config::ExportConfig;
use assetforge_spec::finding::{Category, Finding, Severity, ValidationResult};
use assetforge_spec::fsutil::write_atomic;
use assetforge_spec::manifest::{ExportManifest, ManifestBuilder, NormalizedNames};
use assetforge_spec::material::MaterialAnalysis;
use assetforge_spec::mesh::MeshInspection;
use assetforge_spec::texture::TextureClassification;

use crate::error::{ExportError, ExportResult, HostError};
use crate::exporter::{ExportRequest, MeshExporter};
use crate::host::HostScene;

/// Rule id of the finding recorded when the manifest cannot be written.
pub const MANIFEST_WRITE_FAILED_RULE: &str = "export/manifest-write-failed";

/// Rule id of the finding for a selection without mesh data.
pub const MISSING_MESH_RULE: &str = "geometry/missing-mesh";

/// Everything learned about the selected asset, before any file is written.
#[derive(Debug, Clone)]
pub struct AssetAnalysis {
    pub asset: AssetIdentity,
    pub blend_file: Option<PathBuf>,
    /// `None` when the selected object has no mesh data.
    pub mesh: Option<MeshInspection>,
    /// One analysis per distinct material, in slot order.
    pub materials: Vec<MaterialAnalysis>,
    pub textures: Vec<TextureClassification>,
    pub naming: Vec<NamingCheck>,
    pub normalized: NormalizedNames,
    pub validation: ValidationResult,
}

impl AssetAnalysis {
    /// Name the asset is exported under.
    pub fn export_name(&self) -> &str {
        self.normalized.asset.as_deref().unwrap_or(&self.asset.name)
    }
}

/// Result of [`run_export`].
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// FBX and manifest were written. `validation` carries the warnings.
    Success {
        manifest_path: PathBuf,
        fbx_path: PathBuf,
        validation: ValidationResult,
    },
    /// Validation found errors; nothing was written.
    Blocked(ValidationResult),
}

impl ExportOutcome {
    pub fn validation(&self) -> &ValidationResult {
        match self {
            ExportOutcome::Success { validation, .. } => validation,
            ExportOutcome::Blocked(validation) => validation,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Success { .. })
    }
}

/// Runs every analysis stage and the validation rules on the active object.
///
/// Data-quality problems end up as findings; only host access and
/// configuration faults are errors.
pub fn analyze_selection(scene: &dyn HostScene, config: &ExportConfig) -> ExportResult<AssetAnalysis> {
    analyze_selection_with(scene, config, &RuleRegistry::default_rules())
}

/// [`analyze_selection`] with a caller-supplied rule registry.
pub fn analyze_selection_with(
    scene: &dyn HostScene,
    config: &ExportConfig,
    registry: &RuleRegistry,
) -> ExportResult<AssetAnalysis> {
    config.validate()?;

    let selection = scene.selection()?;
    let object_name = selection.first().ok_or(HostError::NothingSelected)?.clone();
    if selection.len() > 1 {
        tracing::debug!(active = %object_name, ignored = selection.len() - 1, "exporting active object only");
    }
    let asset = AssetIdentity::new(object_name.as_str(), config.profile);

    let mesh = scene.mesh_source(&object_name)?.map(|data| inspect(&data));

    let mut seen = BTreeSet::new();
    let mut materials = Vec::new();
    for name in scene.material_slots(&object_name)? {
        if !seen.insert(name.clone()) {
            continue;
        }
        let graph = scene.shader_graph(&name)?;
        materials.push(analyze_material(&name, graph.as_ref()));
    }

    let classifier = TextureClassifier::from_config(config);
    let textures: Vec<TextureClassification> = materials
        .iter()
        .flat_map(|m| classifier.classify_material(m))
        .collect();

    let engine = NamingEngine::from_config(config)?;
    let (naming, normalized) = check_names(&engine, &asset, &materials);

    let ctx = RuleContext {
        asset: &asset,
        config,
        mesh: mesh.as_ref(),
        materials: &materials,
        textures: &textures,
        naming: &naming,
    };
    let validation = registry.validate(&ctx);

    tracing::debug!(
        asset = %asset.name,
        profile = %asset.profile,
        materials = materials.len(),
        textures = textures.len(),
        errors = validation.error_count(),
        warnings = validation.warning_count(),
        "analyzed selection"
    );

    Ok(AssetAnalysis {
        blend_file: scene.blend_file(),
        asset,
        mesh,
        materials,
        textures,
        naming,
        normalized,
        validation,
    })
}

/// Checks the asset, material and texture names.
///
/// Textures are checked by file stem, once per texture. Corrected names are
/// recorded for every entity; a passing name maps to itself.
fn check_names(
    engine: &NamingEngine,
    asset: &AssetIdentity,
    materials: &[MaterialAnalysis],
) -> (Vec<NamingCheck>, NormalizedNames) {
    let mut checks = Vec::new();
    let mut normalized = NormalizedNames::default();

    let check = engine.check(&asset.name, EntityKind::Mesh);
    normalized.asset = check.suggestion.clone();
    checks.push(check);

    for material in materials {
        let check = engine.check(&material.material_name, EntityKind::Material);
        normalized.materials.insert(
            material.material_name.clone(),
            check.suggestion.clone().unwrap_or_else(|| material.material_name.clone()),
        );
        checks.push(check);
    }

    for texture in materials.iter().flat_map(|m| &m.texture_dependencies) {
        if normalized.textures.contains_key(&texture.name) {
            continue;
        }
        let check = engine.check(texture.stem(), EntityKind::Texture);
        normalized.textures.insert(
            texture.name.clone(),
            check.suggestion.clone().unwrap_or_else(|| texture.stem().to_string()),
        );
        checks.push(check);
    }

    (checks, normalized)
}

/// Path of the marker written next to an FBX whose manifest is missing.
pub fn incomplete_marker_path(fbx_path: &Path) -> PathBuf {
    let mut marker = fbx_path.as_os_str().to_owned();
    marker.push(".incomplete");
    PathBuf::from(marker)
}

/// Validates the active object and, when there are no errors, exports it.
///
/// A blocked export writes nothing. On success the FBX and
/// `<asset>.manifest.json` sit in the configured export directory. When the
/// FBX is written but the manifest is not, the FBX stays and a
/// `<asset>.fbx.incomplete` marker holding the failure finding is written
/// next to it.
pub fn run_export(
    scene: &dyn HostScene,
    config: &ExportConfig,
    exporter: &dyn MeshExporter,
) -> ExportResult<ExportOutcome> {
    let analysis = analyze_selection(scene, config)?;
    export_analysis(&analysis, config, exporter)
}

/// Export stage of [`run_export`] for an existing analysis.
pub fn export_analysis(
    analysis: &AssetAnalysis,
    config: &ExportConfig,
    exporter: &dyn MeshExporter,
) -> ExportResult<ExportOutcome> {
    if let Some(validation) = blocking_validation(analysis) {
        tracing::info!(
            asset = %analysis.asset.name,
            errors = validation.error_count(),
            "export blocked by validation errors"
        );
        return Ok(ExportOutcome::Blocked(validation));
    }

    let manifest = build_manifest(analysis, config, &timestamp())?;
    let json = manifest.to_json_pretty()?;

    let directory = &config.export_directory;
    std::fs::create_dir_all(directory).map_err(|source| ExportError::CreateDirectory {
        path: directory.clone(),
        source,
    })?;
    let fbx_path = directory.join(ExportManifest::fbx_filename(&manifest.asset_name));
    let manifest_path = directory.join(ExportManifest::filename(&manifest.asset_name));

    let mut options = config.options.clone();
    options.apply_modifiers = true;
    exporter.export_mesh(&ExportRequest {
        object_name: analysis.asset.name.clone(),
        fbx_path: fbx_path.clone(),
        blend_file: analysis.blend_file.clone(),
        options,
    })?;

    let marker = incomplete_marker_path(&fbx_path);
    if let Err(source) = write_atomic(&manifest_path, json.as_bytes()) {
        let finding = manifest_write_finding(&manifest.asset_name, &manifest_path, &source);
        write_marker(&marker, &finding);
        return Err(ExportError::ManifestWriteFailed {
            fbx_path,
            manifest_path,
            finding: Box::new(finding),
            source,
        });
    }
    match std::fs::remove_file(&marker) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            tracing::warn!(marker = %marker.display(), error = %e, "could not remove stale incomplete marker");
        }
        _ => {}
    }

    tracing::info!(
        asset = %manifest.asset_name,
        fbx = %fbx_path.display(),
        manifest = %manifest_path.display(),
        warnings = analysis.validation.warning_count(),
        "exported asset"
    );

    Ok(ExportOutcome::Success {
        manifest_path,
        fbx_path,
        validation: analysis.validation.clone(),
    })
}

/// The validation to report when `analysis` cannot be exported.
///
/// Without mesh data there is nothing to export and no mesh stats for the
/// manifest, so the missing-mesh finding is an error whatever severity the
/// configuration gave it.
fn blocking_validation(analysis: &AssetAnalysis) -> Option<ValidationResult> {
    if analysis.mesh.is_some() {
        return analysis
            .validation
            .has_errors()
            .then(|| analysis.validation.clone());
    }

    let mut findings = analysis.validation.findings.clone();
    let mut escalated = false;
    for finding in findings.iter_mut().filter(|f| f.rule_id == MISSING_MESH_RULE) {
        finding.severity = Severity::Error;
        escalated = true;
    }
    if !escalated {
        findings.push(
            Finding::new(
                MISSING_MESH_RULE,
                Category::Geometry,
                Severity::Error,
                "selected object has no mesh data",
                &analysis.asset.name,
            )
            .with_suggestion("Select a mesh object"),
        );
    }
    Some(ValidationResult::from_findings(findings))
}

/// Builds the manifest for an analysis.
pub fn build_manifest(
    analysis: &AssetAnalysis,
    config: &ExportConfig,
    timestamp: &str,
) -> ExportResult<ExportManifest> {
    let mut builder = ManifestBuilder::new(&analysis.asset, config, &analysis.validation)
        .materials(&analysis.materials)
        .textures(&analysis.textures)
        .normalized_names(analysis.normalized.clone());
    if let Some(mesh) = &analysis.mesh {
        builder = builder.mesh_stats(&mesh.stats);
    }
    if let Some(blend_file) = &analysis.blend_file {
        builder = builder.blend_file(blend_file.display().to_string());
    }
    Ok(builder.build(timestamp)?)
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

fn manifest_write_finding(asset_name: &str, manifest_path: &Path, err: &std::io::Error) -> Finding {
    Finding::new(
        MANIFEST_WRITE_FAILED_RULE,
        Category::Export,
        Severity::Error,
        format!("FBX was written but the manifest could not be: {}", err),
        asset_name,
    )
    .with_actual_value(manifest_path.display().to_string())
    .with_suggestion("Fix the export directory and export again; the FBX is not validated-complete")
}

fn write_marker(marker: &Path, finding: &Finding) {
    let written = serde_json::to_string_pretty(finding)
        .map_err(std::io::Error::from)
        .and_then(|json| std::fs::write(marker, json));
    if let Err(e) = written {
        tracing::warn!(marker = %marker.display(), error = %e, "could not write incomplete marker");
    }
}

use super::*;
use crate::asset::AssetIdentity;
use crate::config::ExportConfig;
use crate::finding::{Category, Finding, Severity, ValidationResult};
use crate::material::MaterialAnalysis;
use crate::shader::{SocketValue, TextureRef};
use crate::texture::{ClassificationSource, TextureClassification};
use pretty_assertions::assert_eq;

fn stats() -> MeshStats {
    MeshStats {
        vertex_count: 8,
        edge_count: 12,
        face_count: 6,
        triangle_count: 12,
        uv_channels: ["UVMap".to_string()].into_iter().collect(),
        manifold: true,
        boundary_edge_count: 0,
        non_manifold_edge_count: 0,
        isolated_vertex_count: 0,
        modifiers_applied: true,
    }
}

fn rock_material() -> MaterialAnalysis {
    let albedo = TextureRef::new("Rock_BC.png", Colorspace::Srgb).with_path("/tex/Rock_BC.png");
    let normal = TextureRef::new("Rock_N.png", Colorspace::Linear);

    let mut inputs = BTreeMap::new();
    inputs.insert(
        ShaderSlot::BaseColor,
        ShaderInput::Texture {
            texture: albedo.clone(),
            colorspace: Colorspace::Srgb,
            via_normal_map: false,
        },
    );
    inputs.insert(
        ShaderSlot::Normal,
        ShaderInput::Texture {
            texture: normal.clone(),
            colorspace: Colorspace::Linear,
            via_normal_map: true,
        },
    );
    inputs.insert(
        ShaderSlot::Roughness,
        ShaderInput::Constant {
            value: SocketValue::Scalar(0.5),
        },
    );

    MaterialAnalysis {
        material_name: "Rock".to_string(),
        shader_type: Some("BSDF_PRINCIPLED".to_string()),
        complexity: Complexity::Texture,
        inputs,
        // Deliberately unsorted; the manifest sorts dependencies.
        texture_dependencies: vec![normal, albedo],
        unsupported: None,
        graph_faults: Vec::new(),
    }
}

fn classification(texture: &str, slot: ShaderSlot, role: TextureRole) -> TextureClassification {
    let colorspace = role.required_colorspace().unwrap_or(Colorspace::Linear);
    TextureClassification {
        texture: texture.to_string(),
        path: None,
        material: "Rock".to_string(),
        slot: Some(slot),
        role,
        colorspace,
        declared_colorspace: colorspace,
        on_disk: true,
        source: ClassificationSource::SlotHeuristic { slot },
    }
}

struct Inputs {
    asset: AssetIdentity,
    config: ExportConfig,
    validation: ValidationResult,
    stats: MeshStats,
    materials: Vec<MaterialAnalysis>,
    textures: Vec<TextureClassification>,
}

fn inputs() -> Inputs {
    Inputs {
        asset: AssetIdentity::new("Rock", AssetProfile::SmallProp),
        config: ExportConfig::new(AssetProfile::SmallProp, "/exports").master_material("/Game/M_Master"),
        validation: ValidationResult::from_findings(vec![Finding::new(
            "naming/mesh",
            Category::Naming,
            Severity::Warning,
            "Mesh name 'Rock' is missing prefix 'SM_'",
            "mesh:Rock",
        )]),
        stats: stats(),
        materials: vec![rock_material()],
        textures: vec![
            classification("Rock_BC.png", ShaderSlot::BaseColor, TextureRole::Albedo),
            classification("Rock_N.png", ShaderSlot::Normal, TextureRole::Normal),
        ],
    }
}

fn names() -> NormalizedNames {
    NormalizedNames {
        asset: Some("SM_Rock".to_string()),
        materials: [("Rock".to_string(), "MI_Rock".to_string())].into_iter().collect(),
        textures: [
            ("Rock_BC.png".to_string(), "T_Rock_BC".to_string()),
            ("Rock_N.png".to_string(), "T_Rock_N".to_string()),
        ]
        .into_iter()
        .collect(),
    }
}

fn build(i: &Inputs, timestamp: &str) -> ExportManifest {
    ManifestBuilder::new(&i.asset, &i.config, &i.validation)
        .mesh_stats(&i.stats)
        .materials(&i.materials)
        .textures(&i.textures)
        .normalized_names(names())
        .build(timestamp)
        .unwrap()
}

#[test]
fn test_build_manifest_shape() {
    let i = inputs();
    let manifest = build(&i, "2026-03-01T10:00:00Z");

    assert_eq!(manifest.schema, MANIFEST_SCHEMA);
    assert_eq!(manifest.asset_name, "SM_Rock");
    assert_eq!(manifest.source.object_name, "Rock");
    assert_eq!(manifest.export_config.fbx_path, "/exports/SM_Rock.fbx");
    assert_eq!(manifest.export_config.target, "unreal");
    assert!(manifest.validation.passed);
    assert_eq!(manifest.validation.warnings.len(), 1);

    let material = &manifest.materials[0];
    assert_eq!(material.normalized_name, "MI_Rock");
    let deps: Vec<_> = material
        .texture_dependencies
        .iter()
        .map(|d| (d.name.as_str(), d.role, d.normalized_name.as_str()))
        .collect();
    assert_eq!(
        deps,
        vec![
            ("Rock_BC.png", TextureRole::Albedo, "T_Rock_BC"),
            ("Rock_N.png", TextureRole::Normal, "T_Rock_N"),
        ]
    );
    assert_eq!(
        material.slot_complexity.get(&ShaderSlot::Roughness),
        Some(&Complexity::Constant)
    );

    let hints = &manifest.engine_import;
    assert_eq!(hints.destination.mesh, "/Game/Assets/SM_Rock/Mesh");
    assert_eq!(hints.master_material.as_deref(), Some("/Game/M_Master"));
    assert_eq!(hints.bindings().count(), 2);
}

#[test]
fn test_build_refuses_errors() {
    let mut i = inputs();
    i.validation = ValidationResult::from_findings(vec![Finding::new(
        "geometry/missing-uv",
        Category::Geometry,
        Severity::Error,
        "no UVs",
        "mesh:Rock",
    )]);
    let err = ManifestBuilder::new(&i.asset, &i.config, &i.validation)
        .mesh_stats(&i.stats)
        .build("t")
        .unwrap_err();
    assert!(matches!(err, ManifestError::ValidationFailed(1)));
}

#[test]
fn test_build_requires_mesh_stats() {
    let i = inputs();
    let err = ManifestBuilder::new(&i.asset, &i.config, &i.validation)
        .build("t")
        .unwrap_err();
    assert!(matches!(err, ManifestError::MissingMeshStats(_)));
}

#[test]
fn test_builds_identical_except_timestamp() {
    let i = inputs();
    let a = build(&i, "2026-03-01T10:00:00Z");
    let b = build(&i, "2026-03-02T11:30:00Z");

    assert_eq!(a.content_hash, b.content_hash);
    let a_json = a.to_json_pretty().unwrap();
    let b_json = b
        .to_json_pretty()
        .unwrap()
        .replace("2026-03-02T11:30:00Z", "2026-03-01T10:00:00Z");
    assert_eq!(a_json, b_json);
}

#[test]
fn test_unknown_role_textures_are_listed_but_unbound() {
    let mut i = inputs();
    i.textures.retain(|c| c.texture != "Rock_N.png");
    let manifest = build(&i, "t");

    let normal = manifest.materials[0]
        .texture_dependencies
        .iter()
        .find(|d| d.name == "Rock_N.png")
        .unwrap();
    assert_eq!(normal.role, TextureRole::Unknown);
    assert_eq!(manifest.engine_import.bindings().count(), 1);
}

#[test]
fn test_verify_and_round_trip() {
    let i = inputs();
    let manifest = build(&i, "2026-03-01T10:00:00Z");
    manifest.verify().unwrap();

    let json = manifest.to_json_pretty().unwrap();
    let parsed = ExportManifest::from_json(&json).unwrap();
    assert_eq!(parsed, manifest);
    parsed.verify().unwrap();
}

#[test]
fn test_verify_detects_tampering() {
    let i = inputs();
    let mut manifest = build(&i, "t");
    manifest.mesh_stats.triangle_count = 10;
    assert!(matches!(
        manifest.verify(),
        Err(ManifestError::HashMismatch { .. })
    ));
}

#[test]
fn test_verify_detects_inconsistent_hints() {
    let i = inputs();
    let mut manifest = build(&i, "t");
    manifest.materials[0]
        .texture_dependencies
        .retain(|d| d.name != "Rock_N.png");
    manifest.content_hash = manifest.compute_content_hash().unwrap();
    assert!(matches!(
        manifest.verify(),
        Err(ManifestError::InconsistentHints { .. })
    ));
}

#[test]
fn test_from_json_rejects_foreign_schema_and_newer_major() {
    let i = inputs();
    let manifest = build(&i, "t");

    let mut value = serde_json::to_value(&manifest).unwrap();
    value["schema"] = serde_json::json!("asset_forge.export");
    let err = ExportManifest::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, ManifestError::UnknownSchema(_)));

    let mut value = serde_json::to_value(&manifest).unwrap();
    value["schema_version"] = serde_json::json!("2.0.0");
    let err = ExportManifest::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, ManifestError::UnsupportedVersion { .. }));

    let mut value = serde_json::to_value(&manifest).unwrap();
    value["schema_version"] = serde_json::json!("1.4.0");
    assert!(ExportManifest::from_json(&value.to_string()).is_ok());
}

use super::*;
use crate::registry::RuleRegistry;
use assetforge_analysis::naming::NamingEngine;
use assetforge_analysis::shader::analyze_material;
use assetforge_analysis::texture::TextureClassifier;
use assetforge_analysis::mesh::inspect;
use assetforge_spec::asset::{AssetProfile, EntityKind};
use assetforge_spec::finding::ValidationResult;
use assetforge_spec::mesh::{MeshData, Modifier};
use assetforge_spec::shader::{
    Colorspace, ShaderGraph, ShaderLink, ShaderNode, SocketValue, TextureRef, PRINCIPLED_BSDF,
};
use pretty_assertions::assert_eq;

fn cube() -> MeshData {
    MeshData::new(
        "SM_Crate",
        vec![
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ],
        vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ],
    )
    .with_uv_channel("UVMap")
}

fn constant_graph() -> ShaderGraph {
    ShaderGraph::new(
        ShaderNode::new("bsdf", PRINCIPLED_BSDF)
            .with_input("Base Color", SocketValue::Vector(vec![0.5, 0.5, 0.5, 1.0])),
    )
}

fn textured_graph(texture: TextureRef, socket: &str) -> ShaderGraph {
    constant_graph()
        .with_node(ShaderNode::image_texture("tex", texture))
        .with_link(ShaderLink::new("tex", "Color", "bsdf", socket))
}

/// Owns the analysis outputs a rule context borrows.
struct Scenario {
    asset: AssetIdentity,
    config: ExportConfig,
    mesh: Option<MeshData>,
    graphs: Vec<(String, Option<ShaderGraph>)>,
}

impl Scenario {
    fn new(profile: AssetProfile) -> Self {
        Self {
            asset: AssetIdentity::new("SM_Crate", profile),
            config: ExportConfig::new(profile, "Exports"),
            mesh: Some(cube()),
            graphs: vec![("MI_Crate".to_string(), Some(constant_graph()))],
        }
    }

    fn hero() -> Self {
        let mut scenario = Self::new(AssetProfile::HeroProp);
        scenario.asset.name = "HP_Crate".to_string();
        if let Some(mesh) = &mut scenario.mesh {
            mesh.name = "HP_Crate".to_string();
        }
        scenario
    }

    fn material(mut self, name: &str, graph: Option<ShaderGraph>) -> Self {
        self.graphs = vec![(name.to_string(), graph)];
        self
    }

    fn run(&self) -> ValidationResult {
        self.run_with(&RuleRegistry::default_rules())
    }

    fn run_with(&self, registry: &RuleRegistry) -> ValidationResult {
        let inspection = self.mesh.as_ref().map(inspect);
        let materials: Vec<MaterialAnalysis> = self
            .graphs
            .iter()
            .map(|(name, graph)| analyze_material(name, graph.as_ref()))
            .collect();
        let classifier = TextureClassifier::from_config(&self.config);
        let textures: Vec<TextureClassification> = materials
            .iter()
            .flat_map(|m| classifier.classify_material(m))
            .collect();

        let engine = NamingEngine::from_config(&self.config).unwrap();
        let mut naming = vec![engine.check(&self.asset.name, EntityKind::Mesh)];
        naming.extend(
            materials
                .iter()
                .map(|m| engine.check(&m.material_name, EntityKind::Material)),
        );
        for m in &materials {
            for t in &m.texture_dependencies {
                naming.push(engine.check(t.stem(), EntityKind::Texture));
            }
        }

        let ctx = RuleContext {
            asset: &self.asset,
            config: &self.config,
            mesh: inspection.as_ref(),
            materials: &materials,
            textures: &textures,
            naming: &naming,
        };
        registry.validate(&ctx)
    }
}

fn rule_ids(result: &ValidationResult) -> Vec<&str> {
    result.findings.iter().map(|f| f.rule_id.as_str()).collect()
}

#[test]
fn test_clean_asset_has_no_findings() {
    let result = Scenario::new(AssetProfile::SmallProp).run();
    assert!(result.is_empty(), "{:?}", result.findings);
    assert!(result.passed());
}

#[test]
fn test_open_boundary_is_single_geometry_error() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp);
    if let Some(mesh) = &mut scenario.mesh {
        mesh.faces.remove(1);
    }
    let result = scenario.run();

    let geometry: Vec<&Finding> = result.in_category(Category::Geometry).collect();
    assert_eq!(geometry.len(), 1);
    assert_eq!(geometry[0].rule_id, "geometry/open-boundary");
    assert_eq!(geometry[0].severity, Severity::Error);
    assert_eq!(geometry[0].actual_value.as_deref(), Some("4-5, 4-7, 5-6, 6-7"));
    assert!(!result.passed());
}

#[test]
fn test_non_manifold_edge_is_reported_separately() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp);
    if let Some(mesh) = &mut scenario.mesh {
        mesh.vertices.push([0.0, -3.0, -1.0]);
        mesh.faces.push(vec![0, 1, 8]);
    }
    let result = scenario.run();
    // The fin adds a non-manifold edge and two open edges.
    assert_eq!(
        rule_ids(&result),
        vec!["geometry/non-manifold-edge", "geometry/open-boundary"]
    );
}

#[test]
fn test_missing_uv() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp);
    if let Some(mesh) = &mut scenario.mesh {
        mesh.uv_channels.clear();
    }
    let result = scenario.run();
    assert_eq!(rule_ids(&result), vec!["geometry/missing-uv"]);
    assert!(result.has_errors());
}

#[test]
fn test_missing_mesh_suppresses_mesh_rules() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp);
    scenario.mesh = None;
    let result = scenario.run();
    assert_eq!(rule_ids(&result), vec!["geometry/missing-mesh"]);
}

#[test]
fn test_empty_mesh() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp);
    scenario.mesh = Some(MeshData::new("SM_Crate", vec![], vec![]));
    assert_eq!(rule_ids(&scenario.run()), vec!["geometry/empty-mesh"]);
}

#[test]
fn test_modifier_fault_is_error() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp);
    scenario.mesh = Some(cube().with_modifier(Modifier::Other {
        name: "bevel".to_string(),
    }));
    let result = scenario.run();
    assert_eq!(rule_ids(&result), vec!["geometry/modifier-evaluation"]);
    assert_eq!(result.findings[0].actual_value.as_deref(), Some("bevel"));
}

#[test]
fn test_triangle_budget_and_isolated_vertices() {
    let mut scenario = Scenario::new(AssetProfile::ModularPiece);
    scenario.asset.name = "SM_Crate_MOD".to_string();
    scenario.config.profile_settings.max_triangles = Some(10);
    if let Some(mesh) = &mut scenario.mesh {
        mesh.vertices.push([9.0, 9.0, 9.0]);
    }
    let result = scenario.run();

    let budget = result.by_rule("geometry/triangle-budget").next().unwrap();
    assert_eq!(budget.severity, Severity::Warning);
    assert_eq!(budget.actual_value.as_deref(), Some("12"));
    // Modular pieces escalate stray vertices.
    let isolated = result.by_rule("geometry/isolated-vertices").next().unwrap();
    assert_eq!(isolated.severity, Severity::Error);
}

#[test]
fn test_missing_material() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp);
    scenario.graphs.clear();
    let result = scenario.run();
    assert_eq!(rule_ids(&result), vec!["material/missing-material"]);
    assert!(result.passed());
}

#[test]
fn test_unsupported_shader_is_single_warning() {
    let glass = ShaderGraph::new(ShaderNode::new("glass", "BSDF_GLASS"));
    let result = Scenario::new(AssetProfile::SmallProp)
        .material("MI_Glass", Some(glass))
        .run();
    assert_eq!(rule_ids(&result), vec!["material/unsupported-shader"]);
    assert_eq!(result.findings[0].severity, Severity::Warning);
    assert_eq!(result.findings[0].actual_value.as_deref(), Some("BSDF_GLASS"));
}

#[test]
fn test_malformed_graph_is_error() {
    let graph = constant_graph()
        .with_node(ShaderNode::new("a", "MATH"))
        .with_node(ShaderNode::new("b", "MATH"))
        .with_link(ShaderLink::new("a", "Value", "b", "Value"))
        .with_link(ShaderLink::new("b", "Value", "a", "Value"));
    let result = Scenario::new(AssetProfile::SmallProp)
        .material("MI_Loop", Some(graph))
        .run();
    assert_eq!(rule_ids(&result), vec!["material/malformed-graph"]);
    assert!(result.has_errors());
}

#[test]
fn test_complex_input_lists_slots() {
    let graph = constant_graph()
        .with_node(ShaderNode::new("math", "MATH"))
        .with_link(ShaderLink::new("math", "Value", "bsdf", "Roughness"));
    let result = Scenario::new(AssetProfile::SmallProp)
        .material("MI_Crate", Some(graph))
        .run();
    assert_eq!(rule_ids(&result), vec!["material/complex-input"]);
    assert_eq!(result.findings[0].actual_value.as_deref(), Some("roughness"));
}

#[test]
fn test_colorspace_mismatch_severity_depends_on_profile() {
    let graph = textured_graph(TextureRef::new("T_Rock_N.png", Colorspace::Srgb), "Base Color");

    let small = Scenario::new(AssetProfile::SmallProp)
        .material("MI_Crate", Some(graph.clone()))
        .run();
    let finding = small.by_rule("texture/colorspace-mismatch").next().unwrap();
    assert_eq!(finding.severity, Severity::Warning);
    assert_eq!(finding.expected.as_deref(), Some("linear"));
    assert!(small.passed());

    let hero = Scenario::hero().material("MI_Crate", Some(graph)).run();
    let finding = hero.by_rule("texture/colorspace-mismatch").next().unwrap();
    assert_eq!(finding.severity, Severity::Error);
    assert!(!hero.passed());
}

#[test]
fn test_unknown_role_reported_once_per_material() {
    let graph = constant_graph()
        .with_node(ShaderNode::image_texture(
            "mask",
            TextureRef::new("T_Mask.png", Colorspace::Linear),
        ))
        .with_link(ShaderLink::new("mask", "Color", "bsdf", "Specular IOR Level"));
    let result = Scenario::new(AssetProfile::SmallProp)
        .material("MI_Crate", Some(graph))
        .run();

    assert_eq!(rule_ids(&result), vec!["texture/unknown-role"]);
    assert_eq!(result.findings[0].subject, "T_Mask.png");
}

#[test]
fn test_missing_texture_file() {
    let texture = TextureRef::new("T_Crate_BC.png", Colorspace::Srgb)
        .with_path("//textures/T_Crate_BC.png")
        .missing_on_disk();
    let result = Scenario::new(AssetProfile::SmallProp)
        .material("MI_Crate", Some(textured_graph(texture, "Base Color")))
        .run();
    assert_eq!(rule_ids(&result), vec!["texture/missing-file"]);
    assert_eq!(
        result.findings[0].actual_value.as_deref(),
        Some("//textures/T_Crate_BC.png")
    );
}

#[test]
fn test_naming_findings_carry_suggestions() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp).material("Crate Paint", Some(constant_graph()));
    scenario.asset.name = "Crate".to_string();
    let result = scenario.run();

    assert_eq!(rule_ids(&result), vec!["naming/material", "naming/mesh"]);
    assert_eq!(result.findings[0].expected.as_deref(), Some("MI_Crate_Paint"));
    assert_eq!(result.findings[1].expected.as_deref(), Some("SM_Crate"));
    assert!(result.passed());
}

#[test]
fn test_hero_prop_naming_blocks_and_user_override_relaxes() {
    let mut scenario = Scenario::hero();
    scenario.asset.name = "Sword".to_string();
    let result = scenario.run();
    let mesh = result.by_rule("naming/mesh").next().unwrap();
    assert_eq!(mesh.severity, Severity::Error);
    assert_eq!(mesh.expected.as_deref(), Some("HP_Sword"));

    scenario.config = scenario
        .config
        .clone()
        .severity_override("naming/*", Severity::Warning);
    let relaxed = scenario.run();
    assert_eq!(
        relaxed.by_rule("naming/mesh").next().map(|f| f.severity),
        Some(Severity::Warning)
    );
}

#[test]
fn test_findings_are_grouped_by_category() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp).material(
        "Paint",
        Some(textured_graph(
            TextureRef::new("T_Crate_R.png", Colorspace::Srgb),
            "Roughness",
        )),
    );
    scenario.asset.name = "Crate".to_string();
    if let Some(mesh) = &mut scenario.mesh {
        mesh.uv_channels.clear();
    }
    let result = scenario.run();

    assert_eq!(
        rule_ids(&result),
        vec![
            "naming/material",
            "naming/mesh",
            "geometry/missing-uv",
            "texture/colorspace-mismatch",
        ]
    );
}

#[test]
fn test_registration_order_does_not_change_result() {
    let mut scenario = Scenario::new(AssetProfile::HeroProp).material(
        "paint",
        Some(textured_graph(
            TextureRef::new("Rock_N.png", Colorspace::Srgb),
            "Base Color",
        )),
    );
    scenario.asset.name = "rock".to_string();
    if let Some(mesh) = &mut scenario.mesh {
        mesh.faces.remove(0);
        mesh.uv_channels.clear();
    }

    let forward = scenario.run();

    let mut reversed = RuleRegistry::new();
    let mut rules = Vec::new();
    rules.extend(texture::all_rules());
    rules.extend(material::all_rules());
    rules.extend(geometry::all_rules());
    rules.extend(naming::all_rules());
    rules.reverse();
    for rule in rules {
        reversed.register(rule);
    }

    assert!(forward.len() >= 5);
    assert_eq!(scenario.run_with(&reversed), forward);
}

#[test]
fn test_disabled_rule_is_skipped() {
    let mut scenario = Scenario::new(AssetProfile::SmallProp);
    if let Some(mesh) = &mut scenario.mesh {
        mesh.uv_channels.clear();
    }
    let mut registry = RuleRegistry::default_rules();
    registry.disable_rule("geometry/missing-uv");
    assert!(scenario.run_with(&registry).is_empty());
}

//! Property-based tests for the validation pipeline using proptest.
//!
//! These tests check that naming suggestions are stable fixed points, that
//! mesh inspection never panics on arbitrary topology, and that the order in
//! which rules are registered never changes the findings.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p assetforge-tests --test proptest_pipeline
//! ```

use proptest::prelude::*;

use assetforge_analysis::{inspect, NamingEngine};
use assetforge_backend_blender::{analyze_selection, analyze_selection_with, SceneSnapshot};
use assetforge_lint::rules::{geometry, material, naming, texture as texture_rules};
use assetforge_lint::{RuleRegistry, ValidationRule};
use assetforge_spec::mesh::MeshData;
use assetforge_spec::shader::Colorspace;
use assetforge_spec::{AssetProfile, EntityKind, ExportConfig};
use assetforge_tests::fixtures::{
    open_cube, single_object_scene, texture, textured_graph, ProjectFixture,
};

// ============================================================================
// 1. Naming Suggestions
// ============================================================================

fn any_profile() -> impl Strategy<Value = AssetProfile> {
    prop_oneof![
        Just(AssetProfile::SmallProp),
        Just(AssetProfile::HeroProp),
        Just(AssetProfile::ModularPiece),
    ]
}

fn any_kind() -> impl Strategy<Value = EntityKind> {
    prop_oneof![
        Just(EntityKind::Mesh),
        Just(EntityKind::Material),
        Just(EntityKind::Texture),
    ]
}

proptest! {
    /// A suggestion passes the check it was suggested for.
    #[test]
    fn suggestion_passes_check(
        name in "[A-Za-z0-9_ .\\-]{0,24}",
        profile in any_profile(),
        kind in any_kind(),
    ) {
        let engine = NamingEngine::for_profile(profile).unwrap();
        let suggestion = engine.suggest(&name, kind);
        let check = engine.check(&suggestion, kind);
        prop_assert!(
            check.passed,
            "'{}' -> '{}' fails: {:?}", name, suggestion, check.violations
        );
    }

    /// Suggesting again from a suggestion changes nothing.
    #[test]
    fn suggestion_is_idempotent(
        name in "[A-Za-z0-9_ .\\-]{0,24}",
        profile in any_profile(),
        kind in any_kind(),
    ) {
        let engine = NamingEngine::for_profile(profile).unwrap();
        let once = engine.suggest(&name, kind);
        let twice = engine.suggest(&once, kind);
        prop_assert_eq!(once, twice);
    }

    /// Names that pass are never rewritten.
    #[test]
    fn passing_names_have_no_suggestion(
        name in "[A-Za-z0-9_ .\\-]{0,24}",
        profile in any_profile(),
        kind in any_kind(),
    ) {
        let engine = NamingEngine::for_profile(profile).unwrap();
        let check = engine.check(&name, kind);
        prop_assert_eq!(check.passed, check.suggestion.is_none());
    }
}

// ============================================================================
// 2. Mesh Inspection
// ============================================================================

fn arbitrary_mesh() -> impl Strategy<Value = MeshData> {
    (1usize..12).prop_flat_map(|vertex_count| {
        let faces = prop::collection::vec(
            prop::collection::vec(0u32..(vertex_count as u32 + 2), 0..6),
            0..10,
        );
        faces.prop_map(move |faces| {
            let vertices = (0..vertex_count).map(|i| [i as f64, 0.0, 0.0]).collect();
            MeshData::new("SM_Random", vertices, faces)
        })
    })
}

proptest! {
    /// Inspection accounts for every face and never panics.
    #[test]
    fn inspection_accounts_for_every_face(mesh in arbitrary_mesh()) {
        let inspection = inspect(&mesh);
        let stats = &inspection.stats;

        prop_assert_eq!(
            stats.face_count as usize + inspection.malformed_faces.len(),
            mesh.faces.len()
        );
        prop_assert!(stats.triangle_count >= stats.face_count);
        prop_assert_eq!(stats.vertex_count as usize, mesh.vertices.len());
        prop_assert_eq!(
            stats.manifold,
            stats.boundary_edge_count == 0 && stats.non_manifold_edge_count == 0
        );
    }
}

// ============================================================================
// 3. Rule Registration Order
// ============================================================================

fn default_rules() -> Vec<Box<dyn ValidationRule>> {
    let mut rules = naming::all_rules();
    rules.extend(geometry::all_rules());
    rules.extend(material::all_rules());
    rules.extend(texture_rules::all_rules());
    rules
}

fn registry_in_order(order: &[usize]) -> RuleRegistry {
    let mut rules: Vec<Option<Box<dyn ValidationRule>>> =
        default_rules().into_iter().map(Some).collect();
    let mut registry = RuleRegistry::new();
    for &index in order {
        if let Some(rule) = rules[index].take() {
            registry.register(rule);
        }
    }
    registry
}

fn messy_scene(project: &ProjectFixture) -> SceneSnapshot {
    project.add_texture("crate color.png");
    let graph = textured_graph(
        texture("crate color.png", Colorspace::Linear),
        texture("T_Crate_N.png", Colorspace::Srgb),
    );
    project.prepare(single_object_scene(open_cube("crate-01"), "Crate Mat", Some(graph)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any registration order yields the default-order findings.
    #[test]
    fn registration_order_is_irrelevant(
        order in Just((0..default_rules().len()).collect::<Vec<usize>>()).prop_shuffle(),
        profile in any_profile(),
    ) {
        let project = ProjectFixture::new();
        let scene = messy_scene(&project);
        let config = ExportConfig::new(profile, project.export_dir());

        let expected = analyze_selection(&scene, &config).unwrap();
        let shuffled = analyze_selection_with(&scene, &config, &registry_in_order(&order)).unwrap();

        prop_assert_eq!(expected.validation, shuffled.validation);
    }
}

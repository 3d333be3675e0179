//! Geometry rules over the mesh inspection.
//!
//! Open boundaries and non-manifold edges are separate rules so each kind of
//! topology failure gets its own finding.

use assetforge_spec::finding::{Category, Finding, Severity};
use assetforge_spec::mesh::{Edge, MeshInspection};

use super::{RuleContext, ValidationRule};

/// Edges listed in a finding before the list is cut short.
const MAX_LISTED_EDGES: usize = 8;

/// Returns all geometry rules.
pub fn all_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(MissingMeshRule),
        Box::new(EmptyMeshRule),
        Box::new(MalformedFaceRule),
        Box::new(ModifierEvaluationRule),
        Box::new(OpenBoundaryRule),
        Box::new(NonManifoldEdgeRule),
        Box::new(MissingUvRule),
        Box::new(TriangleBudgetRule),
        Box::new(IsolatedVerticesRule),
    ]
}

/// Mesh of the context when it has geometry to check.
fn non_empty_mesh<'a>(ctx: &RuleContext<'a>) -> Option<&'a MeshInspection> {
    ctx.mesh
        .filter(|m| m.stats.vertex_count > 0 && m.stats.face_count > 0)
}

fn list_edges(edges: &[Edge]) -> String {
    let mut listed: Vec<String> = edges
        .iter()
        .take(MAX_LISTED_EDGES)
        .map(|[a, b]| format!("{}-{}", a, b))
        .collect();
    if edges.len() > MAX_LISTED_EDGES {
        listed.push(format!("... {} more", edges.len() - MAX_LISTED_EDGES));
    }
    listed.join(", ")
}

pub struct MissingMeshRule;

impl ValidationRule for MissingMeshRule {
    fn id(&self) -> &'static str {
        "geometry/missing-mesh"
    }

    fn category(&self) -> Category {
        Category::Geometry
    }

    fn description(&self) -> &'static str {
        "The selected object has no mesh data"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        if ctx.mesh.is_some() {
            return vec![];
        }
        vec![self
            .finding("selected object has no mesh data", &ctx.asset.name)
            .with_suggestion("Select a mesh object")]
    }
}

pub struct EmptyMeshRule;

impl ValidationRule for EmptyMeshRule {
    fn id(&self) -> &'static str {
        "geometry/empty-mesh"
    }

    fn category(&self) -> Category {
        Category::Geometry
    }

    fn description(&self) -> &'static str {
        "Mesh has no vertices or no faces"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(mesh) = ctx.mesh else {
            return vec![];
        };
        if non_empty_mesh(ctx).is_some() {
            return vec![];
        }
        vec![self
            .finding("mesh has no geometry", &mesh.mesh_name)
            .with_actual_value(format!(
                "{} vertices, {} faces",
                mesh.stats.vertex_count, mesh.stats.face_count
            ))]
    }
}

pub struct MalformedFaceRule;

impl ValidationRule for MalformedFaceRule {
    fn id(&self) -> &'static str {
        "geometry/malformed-face"
    }

    fn category(&self) -> Category {
        Category::Geometry
    }

    fn description(&self) -> &'static str {
        "Faces with fewer than three vertices, repeated vertices or invalid indices"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(mesh) = ctx.mesh else {
            return vec![];
        };
        if mesh.malformed_faces.is_empty() {
            return vec![];
        }
        let indices: Vec<String> = mesh
            .malformed_faces
            .iter()
            .map(ToString::to_string)
            .collect();
        vec![self
            .finding(
                format!("{} malformed face(s) were skipped", mesh.malformed_faces.len()),
                &mesh.mesh_name,
            )
            .with_actual_value(format!("faces {}", indices.join(", ")))
            .with_suggestion("Run Merge by Distance and delete degenerate faces")]
    }
}

pub struct ModifierEvaluationRule;

impl ValidationRule for ModifierEvaluationRule {
    fn id(&self) -> &'static str {
        "geometry/modifier-evaluation"
    }

    fn category(&self) -> Category {
        Category::Geometry
    }

    fn description(&self) -> &'static str {
        "Modifier stack could not be evaluated; statistics describe the unmodified mesh"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(fault) = ctx.mesh.and_then(|m| m.modifier_fault.as_ref()) else {
            return vec![];
        };
        let subject = ctx.mesh.map_or(ctx.asset.name.as_str(), |m| m.mesh_name.as_str());
        vec![self
            .finding(fault.to_string(), subject)
            .with_actual_value(&fault.modifier)
            .with_suggestion("Apply or remove the modifier before exporting")]
    }
}

pub struct OpenBoundaryRule;

impl ValidationRule for OpenBoundaryRule {
    fn id(&self) -> &'static str {
        "geometry/open-boundary"
    }

    fn category(&self) -> Category {
        Category::Geometry
    }

    fn description(&self) -> &'static str {
        "Edges used by only one face (the mesh is not closed)"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(mesh) = non_empty_mesh(ctx) else {
            return vec![];
        };
        if mesh.boundary_edges.is_empty() {
            return vec![];
        }
        vec![self
            .finding(
                format!(
                    "{} boundary edge(s) border only one face",
                    mesh.boundary_edges.len()
                ),
                &mesh.mesh_name,
            )
            .with_actual_value(list_edges(&mesh.boundary_edges))
            .with_expected("0 boundary edges")
            .with_suggestion("Fill holes so every edge borders exactly two faces")]
    }
}

pub struct NonManifoldEdgeRule;

impl ValidationRule for NonManifoldEdgeRule {
    fn id(&self) -> &'static str {
        "geometry/non-manifold-edge"
    }

    fn category(&self) -> Category {
        Category::Geometry
    }

    fn description(&self) -> &'static str {
        "Edges shared by three or more faces"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(mesh) = non_empty_mesh(ctx) else {
            return vec![];
        };
        if mesh.non_manifold_edges.is_empty() {
            return vec![];
        }
        vec![self
            .finding(
                format!(
                    "{} edge(s) are shared by more than two faces",
                    mesh.non_manifold_edges.len()
                ),
                &mesh.mesh_name,
            )
            .with_actual_value(list_edges(&mesh.non_manifold_edges))
            .with_expected("0 non-manifold edges")
            .with_suggestion("Remove internal or duplicate faces")]
    }
}

pub struct MissingUvRule;

impl ValidationRule for MissingUvRule {
    fn id(&self) -> &'static str {
        "geometry/missing-uv"
    }

    fn category(&self) -> Category {
        Category::Geometry
    }

    fn description(&self) -> &'static str {
        "Mesh has no UV map"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(mesh) = non_empty_mesh(ctx) else {
            return vec![];
        };
        if !mesh.stats.uv_channels.is_empty() {
            return vec![];
        }
        vec![self
            .finding("mesh has no UV map", &mesh.mesh_name)
            .with_expected("at least one UV channel")
            .with_suggestion("Unwrap the mesh")]
    }
}

pub struct TriangleBudgetRule;

impl ValidationRule for TriangleBudgetRule {
    fn id(&self) -> &'static str {
        "geometry/triangle-budget"
    }

    fn category(&self) -> Category {
        Category::Geometry
    }

    fn description(&self) -> &'static str {
        "Triangle count exceeds the profile's budget"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        let (Some(mesh), Some(budget)) = (ctx.mesh, ctx.config.profile_settings.max_triangles)
        else {
            return vec![];
        };
        if mesh.stats.triangle_count <= budget {
            return vec![];
        }
        vec![self
            .finding(
                format!(
                    "{} triangles exceed the {} budget of {}",
                    mesh.stats.triangle_count, ctx.config.profile, budget
                ),
                &mesh.mesh_name,
            )
            .with_actual_value(mesh.stats.triangle_count.to_string())
            .with_expected(format!("<= {}", budget))
            .with_suggestion("Decimate the mesh or bake detail into the normal map")]
    }
}

pub struct IsolatedVerticesRule;

impl ValidationRule for IsolatedVerticesRule {
    fn id(&self) -> &'static str {
        "geometry/isolated-vertices"
    }

    fn category(&self) -> Category {
        Category::Geometry
    }

    fn description(&self) -> &'static str {
        "Vertices not used by any face"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(mesh) = non_empty_mesh(ctx) else {
            return vec![];
        };
        let count = mesh.stats.isolated_vertex_count;
        if count == 0 {
            return vec![];
        }
        vec![self
            .finding(
                format!("{} vertex(es) are not used by any face", count),
                &mesh.mesh_name,
            )
            .with_actual_value(count.to_string())
            .with_expected("0")
            .with_suggestion("Delete loose vertices")]
    }
}

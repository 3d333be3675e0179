//! Mesh inspector.
//!
//! Computes [`MeshStats`] for the evaluated mesh (modifiers applied on a
//! copy) and records topology problems as data:
//!
//! - **Boundary edges**: used by exactly one face (open surface)
//! - **Non-manifold edges**: used by three or more faces
//! - **Malformed faces**: skipped when counting
//! - **Modifier faults**: counts fall back to the unevaluated mesh

mod modifiers;
mod topology;


pub use modifiers::{evaluate_modifiers, MAX_EVALUATED_VERTICES};

use assetforge_spec::mesh::{MeshData, MeshInspection, MeshStats};
use std::borrow::Cow;

use topology::Topology;

/// Inspects a mesh.
///
/// Never fails: an unevaluable modifier stack is recorded in
/// [`MeshInspection::modifier_fault`] and the statistics describe the
/// unevaluated mesh with `modifiers_applied = false`.
pub fn inspect(mesh: &MeshData) -> MeshInspection {
    let (evaluated, modifier_fault) = if mesh.modifiers.is_empty() {
        (Cow::Borrowed(mesh), None)
    } else {
        match evaluate_modifiers(mesh) {
            Ok(evaluated) => (Cow::Owned(evaluated), None),
            Err(fault) => {
                tracing::warn!(
                    mesh = %mesh.name,
                    modifier = %fault.modifier,
                    reason = %fault.reason,
                    "modifier stack not evaluable; using unevaluated mesh"
                );
                (Cow::Borrowed(mesh), Some(fault))
            }
        }
    };

    let topo = Topology::build(&evaluated);
    let boundary_edges = topo.boundary_edges();
    let non_manifold_edges = topo.non_manifold_edges();

    let stats = MeshStats {
        vertex_count: evaluated.vertices.len() as u32,
        edge_count: topo.edges.len() as u32,
        face_count: topo.valid_faces,
        triangle_count: topo.triangles,
        uv_channels: evaluated.uv_channels.iter().cloned().collect(),
        manifold: boundary_edges.is_empty() && non_manifold_edges.is_empty(),
        boundary_edge_count: boundary_edges.len() as u32,
        non_manifold_edge_count: non_manifold_edges.len() as u32,
        isolated_vertex_count: (evaluated.vertices.len() - topo.used_vertices.len()) as u32,
        modifiers_applied: modifier_fault.is_none(),
    };

    tracing::debug!(
        mesh = %mesh.name,
        vertices = stats.vertex_count,
        triangles = stats.triangle_count,
        manifold = stats.manifold,
        "inspected mesh"
    );

    MeshInspection {
        mesh_name: mesh.name.clone(),
        stats,
        boundary_edges,
        non_manifold_edges,
        malformed_faces: topo.malformed_faces,
        modifier_fault,
    }
}

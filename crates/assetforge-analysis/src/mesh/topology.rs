//! Edge and face topology of a polygon mesh.

use assetforge_spec::mesh::{Edge, MeshData};
use std::collections::{BTreeMap, BTreeSet};

/// Edge usage and face validity for one mesh.
#[derive(Debug, Default)]
pub(crate) struct Topology {
    /// Edge → number of faces using it.
    pub edges: BTreeMap<Edge, u32>,
    /// Faces with fewer than three vertices, repeated vertices or indices
    /// past the end of the vertex list.
    pub malformed_faces: Vec<usize>,
    pub valid_faces: u32,
    pub triangles: u32,
    pub used_vertices: BTreeSet<u32>,
}

impl Topology {
    pub fn build(mesh: &MeshData) -> Self {
        let vertex_count = mesh.vertices.len();
        let mut topo = Topology::default();

        for (index, face) in mesh.faces.iter().enumerate() {
            if !face_is_valid(face, vertex_count) {
                topo.malformed_faces.push(index);
                continue;
            }

            topo.valid_faces += 1;
            topo.triangles += (face.len() - 2) as u32;
            topo.used_vertices.extend(face.iter().copied());

            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                *topo.edges.entry(edge(a, b)).or_insert(0) += 1;
            }
        }

        topo
    }

    /// Edges used by exactly one face.
    pub fn boundary_edges(&self) -> Vec<Edge> {
        self.edges_where(|count| count == 1)
    }

    /// Edges used by three or more faces.
    pub fn non_manifold_edges(&self) -> Vec<Edge> {
        self.edges_where(|count| count >= 3)
    }

    fn edges_where(&self, keep: impl Fn(u32) -> bool) -> Vec<Edge> {
        self.edges
            .iter()
            .filter(|(_, &count)| keep(count))
            .map(|(edge, _)| *edge)
            .collect()
    }
}

/// Normalizes an undirected edge.
pub(crate) fn edge(a: u32, b: u32) -> Edge {
    if a < b {
        [a, b]
    } else {
        [b, a]
    }
}

pub(crate) fn face_is_valid(face: &[u32], vertex_count: usize) -> bool {
    if face.len() < 3 {
        return false;
    }
    let mut seen = BTreeSet::new();
    face.iter()
        .all(|&v| (v as usize) < vertex_count && seen.insert(v))
}

//! Mesh source data and inspection results.
//!
//! [`MeshData`] is the read-only view of a host mesh: vertex positions,
//! polygon faces as vertex index loops, UV channel names and the modifier
//! stack. The inspector never mutates it; modifiers are evaluated on a copy.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeSet;

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into a position triple.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// A modifier in the host mesh's modifier stack.
///
/// Deserializing an unrecognized `type` yields [`Modifier::Other`] named
/// after that type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "type", rename_all = "snake_case")]
pub enum Modifier {
    /// Split every polygon with more than three vertices into a triangle fan.
    Triangulate,
    /// Mirror geometry across the plane through the origin normal to `axis`.
    Mirror {
        axis: Axis,
        /// Share vertices lying on the mirror plane instead of duplicating them.
        #[serde(default = "default_true")]
        merge: bool,
        /// Distance from the plane under which a vertex counts as on-plane.
        #[serde(default = "default_merge_threshold")]
        merge_threshold: f64,
    },
    /// Repeat the geometry `count` times, each copy shifted by `offset`.
    Array { count: u32, offset: [f64; 3] },
    /// Merge vertices closer than `distance`.
    Weld { distance: f64 },
    /// Any modifier the inspector cannot evaluate.
    Other { name: String },
}

const KNOWN_MODIFIER_TYPES: &[&str] = &["triangulate", "mirror", "array", "weld", "other"];

impl Serialize for Modifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Modifier::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Modifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("type"))?;
        if !KNOWN_MODIFIER_TYPES.contains(&kind) {
            return Ok(Modifier::Other {
                name: kind.to_string(),
            });
        }
        Modifier::deserialize(value).map_err(D::Error::custom)
    }
}

fn default_true() -> bool {
    true
}

fn default_merge_threshold() -> f64 {
    0.001
}

impl Modifier {
    /// Short name used in findings and logs.
    pub fn name(&self) -> &str {
        match self {
            Modifier::Triangulate => "triangulate",
            Modifier::Mirror { .. } => "mirror",
            Modifier::Array { .. } => "array",
            Modifier::Weld { .. } => "weld",
            Modifier::Other { name } => name,
        }
    }
}

/// Mesh data as exposed by the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Mesh datablock name.
    pub name: String,
    /// Vertex positions.
    pub vertices: Vec<[f64; 3]>,
    /// Polygons as loops of vertex indices.
    pub faces: Vec<Vec<u32>>,
    /// Names of the UV channels present on the mesh.
    #[serde(default)]
    pub uv_channels: Vec<String>,
    /// Modifier stack, evaluated top to bottom.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl MeshData {
    /// Creates a mesh without UVs or modifiers.
    pub fn new(name: impl Into<String>, vertices: Vec<[f64; 3]>, faces: Vec<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
            uv_channels: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    /// Builder method to add a UV channel.
    pub fn with_uv_channel(mut self, name: impl Into<String>) -> Self {
        self.uv_channels.push(name.into());
        self
    }

    /// Builder method to append a modifier to the stack.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

/// An undirected edge stored with the smaller index first.
pub type Edge = [u32; 2];

/// Statistics for the evaluated mesh, written to the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshStats {
    pub vertex_count: u32,
    pub edge_count: u32,
    pub face_count: u32,
    /// Triangles after triangulation: sum over faces of (vertex count - 2).
    pub triangle_count: u32,
    pub uv_channels: BTreeSet<String>,
    /// True when every edge borders exactly two faces.
    pub manifold: bool,
    pub boundary_edge_count: u32,
    pub non_manifold_edge_count: u32,
    pub isolated_vertex_count: u32,
    /// False when the modifier stack could not be evaluated and the counts
    /// describe the unevaluated mesh.
    pub modifiers_applied: bool,
}

/// Why a modifier stack could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierFault {
    /// Position of the failing modifier in the stack.
    pub index: usize,
    /// Modifier name.
    pub modifier: String,
    pub reason: String,
}

impl std::fmt::Display for ModifierFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "modifier #{} '{}' cannot be evaluated: {}",
            self.index, self.modifier, self.reason
        )
    }
}

/// Full output of the mesh inspector.
///
/// Data faults are recorded here instead of being raised; the rule engine
/// decides how severe they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshInspection {
    pub mesh_name: String,
    pub stats: MeshStats,
    /// Edges used by exactly one face.
    pub boundary_edges: Vec<Edge>,
    /// Edges used by three or more faces.
    pub non_manifold_edges: Vec<Edge>,
    /// Indices of faces with fewer than three vertices, repeated vertices or
    /// out-of-range vertex indices. These faces are excluded from the counts.
    pub malformed_faces: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_fault: Option<ModifierFault>,
}

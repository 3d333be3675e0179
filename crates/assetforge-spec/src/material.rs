//! Material analysis results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shader::{Colorspace, ShaderSlot, SocketValue, TextureRef};

/// How a shader input is driven, ordered from simplest to most complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Constant,
    Texture,
    Complex,
}

/// Classification of one shader input slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShaderInput {
    /// Unlinked socket; the value is the socket default.
    Constant { value: SocketValue },
    /// Fed directly by an unmodified image texture node.
    Texture {
        texture: TextureRef,
        /// Colorspace declared by the sampling node.
        colorspace: Colorspace,
        /// True when a normal-map node sits between texture and slot.
        #[serde(default, skip_serializing_if = "is_false")]
        via_normal_map: bool,
    },
    /// Fed by a node chain the importer cannot recreate; left for manual
    /// refinement on the engine side.
    Complex { node_type: String, reason: String },
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl ShaderInput {
    pub fn complexity(&self) -> Complexity {
        match self {
            ShaderInput::Constant { .. } => Complexity::Constant,
            ShaderInput::Texture { .. } => Complexity::Texture,
            ShaderInput::Complex { .. } => Complexity::Complex,
        }
    }

    /// The sampled texture, for texture inputs.
    pub fn texture(&self) -> Option<&TextureRef> {
        match self {
            ShaderInput::Texture { texture, .. } => Some(texture),
            _ => None,
        }
    }
}

/// A structural defect in a shader graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphFault {
    /// The designated output node does not exist.
    MissingOutput { output: String },
    /// Two nodes share an id.
    DuplicateNode { node: String },
    /// A link references a node that does not exist.
    DanglingLink { from_node: String, to_node: String },
    /// More than one link feeds the same input socket.
    MultipleLinks { node: String, socket: String },
    /// The graph contains a cycle through `node`.
    Cycle { node: String },
}

impl std::fmt::Display for GraphFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphFault::MissingOutput { output } => {
                write!(f, "output node '{}' does not exist", output)
            }
            GraphFault::DuplicateNode { node } => write!(f, "duplicate node id '{}'", node),
            GraphFault::DanglingLink { from_node, to_node } => write!(
                f,
                "link '{}' -> '{}' references a missing node",
                from_node, to_node
            ),
            GraphFault::MultipleLinks { node, socket } => {
                write!(f, "input '{}' on node '{}' has several links", socket, node)
            }
            GraphFault::Cycle { node } => write!(f, "cycle through node '{}'", node),
        }
    }
}

/// Analysis of one material's shader graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialAnalysis {
    pub material_name: String,
    /// Host type of the output shader node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shader_type: Option<String>,
    /// Worst-case complexity over all inputs.
    pub complexity: Complexity,
    /// Recognized slots in manifest order.
    pub inputs: BTreeMap<ShaderSlot, ShaderInput>,
    /// Textures sampled by Texture inputs, deduplicated by name.
    pub texture_dependencies: Vec<TextureRef>,
    /// Set when the whole material is classified Complex without per-input
    /// analysis (unsupported or missing shader).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsupported: Option<String>,
    /// Structural defects found in the graph.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub graph_faults: Vec<GraphFault>,
}

impl MaterialAnalysis {
    /// Creates an analysis for a material classified Complex as a whole.
    pub fn whole_complex(
        material_name: impl Into<String>,
        shader_type: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            material_name: material_name.into(),
            shader_type,
            complexity: Complexity::Complex,
            inputs: BTreeMap::new(),
            texture_dependencies: Vec::new(),
            unsupported: Some(reason.into()),
            graph_faults: Vec::new(),
        }
    }

    /// Iterates over (slot, texture) pairs of Texture inputs.
    pub fn texture_inputs(&self) -> impl Iterator<Item = (ShaderSlot, &TextureRef)> {
        self.inputs
            .iter()
            .filter_map(|(slot, input)| input.texture().map(|t| (*slot, t)))
    }

    /// Iterates over Complex inputs.
    pub fn complex_inputs(&self) -> impl Iterator<Item = (ShaderSlot, &ShaderInput)> {
        self.inputs
            .iter()
            .filter(|(_, input)| input.complexity() == Complexity::Complex)
            .map(|(slot, input)| (*slot, input))
    }

    /// Per-slot complexity summary.
    pub fn slot_complexity(&self) -> BTreeMap<ShaderSlot, Complexity> {
        self.inputs
            .iter()
            .map(|(slot, input)| (*slot, input.complexity()))
            .collect()
    }

    /// True if the texture is part of this material's dependency set.
    pub fn depends_on(&self, texture_name: &str) -> bool {
        self.texture_dependencies
            .iter()
            .any(|t| t.name == texture_name)
    }
}

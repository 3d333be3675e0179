//! Shader analyzer.
//!
//! Walks one step back from each recognized input of the output Principled
//! BSDF node and classifies the input:
//!
//! - no link: **Constant**, read from the socket default
//! - an image texture node with nothing linked into it: **Texture**
//! - a normal-map node on the Normal slot fed only by such an image texture:
//!   **Texture** (`via_normal_map`)
//! - anything else: **Complex**, and the chain behind it is not traversed
//!
//! Complex chains are kept for manual refinement on the engine side; their
//! upstream textures do not become dependencies.

mod graph;


pub use graph::validate_graph;

use assetforge_spec::material::{Complexity, GraphFault, MaterialAnalysis, ShaderInput};
use assetforge_spec::shader::{NodeKind, ShaderGraph, ShaderLink, ShaderNode, ShaderSlot, TextureRef};
use std::collections::{BTreeMap, BTreeSet};

/// Socket on the normal-map node that takes the sampled texture color.
const NORMAL_MAP_COLOR_SOCKET: &str = "Color";

/// Analyzes a material's shader graph.
///
/// A missing graph, a missing output node or an output node that is not a
/// Principled BSDF yields a material classified Complex as a whole.
pub fn analyze_material(material_name: &str, graph: Option<&ShaderGraph>) -> MaterialAnalysis {
    let Some(graph) = graph else {
        return MaterialAnalysis::whole_complex(
            material_name,
            None,
            "material has no shader node graph",
        );
    };

    let graph_faults = validate_graph(graph);
    if !graph_faults.is_empty() {
        tracing::warn!(
            material = material_name,
            faults = graph_faults.len(),
            "malformed shader graph"
        );
    }

    let Some(output) = graph.output_node() else {
        let mut analysis = MaterialAnalysis::whole_complex(
            material_name,
            None,
            format!("output node '{}' does not exist", graph.output),
        );
        analysis.graph_faults = graph_faults;
        return analysis;
    };

    if output.kind() != NodeKind::PrincipledBsdf {
        let mut analysis = MaterialAnalysis::whole_complex(
            material_name,
            Some(output.node_type.clone()),
            format!("unsupported output shader '{}'", output.node_type),
        );
        analysis.graph_faults = graph_faults;
        return analysis;
    }

    let cyclic: BTreeSet<&str> = graph_faults
        .iter()
        .filter_map(|f| match f {
            GraphFault::Cycle { node } => Some(node.as_str()),
            _ => None,
        })
        .collect();

    let walker = SlotWalker {
        graph,
        output,
        cyclic: &cyclic,
    };

    let mut inputs = BTreeMap::new();
    for slot in ShaderSlot::ALL {
        if let Some(input) = walker.classify(slot) {
            inputs.insert(slot, input);
        }
    }

    let mut texture_dependencies: Vec<TextureRef> = Vec::new();
    for input in inputs.values() {
        if let Some(texture) = input.texture() {
            if !texture_dependencies.iter().any(|t| t.name == texture.name) {
                texture_dependencies.push(texture.clone());
            }
        }
    }

    let mut complexity = inputs
        .values()
        .map(ShaderInput::complexity)
        .max()
        .unwrap_or(Complexity::Constant);
    if !graph_faults.is_empty() {
        complexity = Complexity::Complex;
    }

    tracing::debug!(
        material = material_name,
        ?complexity,
        inputs = inputs.len(),
        textures = texture_dependencies.len(),
        "analyzed material"
    );

    MaterialAnalysis {
        material_name: material_name.to_string(),
        shader_type: Some(output.node_type.clone()),
        complexity,
        inputs,
        texture_dependencies,
        unsupported: None,
        graph_faults,
    }
}

struct SlotWalker<'a> {
    graph: &'a ShaderGraph,
    output: &'a ShaderNode,
    cyclic: &'a BTreeSet<&'a str>,
}

impl SlotWalker<'_> {
    /// Classifies one slot; `None` when the node has neither a link nor a
    /// default value for it.
    fn classify(&self, slot: ShaderSlot) -> Option<ShaderInput> {
        for socket in slot.socket_names() {
            let links: Vec<&ShaderLink> = self
                .graph
                .links_into(&self.output.id)
                .filter(|l| l.to_socket == *socket)
                .collect();

            match links.as_slice() {
                [] => {
                    if let Some(value) = self.output.inputs.get(*socket) {
                        return Some(ShaderInput::Constant {
                            value: value.clone(),
                        });
                    }
                }
                [link] => return Some(self.classify_link(link, slot)),
                _ => {
                    return Some(complex(
                        "multiple",
                        format!("socket '{}' has several incoming links", socket),
                    ))
                }
            }
        }
        None
    }

    fn classify_link(&self, link: &ShaderLink, slot: ShaderSlot) -> ShaderInput {
        let Some(source) = self.graph.node(&link.from_node) else {
            return complex(
                "missing",
                format!("linked node '{}' does not exist", link.from_node),
            );
        };
        if self.cyclic.contains(source.id.as_str()) {
            return complex(&source.node_type, "node is part of a cycle");
        }

        match source.kind() {
            NodeKind::ImageTexture => match self.plain_image(source) {
                Ok(texture) => ShaderInput::Texture {
                    colorspace: texture.colorspace,
                    texture: texture.clone(),
                    via_normal_map: false,
                },
                Err(reason) => complex(&source.node_type, reason),
            },
            NodeKind::NormalMap if slot == ShaderSlot::Normal => self.normal_map(source),
            _ => complex(
                &source.node_type,
                format!("fed by '{}' node", source.node_type),
            ),
        }
    }

    /// The image of a texture node nothing upstream modifies.
    fn plain_image<'n>(&self, node: &'n ShaderNode) -> Result<&'n TextureRef, String> {
        let image = node
            .image
            .as_ref()
            .ok_or_else(|| "image texture node has no image".to_string())?;
        if self.graph.links_into(&node.id).next().is_some() {
            return Err("texture lookup is modified upstream".to_string());
        }
        Ok(image)
    }

    /// A normal-map node whose only input link is a plain image texture into
    /// its color socket.
    fn normal_map(&self, node: &ShaderNode) -> ShaderInput {
        let links: Vec<&ShaderLink> = self.graph.links_into(&node.id).collect();
        let [link] = links.as_slice() else {
            return complex(
                &node.node_type,
                "normal map must be fed by exactly one image texture",
            );
        };
        if link.to_socket != NORMAL_MAP_COLOR_SOCKET {
            return complex(
                &node.node_type,
                format!("normal map input '{}' is linked", link.to_socket),
            );
        }

        let image = self
            .graph
            .node(&link.from_node)
            .filter(|n| n.kind() == NodeKind::ImageTexture && !self.cyclic.contains(n.id.as_str()))
            .ok_or_else(|| "normal map is not fed by an image texture".to_string())
            .and_then(|n| self.plain_image(n));

        match image {
            Ok(texture) => ShaderInput::Texture {
                colorspace: texture.colorspace,
                texture: texture.clone(),
                via_normal_map: true,
            },
            Err(reason) => complex(&node.node_type, reason),
        }
    }
}

fn complex(node_type: &str, reason: impl Into<String>) -> ShaderInput {
    ShaderInput::Complex {
        node_type: node_type.to_string(),
        reason: reason.into(),
    }
}

//! Shader node graph model.
//!
//! A material's node tree is captured as an explicit graph of nodes and
//! directed links with one designated output node, decoupled from any live
//! host objects. Node types use the host's identifiers (`BSDF_PRINCIPLED`,
//! `TEX_IMAGE`, ...); [`NodeKind`] maps them to the handful the analyzer
//! understands.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Host identifier of the Principled BSDF node.
pub const PRINCIPLED_BSDF: &str = "BSDF_PRINCIPLED";
/// Host identifier of the image texture sampling node.
pub const IMAGE_TEXTURE: &str = "TEX_IMAGE";
/// Host identifier of the tangent-space normal map node.
pub const NORMAL_MAP: &str = "NORMAL_MAP";

/// Texture data encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colorspace {
    /// Perceptual (gamma encoded) color data.
    Srgb,
    /// Linear, non-color data.
    Linear,
}

impl fmt::Display for Colorspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colorspace::Srgb => f.write_str("srgb"),
            Colorspace::Linear => f.write_str("linear"),
        }
    }
}

/// Reference to an image used by a texture node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextureRef {
    /// Image datablock name (usually the file name).
    pub name: String,
    /// Absolute file path, if the image is backed by a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Colorspace declared on the image / sampling node.
    pub colorspace: Colorspace,
    /// Whether the backing file exists on disk.
    #[serde(default = "default_on_disk")]
    pub on_disk: bool,
}

fn default_on_disk() -> bool {
    true
}

impl TextureRef {
    pub fn new(name: impl Into<String>, colorspace: Colorspace) -> Self {
        Self {
            name: name.into(),
            path: None,
            colorspace,
            on_disk: true,
        }
    }

    /// Builder method to set the file path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Builder method to mark the backing file as missing.
    pub fn missing_on_disk(mut self) -> Self {
        self.on_disk = false;
        self
    }

    /// File name stem used for naming checks and role inference.
    ///
    /// Taken from the path when present, otherwise from the image name.
    pub fn stem(&self) -> &str {
        let source = self
            .path
            .as_deref()
            .and_then(|p| p.rsplit(['/', '\\']).next())
            .unwrap_or(&self.name);
        match source.rfind('.') {
            Some(dot) if dot > 0 => &source[..dot],
            _ => source,
        }
    }
}

/// Default value of an unlinked input socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SocketValue {
    Scalar(f64),
    Vector(Vec<f64>),
}

/// A node in the shader graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderNode {
    /// Node name, unique within the graph.
    pub id: String,
    /// Host node type identifier.
    pub node_type: String,
    /// Default values of input sockets, keyed by socket name.
    #[serde(default)]
    pub inputs: BTreeMap<String, SocketValue>,
    /// Image sampled by a texture node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TextureRef>,
}

impl ShaderNode {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            inputs: BTreeMap::new(),
            image: None,
        }
    }

    /// Creates an image texture node sampling `image`.
    pub fn image_texture(id: impl Into<String>, image: TextureRef) -> Self {
        Self {
            image: Some(image),
            ..Self::new(id, IMAGE_TEXTURE)
        }
    }

    /// Builder method to set an input socket default.
    pub fn with_input(mut self, socket: impl Into<String>, value: SocketValue) -> Self {
        self.inputs.insert(socket.into(), value);
        self
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type(&self.node_type)
    }
}

/// Node types the analyzer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    PrincipledBsdf,
    ImageTexture,
    NormalMap,
    Other,
}

impl NodeKind {
    pub fn from_type(node_type: &str) -> Self {
        match node_type {
            PRINCIPLED_BSDF => NodeKind::PrincipledBsdf,
            IMAGE_TEXTURE => NodeKind::ImageTexture,
            NORMAL_MAP => NodeKind::NormalMap,
            _ => NodeKind::Other,
        }
    }
}

/// A directed link from an output socket to an input socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderLink {
    pub from_node: String,
    pub from_socket: String,
    pub to_node: String,
    pub to_socket: String,
}

impl ShaderLink {
    pub fn new(
        from_node: impl Into<String>,
        from_socket: impl Into<String>,
        to_node: impl Into<String>,
        to_socket: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_socket: from_socket.into(),
            to_node: to_node.into(),
            to_socket: to_socket.into(),
        }
    }
}

/// A material's shader graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderGraph {
    pub nodes: Vec<ShaderNode>,
    #[serde(default)]
    pub links: Vec<ShaderLink>,
    /// Id of the designated output shader node.
    pub output: String,
}

impl ShaderGraph {
    /// Creates a graph containing only its output node.
    pub fn new(output: ShaderNode) -> Self {
        Self {
            output: output.id.clone(),
            nodes: vec![output],
            links: Vec::new(),
        }
    }

    /// Builder method to add a node.
    pub fn with_node(mut self, node: ShaderNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Builder method to add a link.
    pub fn with_link(mut self, link: ShaderLink) -> Self {
        self.links.push(link);
        self
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&ShaderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns the designated output node.
    pub fn output_node(&self) -> Option<&ShaderNode> {
        self.node(&self.output)
    }

    /// Returns the link feeding `socket` on `node`, if any.
    pub fn link_into(&self, node: &str, socket: &str) -> Option<&ShaderLink> {
        self.links
            .iter()
            .find(|l| l.to_node == node && l.to_socket == socket)
    }

    /// Returns all links feeding any input of `node`.
    pub fn links_into<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a ShaderLink> + 'a {
        self.links.iter().filter(move |l| l.to_node == node)
    }
}

/// Principled BSDF input slots the analyzer recognizes, in manifest order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderSlot {
    BaseColor,
    Metallic,
    Roughness,
    Specular,
    Normal,
    Emission,
    Alpha,
}

impl ShaderSlot {
    pub const ALL: [ShaderSlot; 7] = [
        ShaderSlot::BaseColor,
        ShaderSlot::Metallic,
        ShaderSlot::Roughness,
        ShaderSlot::Specular,
        ShaderSlot::Normal,
        ShaderSlot::Emission,
        ShaderSlot::Alpha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShaderSlot::BaseColor => "base_color",
            ShaderSlot::Metallic => "metallic",
            ShaderSlot::Roughness => "roughness",
            ShaderSlot::Specular => "specular",
            ShaderSlot::Normal => "normal",
            ShaderSlot::Emission => "emission",
            ShaderSlot::Alpha => "alpha",
        }
    }

    /// Socket names on the host node, current name first.
    pub fn socket_names(&self) -> &'static [&'static str] {
        match self {
            ShaderSlot::BaseColor => &["Base Color"],
            ShaderSlot::Metallic => &["Metallic"],
            ShaderSlot::Roughness => &["Roughness"],
            ShaderSlot::Specular => &["Specular IOR Level", "Specular"],
            ShaderSlot::Normal => &["Normal"],
            ShaderSlot::Emission => &["Emission Color", "Emission"],
            ShaderSlot::Alpha => &["Alpha"],
        }
    }
}

impl fmt::Display for ShaderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

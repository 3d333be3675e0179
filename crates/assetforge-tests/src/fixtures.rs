//! Synthetic scenes, meshes, shader graphs and a fake mesh exporter.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use assetforge_backend_blender::{
    ExportRequest, ExportResult, MeshExporter, SceneObject, SceneSnapshot,
};
use assetforge_spec::mesh::MeshData;
use assetforge_spec::shader::{
    Colorspace, ShaderGraph, ShaderLink, ShaderNode, SocketValue, TextureRef, NORMAL_MAP,
    PRINCIPLED_BSDF,
};
use tempfile::TempDir;

/// Closed, UV-mapped cube: 8 vertices, 6 quads, 12 triangles.
pub fn cube(name: &str) -> MeshData {
    MeshData::new(
        name,
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

/// Cube with its top face deleted: four boundary edges.
pub fn open_cube(name: &str) -> MeshData {
    let mut mesh = cube(name);
    mesh.faces.remove(1);
    mesh
}

/// Principled BSDF with a constant base color.
pub fn constant_graph() -> ShaderGraph {
    ShaderGraph::new(
        ShaderNode::new("bsdf", PRINCIPLED_BSDF)
            .with_input("Base Color", SocketValue::Vector(vec![0.8, 0.8, 0.8, 1.0]))
            .with_input("Roughness", SocketValue::Scalar(0.5)),
    )
}

/// Texture stored under `//textures/` next to the scene file.
pub fn texture(name: &str, colorspace: Colorspace) -> TextureRef {
    TextureRef::new(name, colorspace).with_path(format!("//textures/{}", name))
}

/// Image texture on Base Color and a normal texture through a normal-map node.
pub fn textured_graph(base_color: TextureRef, normal: TextureRef) -> ShaderGraph {
    ShaderGraph::new(ShaderNode::new("bsdf", PRINCIPLED_BSDF))
        .with_node(ShaderNode::image_texture("albedo", base_color))
        .with_node(ShaderNode::image_texture("normal_tex", normal))
        .with_node(ShaderNode::new("normal_map", NORMAL_MAP))
        .with_link(ShaderLink::new("albedo", "Color", "bsdf", "Base Color"))
        .with_link(ShaderLink::new("normal_tex", "Color", "normal_map", "Color"))
        .with_link(ShaderLink::new("normal_map", "Normal", "bsdf", "Normal"))
}

/// Base Color fed by a mix of two textures; the input is Complex.
pub fn mixed_graph(a: TextureRef, b: TextureRef) -> ShaderGraph {
    ShaderGraph::new(ShaderNode::new("bsdf", PRINCIPLED_BSDF))
        .with_node(ShaderNode::image_texture("a", a))
        .with_node(ShaderNode::image_texture("b", b))
        .with_node(ShaderNode::new("mix", "MIX"))
        .with_link(ShaderLink::new("a", "Color", "mix", "A"))
        .with_link(ShaderLink::new("b", "Color", "mix", "B"))
        .with_link(ShaderLink::new("mix", "Result", "bsdf", "Base Color"))
}

/// Scene with one selected mesh object using one material.
pub fn single_object_scene(mesh: MeshData, material: &str, graph: Option<ShaderGraph>) -> SceneSnapshot {
    let name = mesh.name.clone();
    SceneSnapshot::new()
        .with_object(SceneObject::mesh(mesh).with_material(material))
        .with_material(material, graph)
        .select(name)
}

/// A project folder holding a scene file, its textures and an export folder.
pub struct ProjectFixture {
    pub root: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(root.path().join("textures")).expect("Failed to create textures dir");
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Export directory; not created up front.
    pub fn export_dir(&self) -> PathBuf {
        self.root.path().join("Exports")
    }

    /// Path recorded as the scene's .blend file.
    pub fn blend_file(&self) -> PathBuf {
        self.root.path().join("props.blend")
    }

    /// Writes a placeholder image under `textures/`.
    pub fn add_texture(&self, name: &str) -> PathBuf {
        let path = self.root.path().join("textures").join(name);
        fs::write(&path, b"\x89PNG\r\n\x1a\n").expect("Failed to write texture");
        path
    }

    /// Attaches the scene file and refreshes texture presence against it.
    pub fn prepare(&self, scene: SceneSnapshot) -> SceneSnapshot {
        let mut scene = scene.with_blend_file(self.blend_file());
        scene.refresh_texture_presence(self.root.path());
        scene
    }

    /// Writes a scene snapshot file into the project.
    pub fn write_scene(&self, file_name: &str, scene: &SceneSnapshot) -> PathBuf {
        let path = self.root.path().join(file_name);
        let json = serde_json::to_string_pretty(scene).expect("Failed to serialize scene");
        fs::write(&path, json).expect("Failed to write scene");
        path
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Mesh exporter writing a placeholder FBX and recording requests.
#[derive(Default)]
pub struct FakeExporter {
    pub requests: RefCell<Vec<ExportRequest>>,
}

impl FakeExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl MeshExporter for FakeExporter {
    fn export_mesh(&self, request: &ExportRequest) -> ExportResult<()> {
        fs::write(&request.fbx_path, format!("FBX {}", request.object_name))?;
        self.requests.borrow_mut().push(request.clone());
        Ok(())
    }
}

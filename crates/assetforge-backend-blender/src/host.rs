//! Read-only access to the host scene.
//!
//! The pipeline never talks to Blender's object model directly. It asks a
//! [`HostScene`] for the selection, the mesh of an object and the shader graph
//! of a material. [`SceneSnapshot`] implements the interface over a JSON dump
//! of the scene, which is what the add-on hands over and what tests build.

use assetforge_spec::mesh::MeshData;
use assetforge_spec::shader::ShaderGraph;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::HostError;

/// Narrow read-only query interface over the host scene.
pub trait HostScene {
    /// Selected object names, active object first.
    fn selection(&self) -> Result<Vec<String>, HostError>;

    /// Mesh data of an object before modifiers; `None` for non-mesh objects.
    fn mesh_source(&self, object: &str) -> Result<Option<MeshData>, HostError>;

    /// Materials assigned to an object's slots, in slot order. Empty slots
    /// are left out.
    fn material_slots(&self, object: &str) -> Result<Vec<String>, HostError>;

    /// Shader graph of a material; `None` when it does not use nodes.
    fn shader_graph(&self, material: &str) -> Result<Option<ShaderGraph>, HostError>;

    /// Path of the saved scene file, if any.
    fn blend_file(&self) -> Option<PathBuf> {
        None
    }
}

/// One object in a scene snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshData>,
    /// Material slot contents; `null` for an empty slot.
    #[serde(default)]
    pub material_slots: Vec<Option<String>>,
}

impl SceneObject {
    /// Creates a mesh object.
    pub fn mesh(mesh: MeshData) -> Self {
        Self {
            name: mesh.name.clone(),
            mesh: Some(mesh),
            material_slots: Vec::new(),
        }
    }

    /// Builder method to append a material slot.
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material_slots.push(Some(material.into()));
        self
    }
}

/// One material in a scene snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMaterial {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<ShaderGraph>,
}

/// JSON dump of the parts of a scene the pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_file: Option<PathBuf>,
    #[serde(default)]
    pub selection: Vec<String>,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub materials: Vec<SceneMaterial>,
}

impl SceneSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a snapshot file.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let json = std::fs::read_to_string(path).map_err(|source| HostError::ReadSnapshot {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Builder method to add an object.
    pub fn with_object(mut self, object: SceneObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Builder method to add a material.
    pub fn with_material(mut self, name: impl Into<String>, graph: Option<ShaderGraph>) -> Self {
        self.materials.push(SceneMaterial {
            name: name.into(),
            graph,
        });
        self
    }

    /// Builder method to select an object (the first selected is active).
    pub fn select(mut self, object: impl Into<String>) -> Self {
        self.selection.push(object.into());
        self
    }

    /// Builder method to set the scene file.
    pub fn with_blend_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.blend_file = Some(path.into());
        self
    }

    fn object(&self, name: &str) -> Result<&SceneObject, HostError> {
        self.objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| HostError::ObjectNotFound(name.to_string()))
    }

    /// Sets each texture's `on_disk` flag from the file system.
    ///
    /// Blender-relative paths (`//textures/a.png`) resolve against `base`.
    /// Textures without a path are left untouched.
    pub fn refresh_texture_presence(&mut self, base: &Path) {
        for material in &mut self.materials {
            let Some(graph) = &mut material.graph else {
                continue;
            };
            for image in graph.nodes.iter_mut().filter_map(|n| n.image.as_mut()) {
                if let Some(path) = &image.path {
                    image.on_disk = resolve_host_path(base, path).exists();
                }
            }
        }
    }
}

/// Resolves a host path, treating a leading `//` as relative to `base`.
pub fn resolve_host_path(base: &Path, path: &str) -> PathBuf {
    match path.strip_prefix("//") {
        Some(relative) => base.join(relative),
        None => PathBuf::from(path),
    }
}

impl HostScene for SceneSnapshot {
    fn selection(&self) -> Result<Vec<String>, HostError> {
        Ok(self.selection.clone())
    }

    fn mesh_source(&self, object: &str) -> Result<Option<MeshData>, HostError> {
        Ok(self.object(object)?.mesh.clone())
    }

    fn material_slots(&self, object: &str) -> Result<Vec<String>, HostError> {
        Ok(self.object(object)?.material_slots.iter().flatten().cloned().collect())
    }

    fn shader_graph(&self, material: &str) -> Result<Option<ShaderGraph>, HostError> {
        Ok(self
            .materials
            .iter()
            .find(|m| m.name == material)
            .and_then(|m| m.graph.clone()))
    }

    fn blend_file(&self) -> Option<PathBuf> {
        self.blend_file.clone()
    }
}

//! Engine-import hints: where the importer puts things and how it binds
//! textures to material-instance parameters.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::MaterialEntry;
use crate::config::EngineSettings;
use crate::texture::TextureRole;

/// Everything the engine-side importer needs beyond the raw analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineImportHints {
    /// Naming-corrected asset name to import under.
    pub asset_name: String,
    pub destination: DestinationFolders,
    /// Parent material for created instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_material: Option<String>,
    /// Texture role → material-instance parameter.
    pub slot_table: BTreeMap<TextureRole, String>,
    /// One entry per exported material, in manifest order.
    pub materials: Vec<MaterialInstanceHint>,
}

impl EngineImportHints {
    /// Derives hints from material entries and engine settings.
    ///
    /// Only textures listed in a material's dependencies are bound, and
    /// textures with an unknown role or unmapped role are left unbound.
    pub fn derive(asset_name: &str, materials: &[MaterialEntry], engine: &EngineSettings) -> Self {
        let materials = materials
            .iter()
            .map(|material| MaterialInstanceHint::derive(material, &engine.slot_table))
            .collect();

        Self {
            asset_name: asset_name.to_string(),
            destination: DestinationFolders::new(&engine.assets_directory, asset_name),
            master_material: engine.master_material.clone(),
            slot_table: engine.slot_table.clone(),
            materials,
        }
    }

    /// All texture bindings across materials.
    pub fn bindings(&self) -> impl Iterator<Item = &TextureBinding> {
        self.materials.iter().flat_map(|m| m.texture_bindings.iter())
    }
}

/// Engine folders for the imported asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationFolders {
    pub root: String,
    pub mesh: String,
    pub textures: String,
    pub materials: String,
}

impl DestinationFolders {
    /// Lays out `<root>/<asset>/{Mesh,Textures,Materials}`.
    pub fn new(assets_directory: &str, asset_name: &str) -> Self {
        let root = format!("{}/{}", assets_directory.trim_end_matches('/'), asset_name);
        Self {
            mesh: format!("{}/Mesh", root),
            textures: format!("{}/Textures", root),
            materials: format!("{}/Materials", root),
            root,
        }
    }
}

/// Material instance to create for one exported material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialInstanceHint {
    /// Material name in the host scene.
    pub material_name: String,
    /// Naming-corrected instance name.
    pub instance_name: String,
    pub texture_bindings: Vec<TextureBinding>,
}

impl MaterialInstanceHint {
    fn derive(material: &MaterialEntry, slot_table: &BTreeMap<TextureRole, String>) -> Self {
        let mut bound_parameters = BTreeSet::new();
        let mut texture_bindings = Vec::new();

        for dependency in &material.texture_dependencies {
            let Some(parameter) = slot_table.get(&dependency.role) else {
                continue;
            };
            // First texture (in dependency order) wins a contested parameter.
            if !bound_parameters.insert(parameter.clone()) {
                continue;
            }
            texture_bindings.push(TextureBinding {
                material: material.material_name.clone(),
                texture: dependency.name.clone(),
                normalized_name: dependency.normalized_name.clone(),
                path: dependency.path.clone(),
                role: dependency.role,
                parameter: parameter.clone(),
                static_switch: static_switch_name(parameter),
            });
        }

        Self {
            material_name: material.material_name.clone(),
            instance_name: material.normalized_name.clone(),
            texture_bindings,
        }
    }
}

/// Binding of a texture to a material-instance parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureBinding {
    pub material: String,
    /// Texture name as exported.
    pub texture: String,
    /// Name the importer renames the texture asset to.
    pub normalized_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub role: TextureRole,
    /// Texture parameter on the material instance.
    pub parameter: String,
    /// Static switch enabling the texture path in the master material.
    pub static_switch: String,
}

/// Static switch parameter paired with a texture parameter.
pub fn static_switch_name(parameter: &str) -> String {
    format!("Use{}Texture", parameter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::TextureDependency;
    use crate::material::Complexity;
    use crate::shader::Colorspace;
    use pretty_assertions::assert_eq;

    fn dependency(name: &str, role: TextureRole) -> TextureDependency {
        TextureDependency {
            name: name.to_string(),
            normalized_name: format!("T_{}", name),
            path: None,
            role,
            colorspace: role.required_colorspace().unwrap_or(Colorspace::Linear),
        }
    }

    fn material(deps: Vec<TextureDependency>) -> MaterialEntry {
        MaterialEntry {
            material_name: "Rock".to_string(),
            normalized_name: "MI_Rock".to_string(),
            shader_type: Some("BSDF_PRINCIPLED".to_string()),
            complexity: Complexity::Texture,
            slot_complexity: BTreeMap::new(),
            inputs: BTreeMap::new(),
            texture_dependencies: deps,
        }
    }

    #[test]
    fn test_destination_folders() {
        let folders = DestinationFolders::new("/Game/Assets/", "SM_Crate");
        assert_eq!(folders.root, "/Game/Assets/SM_Crate");
        assert_eq!(folders.mesh, "/Game/Assets/SM_Crate/Mesh");
        assert_eq!(folders.textures, "/Game/Assets/SM_Crate/Textures");
        assert_eq!(folders.materials, "/Game/Assets/SM_Crate/Materials");
    }

    #[test]
    fn test_bindings_skip_unknown_roles() {
        let entry = material(vec![
            dependency("Rock_BC", TextureRole::Albedo),
            dependency("Rock_Mask", TextureRole::Unknown),
            dependency("Rock_N", TextureRole::Normal),
        ]);
        let hints = EngineImportHints::derive("SM_Rock", &[entry], &EngineSettings::default());

        let bound: Vec<_> = hints
            .bindings()
            .map(|b| (b.texture.as_str(), b.parameter.as_str(), b.static_switch.as_str()))
            .collect();
        assert_eq!(
            bound,
            vec![
                ("Rock_BC", "BaseColor", "UseBaseColorTexture"),
                ("Rock_N", "Normal", "UseNormalTexture"),
            ]
        );
        assert_eq!(hints.materials[0].instance_name, "MI_Rock");
    }

    #[test]
    fn test_contested_parameter_binds_once() {
        let entry = material(vec![
            dependency("A_BC", TextureRole::Albedo),
            dependency("B_BC", TextureRole::Albedo),
        ]);
        let hints = EngineImportHints::derive("SM_Rock", &[entry], &EngineSettings::default());
        assert_eq!(hints.bindings().count(), 1);
        assert_eq!(hints.bindings().next().unwrap().texture, "A_BC");
    }
}

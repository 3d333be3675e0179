//! Asset identity and asset type profiles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset type profile selecting naming rules, budgets and severity overrides.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AssetProfile {
    /// Small props: background clutter, low triangle budget.
    #[default]
    SmallProp,
    /// Hero props: close-up assets held to the strictest rules.
    HeroProp,
    /// Modular kit pieces snapped together in the level.
    ModularPiece,
}

impl AssetProfile {
    /// All profiles in declaration order.
    pub const ALL: [AssetProfile; 3] = [
        AssetProfile::SmallProp,
        AssetProfile::HeroProp,
        AssetProfile::ModularPiece,
    ];

    /// Returns the snake_case identifier used in configuration and manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetProfile::SmallProp => "small_prop",
            AssetProfile::HeroProp => "hero_prop",
            AssetProfile::ModularPiece => "modular_piece",
        }
    }
}

impl fmt::Display for AssetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "small_prop" => Ok(AssetProfile::SmallProp),
            "hero_prop" => Ok(AssetProfile::HeroProp),
            "modular_piece" => Ok(AssetProfile::ModularPiece),
            _ => Err(format!(
                "unknown asset profile '{}', expected one of: small_prop, hero_prop, modular_piece",
                s
            )),
        }
    }
}

/// Kind of named entity checked by the naming engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Mesh,
    Material,
    Texture,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Mesh => "mesh",
            EntityKind::Material => "material",
            EntityKind::Texture => "texture",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mesh" => Ok(EntityKind::Mesh),
            "material" => Ok(EntityKind::Material),
            "texture" => Ok(EntityKind::Texture),
            _ => Err(format!(
                "unknown entity kind '{}', expected mesh, material or texture",
                s
            )),
        }
    }
}

/// Identity of the asset being exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIdentity {
    /// Object name as it appears in the host scene.
    pub name: String,
    /// Profile the asset is validated against.
    pub profile: AssetProfile,
}

impl AssetIdentity {
    pub fn new(name: impl Into<String>, profile: AssetProfile) -> Self {
        Self {
            name: name.into(),
            profile,
        }
    }
}

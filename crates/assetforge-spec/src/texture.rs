//! Texture role classification types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shader::{Colorspace, ShaderSlot};

/// What a texture is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureRole {
    Albedo,
    Normal,
    Roughness,
    Metallic,
    AmbientOcclusion,
    Emissive,
    Opacity,
    Height,
    Unknown,
}

impl TextureRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextureRole::Albedo => "albedo",
            TextureRole::Normal => "normal",
            TextureRole::Roughness => "roughness",
            TextureRole::Metallic => "metallic",
            TextureRole::AmbientOcclusion => "ambient_occlusion",
            TextureRole::Emissive => "emissive",
            TextureRole::Opacity => "opacity",
            TextureRole::Height => "height",
            TextureRole::Unknown => "unknown",
        }
    }

    /// Colorspace the engine must sample this role with.
    ///
    /// Returns `None` for [`TextureRole::Unknown`].
    pub fn required_colorspace(&self) -> Option<Colorspace> {
        match self {
            TextureRole::Albedo | TextureRole::Emissive => Some(Colorspace::Srgb),
            TextureRole::Unknown => None,
            _ => Some(Colorspace::Linear),
        }
    }
}

impl fmt::Display for TextureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextureRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = match s.to_lowercase().as_str() {
            "albedo" | "base_color" => TextureRole::Albedo,
            "normal" => TextureRole::Normal,
            "roughness" => TextureRole::Roughness,
            "metallic" => TextureRole::Metallic,
            "ambient_occlusion" | "ao" => TextureRole::AmbientOcclusion,
            "emissive" => TextureRole::Emissive,
            "opacity" => TextureRole::Opacity,
            "height" => TextureRole::Height,
            "unknown" => TextureRole::Unknown,
            _ => return Err(format!("unknown texture role '{}'", s)),
        };
        Ok(role)
    }
}

/// Which decision step produced a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationSource {
    /// A configured naming token matched the file name.
    NamingConvention { token: String },
    /// Inferred from the shader slot the texture feeds.
    SlotHeuristic { slot: ShaderSlot },
    /// Nothing matched.
    Unmatched,
}

/// Inferred role and required colorspace for one texture use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureClassification {
    /// Image name.
    pub texture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Material whose graph references the texture.
    pub material: String,
    /// Slot the texture feeds, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<ShaderSlot>,
    pub role: TextureRole,
    /// Colorspace the role requires; the declared one for unknown roles.
    pub colorspace: Colorspace,
    /// Colorspace declared on the sampling node.
    pub declared_colorspace: Colorspace,
    /// Whether the backing file exists on disk.
    pub on_disk: bool,
    pub source: ClassificationSource,
}

impl TextureClassification {
    /// True when the declared colorspace differs from the required one.
    pub fn colorspace_mismatch(&self) -> bool {
        self.role != TextureRole::Unknown && self.colorspace != self.declared_colorspace
    }
}

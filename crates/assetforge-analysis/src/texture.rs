//! Texture classifier: infers texture roles and required colorspaces.
//!
//! Decision order, first match wins:
//!
//! 1. A configured naming token at the end of the file stem (`Rock_N` → normal)
//! 2. The shader slot the texture feeds (base color → albedo)
//! 3. Otherwise the role is [`TextureRole::Unknown`]

use assetforge_spec::config::{ExportConfig, TextureRoleToken};
use assetforge_spec::material::MaterialAnalysis;
use assetforge_spec::shader::{ShaderSlot, TextureRef};
use assetforge_spec::texture::{ClassificationSource, TextureClassification, TextureRole};

/// Classifies textures by naming convention, then by shader slot.
#[derive(Debug, Clone)]
pub struct TextureClassifier {
    /// Longest token first, so `_BaseColor` is tried before `_BC`... and `_AO`
    /// before `_O`.
    tokens: Vec<TextureRoleToken>,
}

impl Default for TextureClassifier {
    fn default() -> Self {
        Self::new(TextureRoleToken::defaults())
    }
}

impl TextureClassifier {
    pub fn new(mut tokens: Vec<TextureRoleToken>) -> Self {
        tokens.retain(|t| !t.token.is_empty());
        tokens.sort_by(|a, b| b.token.len().cmp(&a.token.len()));
        Self { tokens }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.texture_roles.clone())
    }

    /// Finds the naming token the stem ends with, ignoring case.
    pub fn match_token(&self, stem: &str) -> Option<&TextureRoleToken> {
        let stem = stem.to_lowercase();
        self.tokens
            .iter()
            .find(|t| stem.ends_with(&t.token.to_lowercase()))
    }

    /// Classifies one use of a texture in `material`, feeding `slot`.
    pub fn classify(
        &self,
        material: &str,
        texture: &TextureRef,
        slot: Option<ShaderSlot>,
    ) -> TextureClassification {
        let (role, source) = if let Some(token) = self.match_token(texture.stem()) {
            (
                token.role,
                ClassificationSource::NamingConvention {
                    token: token.token.clone(),
                },
            )
        } else if let Some((slot, role)) = slot.and_then(|s| slot_role(s).map(|r| (s, r))) {
            (role, ClassificationSource::SlotHeuristic { slot })
        } else {
            (TextureRole::Unknown, ClassificationSource::Unmatched)
        };

        TextureClassification {
            texture: texture.name.clone(),
            path: texture.path.clone(),
            material: material.to_string(),
            slot,
            role,
            colorspace: role.required_colorspace().unwrap_or(texture.colorspace),
            declared_colorspace: texture.colorspace,
            on_disk: texture.on_disk,
            source,
        }
    }

    /// Classifies every texture input of an analyzed material, in slot order.
    pub fn classify_material(&self, analysis: &MaterialAnalysis) -> Vec<TextureClassification> {
        analysis
            .texture_inputs()
            .map(|(slot, texture)| self.classify(&analysis.material_name, texture, Some(slot)))
            .collect()
    }
}

/// Role implied by the slot a texture feeds.
pub fn slot_role(slot: ShaderSlot) -> Option<TextureRole> {
    match slot {
        ShaderSlot::BaseColor => Some(TextureRole::Albedo),
        ShaderSlot::Metallic => Some(TextureRole::Metallic),
        ShaderSlot::Roughness => Some(TextureRole::Roughness),
        ShaderSlot::Normal => Some(TextureRole::Normal),
        ShaderSlot::Emission => Some(TextureRole::Emissive),
        ShaderSlot::Alpha => Some(TextureRole::Opacity),
        ShaderSlot::Specular => None,
    }
}

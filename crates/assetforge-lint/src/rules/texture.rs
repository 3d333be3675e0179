//! Texture rules over the classifications.
//!
//! A texture used by several slots yields one classification per use; each
//! rule reports a texture at most once per material.

use assetforge_spec::finding::{Category, Finding, Severity};
use assetforge_spec::texture::{TextureClassification, TextureRole};
use std::collections::BTreeSet;

use super::{RuleContext, ValidationRule};

/// Returns all texture rules.
pub fn all_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(UnknownRoleRule),
        Box::new(ColorspaceMismatchRule),
        Box::new(MissingFileRule),
    ]
}

/// Classifications matching `pred`, first use per (material, texture) only.
fn distinct<'a>(
    textures: &'a [TextureClassification],
    pred: impl Fn(&TextureClassification) -> bool,
) -> Vec<&'a TextureClassification> {
    let mut seen = BTreeSet::new();
    textures
        .iter()
        .filter(|t| pred(t))
        .filter(|t| seen.insert((t.material.as_str(), t.texture.as_str())))
        .collect()
}

fn slot_label(t: &TextureClassification) -> String {
    t.slot
        .map(|s| format!(" ({})", s))
        .unwrap_or_default()
}

pub struct UnknownRoleRule;

impl ValidationRule for UnknownRoleRule {
    fn id(&self) -> &'static str {
        "texture/unknown-role"
    }

    fn category(&self) -> Category {
        Category::Texture
    }

    fn description(&self) -> &'static str {
        "Texture role could not be inferred from its name or slot"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        distinct(ctx.textures, |t| t.role == TextureRole::Unknown)
            .into_iter()
            .map(|t| {
                self.finding(
                    format!(
                        "role of texture used by '{}'{} is unknown; it will not be bound on import",
                        t.material,
                        slot_label(t)
                    ),
                    &t.texture,
                )
                .with_suggestion("Add a role suffix such as _BC, _N or _R to the file name")
            })
            .collect()
    }
}

pub struct ColorspaceMismatchRule;

impl ValidationRule for ColorspaceMismatchRule {
    fn id(&self) -> &'static str {
        "texture/colorspace-mismatch"
    }

    fn category(&self) -> Category {
        Category::Texture
    }

    fn description(&self) -> &'static str {
        "Declared colorspace differs from the one the texture role requires"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        distinct(ctx.textures, TextureClassification::colorspace_mismatch)
            .into_iter()
            .map(|t| {
                self.finding(
                    format!(
                        "{} texture in '{}'{} is declared {} but must be sampled as {}",
                        t.role,
                        t.material,
                        slot_label(t),
                        t.declared_colorspace,
                        t.colorspace
                    ),
                    &t.texture,
                )
                .with_actual_value(t.declared_colorspace.to_string())
                .with_expected(t.colorspace.to_string())
                .with_suggestion(format!("Set the image colorspace to {}", t.colorspace))
            })
            .collect()
    }
}

pub struct MissingFileRule;

impl ValidationRule for MissingFileRule {
    fn id(&self) -> &'static str {
        "texture/missing-file"
    }

    fn category(&self) -> Category {
        Category::Texture
    }

    fn description(&self) -> &'static str {
        "Texture image file does not exist on disk"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        let mut seen = BTreeSet::new();
        ctx.textures
            .iter()
            .filter(|t| !t.on_disk && seen.insert(t.texture.as_str()))
            .map(|t| {
                let finding = self
                    .finding(
                        format!("image file for texture used by '{}' is missing", t.material),
                        &t.texture,
                    )
                    .with_suggestion("Relink or save the image before exporting");
                match &t.path {
                    Some(path) => finding.with_actual_value(path),
                    None => finding,
                }
            })
            .collect()
    }
}

//! Naming convention rules, one per entity kind.

use assetforge_spec::asset::EntityKind;
use assetforge_spec::finding::{Category, Finding, Severity};

use super::{RuleContext, ValidationRule};

/// Returns all naming rules.
pub fn all_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(NamingConventionRule::new(EntityKind::Mesh)),
        Box::new(NamingConventionRule::new(EntityKind::Material)),
        Box::new(NamingConventionRule::new(EntityKind::Texture)),
    ]
}

/// Reports names of one entity kind that fail their naming check.
pub struct NamingConventionRule {
    kind: EntityKind,
}

impl NamingConventionRule {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }
}

impl ValidationRule for NamingConventionRule {
    fn id(&self) -> &'static str {
        match self.kind {
            EntityKind::Mesh => "naming/mesh",
            EntityKind::Material => "naming/material",
            EntityKind::Texture => "naming/texture",
        }
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn description(&self) -> &'static str {
        match self.kind {
            EntityKind::Mesh => "Mesh name follows the profile's naming convention",
            EntityKind::Material => "Material names follow the profile's naming convention",
            EntityKind::Texture => "Texture file names follow the profile's naming convention",
        }
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        ctx.naming
            .iter()
            .filter(|check| check.kind == self.kind && !check.passed)
            .map(|check| {
                let finding = self
                    .finding(
                        format!("{} name '{}': {}", self.kind, check.name, check.summary()),
                        &check.name,
                    )
                    .with_actual_value(&check.name);
                match &check.suggestion {
                    Some(suggestion) => finding
                        .with_expected(suggestion)
                        .with_suggestion(format!("Rename to '{}'", suggestion)),
                    None => finding,
                }
            })
            .collect()
    }
}

//! Validation rule trait and the rule modules.

use assetforge_analysis::naming::NamingCheck;
use assetforge_spec::asset::AssetIdentity;
use assetforge_spec::config::ExportConfig;
use assetforge_spec::finding::{Category, Finding, Severity};
use assetforge_spec::material::MaterialAnalysis;
use assetforge_spec::mesh::MeshInspection;
use assetforge_spec::texture::TextureClassification;

pub mod geometry;
pub mod material;
pub mod naming;
pub mod texture;

#[cfg(test)]
mod tests;

/// Analysis outputs shared by every rule.
///
/// Rules read from here only; no rule sees another rule's findings.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub asset: &'a AssetIdentity,
    pub config: &'a ExportConfig,
    /// `None` when the selected object has no mesh data.
    pub mesh: Option<&'a MeshInspection>,
    pub materials: &'a [MaterialAnalysis],
    pub textures: &'a [TextureClassification],
    pub naming: &'a [NamingCheck],
}

/// A validation rule over the analysis outputs.
pub trait ValidationRule: Send + Sync {
    /// Unique identifier (e.g., "geometry/missing-uv").
    fn id(&self) -> &'static str;

    fn category(&self) -> Category;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Severity when no override applies.
    fn default_severity(&self) -> Severity;

    /// Run the check, return findings at the default severity.
    ///
    /// The registry applies configured severity overrides afterwards.
    fn check(&self, ctx: &RuleContext) -> Vec<Finding>;

    /// Creates a finding for this rule at its default severity.
    fn finding(&self, message: impl Into<String>, subject: impl Into<String>) -> Finding
    where
        Self: Sized,
    {
        Finding::new(
            self.id(),
            self.category(),
            self.default_severity(),
            message,
            subject,
        )
    }
}

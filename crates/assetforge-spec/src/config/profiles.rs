//! Built-in asset type profile presets.

use super::{CaseConvention, NamingConventions, NamingRule, ProfileConfig, SeverityOverrides};
use crate::asset::AssetProfile;
use crate::finding::Severity;

impl ProfileConfig {
    /// Returns the built-in preset for a profile.
    pub fn preset(profile: AssetProfile) -> Self {
        match profile {
            AssetProfile::SmallProp => Self::small_prop(),
            AssetProfile::HeroProp => Self::hero_prop(),
            AssetProfile::ModularPiece => Self::modular_piece(),
        }
    }

    /// Looks up a preset by name (`small_prop`, `hero-prop`, ...).
    pub fn by_name(name: &str) -> Option<Self> {
        name.parse::<AssetProfile>().ok().map(Self::preset)
    }

    /// Small background props: default studio prefixes, warnings only.
    pub fn small_prop() -> Self {
        Self {
            naming: NamingConventions {
                mesh: NamingRule::with_prefix("SM_"),
                material: NamingRule::with_prefix("MI_"),
                texture: NamingRule::with_prefix("T_"),
            },
            severity_overrides: SeverityOverrides::default(),
            max_triangles: Some(5_000),
        }
    }

    /// Hero props: own mesh prefix, PascalCase, naming and colorspace
    /// problems block export.
    pub fn hero_prop() -> Self {
        Self {
            naming: NamingConventions {
                mesh: NamingRule::with_prefix("HP_").case(CaseConvention::Pascal),
                material: NamingRule::with_prefix("MI_").case(CaseConvention::Pascal),
                texture: NamingRule::with_prefix("T_"),
            },
            severity_overrides: SeverityOverrides::new()
                .with("naming/mesh", Severity::Error)
                .with("naming/material", Severity::Error)
                .with("texture/colorspace-mismatch", Severity::Error)
                .with("texture/unknown-role", Severity::Warning),
            max_triangles: Some(100_000),
        }
    }

    /// Modular kit pieces: `SM_<Name>_MOD`, stray vertices break snapping.
    pub fn modular_piece() -> Self {
        Self {
            naming: NamingConventions {
                mesh: NamingRule::with_prefix("SM_").suffix("_MOD"),
                material: NamingRule::with_prefix("MI_"),
                texture: NamingRule::with_prefix("T_"),
            },
            severity_overrides: SeverityOverrides::new()
                .with("geometry/isolated-vertices", Severity::Error),
            max_triangles: Some(20_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_by_name() {
        assert_eq!(
            ProfileConfig::by_name("hero-prop"),
            Some(ProfileConfig::hero_prop())
        );
        assert_eq!(
            ProfileConfig::by_name("modular_piece"),
            Some(ProfileConfig::modular_piece())
        );
        assert_eq!(ProfileConfig::by_name("vehicle"), None);
    }

    #[test]
    fn test_profiles_differ_in_mesh_prefix() {
        let hero = ProfileConfig::hero_prop();
        let modular = ProfileConfig::modular_piece();
        assert_eq!(hero.naming.mesh.prefix.as_deref(), Some("HP_"));
        assert_eq!(modular.naming.mesh.suffix.as_deref(), Some("_MOD"));
    }

    #[test]
    fn test_budgets_increase_with_importance() {
        let small = ProfileConfig::small_prop().max_triangles.unwrap();
        let modular = ProfileConfig::modular_piece().max_triangles.unwrap();
        let hero = ProfileConfig::hero_prop().max_triangles.unwrap();
        assert!(small < modular && modular < hero);
    }
}

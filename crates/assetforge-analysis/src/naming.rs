//! Naming convention engine.
//!
//! Checks identifier strings against the [`NamingRule`] configured for an
//! entity kind and suggests a corrected name. The suggestion is built as
//! `prefix + body + suffix`, where the body is the sanitized name with any
//! existing prefix and suffix removed, so applying it twice changes nothing.

use assetforge_spec::asset::{AssetProfile, EntityKind};
use assetforge_spec::config::{
    CaseConvention, ConfigError, ExportConfig, NamingConventions, NamingRule, ProfileConfig,
};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Body used when nothing of the original name survives sanitizing.
pub const PLACEHOLDER_BODY: &str = "Unnamed";

/// One way a name breaks its rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamingViolation {
    Empty,
    /// Only prefix and suffix, nothing in between.
    EmptyBody,
    MissingPrefix { expected: String },
    MissingSuffix { expected: String },
    DisallowedCharacters { characters: String },
    Case { expected: CaseConvention },
    Pattern { pattern: String },
}

impl fmt::Display for NamingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingViolation::Empty => write!(f, "name is empty"),
            NamingViolation::EmptyBody => write!(f, "name has nothing besides prefix and suffix"),
            NamingViolation::MissingPrefix { expected } => {
                write!(f, "missing prefix '{}'", expected)
            }
            NamingViolation::MissingSuffix { expected } => {
                write!(f, "missing suffix '{}'", expected)
            }
            NamingViolation::DisallowedCharacters { characters } => {
                write!(f, "contains disallowed characters {:?}", characters)
            }
            NamingViolation::Case { expected } => {
                write!(f, "does not follow {:?} case", expected)
            }
            NamingViolation::Pattern { pattern } => {
                write!(f, "does not match pattern '{}'", pattern)
            }
        }
    }
}

/// Result of checking one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingCheck {
    pub name: String,
    pub kind: EntityKind,
    pub passed: bool,
    pub violations: Vec<NamingViolation>,
    /// Corrected name; present only when the check failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl NamingCheck {
    /// Violations joined into one sentence.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: NamingRule,
    pattern: Option<Regex>,
}

impl CompiledRule {
    fn compile(rule: NamingRule) -> Result<Self, ConfigError> {
        let pattern = rule.compiled_pattern()?;
        Ok(Self { rule, pattern })
    }
}

/// Checks names against per-kind naming rules.
#[derive(Debug, Clone)]
pub struct NamingEngine {
    mesh: CompiledRule,
    material: CompiledRule,
    texture: CompiledRule,
}

impl NamingEngine {
    /// Compiles the conventions; fails on an invalid pattern.
    pub fn new(conventions: NamingConventions) -> Result<Self, ConfigError> {
        Ok(Self {
            mesh: CompiledRule::compile(conventions.mesh)?,
            material: CompiledRule::compile(conventions.material)?,
            texture: CompiledRule::compile(conventions.texture)?,
        })
    }

    /// Engine for an export, with the configured naming prefix applied.
    pub fn from_config(config: &ExportConfig) -> Result<Self, ConfigError> {
        Self::new(NamingConventions {
            mesh: config.naming_rule(EntityKind::Mesh),
            material: config.naming_rule(EntityKind::Material),
            texture: config.naming_rule(EntityKind::Texture),
        })
    }

    /// Engine for a built-in profile preset.
    pub fn for_profile(profile: AssetProfile) -> Result<Self, ConfigError> {
        Self::new(ProfileConfig::preset(profile).naming)
    }

    pub fn rule(&self, kind: EntityKind) -> &NamingRule {
        &self.compiled(kind).rule
    }

    fn compiled(&self, kind: EntityKind) -> &CompiledRule {
        match kind {
            EntityKind::Mesh => &self.mesh,
            EntityKind::Material => &self.material,
            EntityKind::Texture => &self.texture,
        }
    }

    /// Checks `name` against the rule for `kind`.
    pub fn check(&self, name: &str, kind: EntityKind) -> NamingCheck {
        let compiled = self.compiled(kind);
        let rule = &compiled.rule;
        let mut violations = Vec::new();

        if name.is_empty() {
            violations.push(NamingViolation::Empty);
        } else {
            let has_prefix = rule.prefix.as_deref().map_or(true, |p| name.starts_with(p));
            let has_suffix = rule.suffix.as_deref().map_or(true, |s| name.ends_with(s));
            if let (false, Some(p)) = (has_prefix, &rule.prefix) {
                violations.push(NamingViolation::MissingPrefix {
                    expected: p.clone(),
                });
            }
            if let (false, Some(s)) = (has_suffix, &rule.suffix) {
                violations.push(NamingViolation::MissingSuffix {
                    expected: s.clone(),
                });
            }

            let bad = disallowed_in(rule, name);
            if !bad.is_empty() {
                violations.push(NamingViolation::DisallowedCharacters { characters: bad });
            }

            let start = match (&rule.prefix, has_prefix) {
                (Some(p), true) => p.len(),
                _ => 0,
            };
            let end = match (&rule.suffix, has_suffix) {
                (Some(s), true) => name.len() - s.len(),
                _ => name.len(),
            };
            let body = if start <= end { &name[start..end] } else { "" };

            if body.is_empty() {
                violations.push(NamingViolation::EmptyBody);
            } else if !follows_case(body, rule.case) {
                violations.push(NamingViolation::Case {
                    expected: rule.case,
                });
            }

            if let Some(pattern) = &compiled.pattern {
                if !pattern.is_match(name) {
                    violations.push(NamingViolation::Pattern {
                        pattern: pattern.as_str().to_string(),
                    });
                }
            }
        }

        let passed = violations.is_empty();
        NamingCheck {
            name: name.to_string(),
            kind,
            passed,
            suggestion: (!passed).then(|| self.suggest(name, kind)),
            violations,
        }
    }

    /// Suggests a corrected name for `name`.
    ///
    /// Disallowed characters become underscores, the existing prefix and
    /// suffix are matched case-insensitively and replaced by the configured
    /// ones, and the body is recased.
    pub fn suggest(&self, name: &str, kind: EntityKind) -> String {
        let rule = self.rule(kind);
        let sanitized = sanitize(rule, name);

        let mut body = sanitized.as_str();
        if let Some(rest) = rule.prefix.as_deref().and_then(|p| strip_prefix_ci(body, p)) {
            body = rest;
        }
        if let Some(rest) = rule.suffix.as_deref().and_then(|s| strip_suffix_ci(body, s)) {
            body = rest;
        }
        let body = body.trim_matches('_');
        let body = if body.is_empty() { PLACEHOLDER_BODY } else { body };

        format!(
            "{}{}{}",
            rule.prefix.as_deref().unwrap_or(""),
            apply_case(body, rule.case),
            rule.suffix.as_deref().unwrap_or("")
        )
    }
}

fn is_disallowed(rule: &NamingRule, c: char) -> bool {
    c.is_whitespace() || c.is_control() || rule.disallowed_characters.contains(c)
}

/// Distinct disallowed characters in order of first appearance.
fn disallowed_in(rule: &NamingRule, name: &str) -> String {
    let mut found = String::new();
    for c in name.chars().filter(|&c| is_disallowed(rule, c)) {
        if !found.contains(c) {
            found.push(c);
        }
    }
    found
}

/// Replaces disallowed characters with `_`, collapses runs of underscores
/// and drops leading ones. Trailing underscores stay so a bare prefix such as
/// `HP_` is still recognized.
fn sanitize(rule: &NamingRule, name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if is_disallowed(rule, c) { '_' } else { c };
        if c == '_' && (out.is_empty() || out.ends_with('_')) {
            continue;
        }
        out.push(c);
    }
    out
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    let tail = s.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &s[..split])
}

fn follows_case(body: &str, case: CaseConvention) -> bool {
    match case {
        CaseConvention::Any => true,
        CaseConvention::Pascal => body
            .split('_')
            .filter_map(|segment| segment.chars().next())
            .all(|c| !c.is_lowercase()),
        CaseConvention::Lower => !body.chars().any(char::is_uppercase),
        CaseConvention::Upper => !body.chars().any(char::is_lowercase),
    }
}

fn apply_case(body: &str, case: CaseConvention) -> String {
    match case {
        CaseConvention::Any => body.to_string(),
        CaseConvention::Lower => body.to_lowercase(),
        CaseConvention::Upper => body.to_uppercase(),
        CaseConvention::Pascal => body
            .split('_')
            .map(|segment| {
                let mut chars = segment.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join("_"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hero() -> NamingEngine {
        NamingEngine::for_profile(AssetProfile::HeroProp).unwrap()
    }

    #[test]
    fn test_hero_prop_prefix() {
        let engine = hero();

        let ok = engine.check("HP_Sword", EntityKind::Mesh);
        assert!(ok.passed);
        assert!(ok.suggestion.is_none());

        let bad = engine.check("Sword", EntityKind::Mesh);
        assert!(!bad.passed);
        assert_eq!(
            bad.violations,
            vec![NamingViolation::MissingPrefix {
                expected: "HP_".to_string()
            }]
        );
        assert_eq!(bad.suggestion.as_deref(), Some("HP_Sword"));
    }

    #[test]
    fn test_disallowed_characters_and_case() {
        let engine = hero();
        let check = engine.check("HP_rusty sword.001", EntityKind::Mesh);

        assert!(check.violations.contains(&NamingViolation::DisallowedCharacters {
            characters: " .".to_string()
        }));
        assert!(check.violations.contains(&NamingViolation::Case {
            expected: CaseConvention::Pascal
        }));
        assert_eq!(check.suggestion.as_deref(), Some("HP_Rusty_Sword_001"));
    }

    #[test]
    fn test_existing_prefix_matched_case_insensitively() {
        let engine = NamingEngine::for_profile(AssetProfile::SmallProp).unwrap();
        assert_eq!(engine.suggest("sm_crate", EntityKind::Mesh), "SM_crate");
        assert_eq!(engine.suggest("crate", EntityKind::Material), "MI_crate");
        assert_eq!(engine.suggest("Crate_BC", EntityKind::Texture), "T_Crate_BC");
    }

    #[test]
    fn test_suffix() {
        let engine = NamingEngine::for_profile(AssetProfile::ModularPiece).unwrap();

        let check = engine.check("SM_Wall", EntityKind::Mesh);
        assert_eq!(
            check.violations,
            vec![NamingViolation::MissingSuffix {
                expected: "_MOD".to_string()
            }]
        );
        assert_eq!(check.suggestion.as_deref(), Some("SM_Wall_MOD"));
        assert!(engine.check("SM_Wall_MOD", EntityKind::Mesh).passed);
    }

    #[test]
    fn test_empty_and_body_less_names() {
        let engine = hero();

        let empty = engine.check("", EntityKind::Mesh);
        assert_eq!(empty.violations, vec![NamingViolation::Empty]);
        assert_eq!(empty.suggestion.as_deref(), Some("HP_Unnamed"));

        let bare = engine.check("HP_", EntityKind::Mesh);
        assert_eq!(bare.violations, vec![NamingViolation::EmptyBody]);
        assert_eq!(bare.suggestion.as_deref(), Some("HP_Unnamed"));
    }

    #[test]
    fn test_suggestion_is_idempotent_and_passes() {
        let engine = hero();
        for name in ["Sword", "hp_big  axe", "--x--", "HP_HP_Shield", "a/b\\c"] {
            let once = engine.suggest(name, EntityKind::Mesh);
            assert_eq!(engine.suggest(&once, EntityKind::Mesh), once, "for {:?}", name);
            assert!(engine.check(&once, EntityKind::Mesh).passed, "for {:?}", once);
        }
    }

    #[test]
    fn test_pattern() {
        let conventions = NamingConventions {
            mesh: NamingRule::with_prefix("SM_").pattern(r"^SM_[A-Z][A-Za-z0-9]*$"),
            ..Default::default()
        };
        let engine = NamingEngine::new(conventions).unwrap();

        assert!(engine.check("SM_Rock01", EntityKind::Mesh).passed);
        let check = engine.check("SM_Rock_01", EntityKind::Mesh);
        assert!(matches!(
            check.violations.as_slice(),
            [NamingViolation::Pattern { .. }]
        ));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let conventions = NamingConventions {
            texture: NamingRule::default().pattern("(unclosed"),
            ..Default::default()
        };
        assert!(matches!(
            NamingEngine::new(conventions),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_naming_prefix_override_applies_to_meshes() {
        let config = ExportConfig::new(AssetProfile::SmallProp, "out").naming_prefix("PROP_");
        let engine = NamingEngine::from_config(&config).unwrap();
        assert!(engine.check("PROP_Barrel", EntityKind::Mesh).passed);
        assert!(!engine.check("SM_Barrel", EntityKind::Mesh).passed);
        assert_eq!(engine.rule(EntityKind::Material).prefix.as_deref(), Some("MI_"));
    }
}

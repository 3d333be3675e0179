//! Rule registry for managing validation rules.

use crate::rules::{geometry, material, naming, texture, RuleContext, ValidationRule};
use assetforge_spec::finding::{Category, Severity, ValidationResult};
use serde::Serialize;
use std::collections::HashSet;

/// Registry of validation rules.
pub struct RuleRegistry {
    rules: Vec<Box<dyn ValidationRule>>,
    disabled_rules: HashSet<String>,
}

impl RuleRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled_rules: HashSet::new(),
        }
    }

    /// Creates a registry with all default rules registered.
    pub fn default_rules() -> Self {
        let mut registry = Self::new();

        for rule in naming::all_rules() {
            registry.register(rule);
        }
        for rule in geometry::all_rules() {
            registry.register(rule);
        }
        for rule in material::all_rules() {
            registry.register(rule);
        }
        for rule in texture::all_rules() {
            registry.register(rule);
        }

        registry
    }

    /// Registers a new rule.
    pub fn register(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Disables a rule by ID.
    pub fn disable_rule(&mut self, rule_id: &str) {
        self.disabled_rules.insert(rule_id.to_string());
    }

    /// Returns all registered rules.
    pub fn rules(&self) -> &[Box<dyn ValidationRule>] {
        &self.rules
    }

    /// Returns rule metadata for documentation/introspection, sorted by
    /// category and id.
    pub fn rule_metadata(&self) -> Vec<RuleMetadata> {
        let mut metadata: Vec<RuleMetadata> = self
            .rules
            .iter()
            .map(|r| RuleMetadata {
                id: r.id().to_string(),
                category: r.category(),
                description: r.description().to_string(),
                default_severity: r.default_severity(),
                enabled: self.is_rule_enabled(r.id()),
            })
            .collect();
        metadata.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.id.cmp(&b.id)));
        metadata
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.contains(rule_id)
    }

    /// Runs every enabled rule and aggregates the findings.
    ///
    /// Each finding's severity is resolved through the export configuration
    /// (user overrides, then profile overrides, then the rule default). The
    /// result is ordered by category, then rule id, so registration order
    /// never changes the output.
    pub fn validate(&self, ctx: &RuleContext) -> ValidationResult {
        let mut findings = Vec::new();

        for rule in &self.rules {
            if !self.is_rule_enabled(rule.id()) {
                continue;
            }

            let severity = ctx
                .config
                .resolve_severity(rule.id(), rule.default_severity());
            let mut issues = rule.check(ctx);
            if !issues.is_empty() {
                tracing::debug!(rule = rule.id(), count = issues.len(), %severity, "rule fired");
            }
            for issue in &mut issues {
                issue.severity = severity;
            }
            findings.extend(issues);
        }

        let result = ValidationResult::from_findings(findings);
        tracing::debug!(
            asset = %ctx.asset.name,
            errors = result.error_count(),
            warnings = result.warning_count(),
            "validation finished"
        );
        result
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::default_rules()
    }
}

/// Metadata about a rule for documentation/introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMetadata {
    /// Rule identifier.
    pub id: String,
    pub category: Category,
    /// Human-readable description.
    pub description: String,
    pub default_severity: Severity,
    pub enabled: bool,
}

//! Validation findings and results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity level for a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, does not block export.
    Warning,
    /// Blocks export.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(format!(
                "unknown severity '{}', expected 'warning' or 'error'",
                s
            )),
        }
    }
}

/// Finding category; findings are presented grouped in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Naming,
    Geometry,
    Material,
    Texture,
    /// Export-stage faults (file writes), never produced by rules.
    Export,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Naming,
        Category::Geometry,
        Category::Material,
        Category::Texture,
        Category::Export,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Naming => "naming",
            Category::Geometry => "geometry",
            Category::Material => "material",
            Category::Texture => "texture",
            Category::Export => "export",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule identifier (e.g., "geometry/open-boundary", "naming/mesh").
    pub rule_id: String,
    pub category: Category,
    /// Severity after profile and configuration overrides.
    pub severity: Severity,
    pub message: String,
    /// What the finding is about (e.g., "mesh:SM_Crate/boundary-edges",
    /// "material:MI_Rock/base_color").
    pub subject: String,
    /// How to fix it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Measured value that triggered the finding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,
    /// Expected value or range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl Finding {
    /// Creates a new finding with required fields.
    pub fn new(
        rule_id: impl Into<String>,
        category: Category,
        severity: Severity,
        message: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            category,
            severity,
            message: message.into(),
            subject: subject.into(),
            suggestion: None,
            actual_value: None,
            expected: None,
        }
    }

    /// Builder method to set the suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder method to set the actual value.
    pub fn with_actual_value(mut self, value: impl Into<String>) -> Self {
        self.actual_value = Some(value.into());
        self
    }

    /// Builder method to set the expected value.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity, self.rule_id, self.subject, self.message
        )
    }
}

/// Ordered findings for one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Findings grouped by category, in presentation order.
    pub findings: Vec<Finding>,
}

impl ValidationResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result from findings, ordering them by category and rule.
    ///
    /// The sort is stable, so each rule's own findings keep their order.
    pub fn from_findings(mut findings: Vec<Finding>) -> Self {
        findings.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        Self { findings }
    }

    /// True if no finding has Error severity.
    pub fn passed(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(Finding::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Findings of one category.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }

    /// Findings produced by one rule.
    pub fn by_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.rule_id == rule_id)
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }
}

/// Manifest view of a validation result: errors and warnings listed separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSection {
    pub passed: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl From<&ValidationResult> for ValidationSection {
    fn from(result: &ValidationResult) -> Self {
        Self {
            passed: result.passed(),
            errors: result.errors().cloned().collect(),
            warnings: result.warnings().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(rule: &str, category: Category, severity: Severity) -> Finding {
        Finding::new(rule, category, severity, "msg", "subject")
    }

    #[test]
    fn test_finding_builder() {
        let f = Finding::new(
            "geometry/triangle-budget",
            Category::Geometry,
            Severity::Warning,
            "Too many triangles",
            "mesh:SM_Rock",
        )
        .with_actual_value("12000")
        .with_expected("<= 5000")
        .with_suggestion("Decimate the mesh");

        assert_eq!(f.actual_value.as_deref(), Some("12000"));
        assert!(!f.is_error());
        assert!(f.to_string().contains("geometry/triangle-budget"));
    }

    #[test]
    fn test_result_grouping_is_by_category() {
        let result = ValidationResult::from_findings(vec![
            finding("texture/unknown-role", Category::Texture, Severity::Warning),
            finding("naming/mesh", Category::Naming, Severity::Warning),
            finding("geometry/open-boundary", Category::Geometry, Severity::Error),
            finding("material/complex-input", Category::Material, Severity::Warning),
        ]);

        let categories: Vec<_> = result.findings.iter().map(|f| f.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::Naming,
                Category::Geometry,
                Category::Material,
                Category::Texture
            ]
        );
        assert!(!result.passed());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 3);
    }

    #[test]
    fn test_warnings_do_not_block() {
        let result = ValidationResult::from_findings(vec![finding(
            "naming/mesh",
            Category::Naming,
            Severity::Warning,
        )]);
        assert!(result.passed());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_validation_section() {
        let result = ValidationResult::from_findings(vec![
            finding("geometry/missing-uv", Category::Geometry, Severity::Error),
            finding("naming/mesh", Category::Naming, Severity::Warning),
        ]);
        let section = ValidationSection::from(&result);
        assert!(!section.passed);
        assert_eq!(section.errors.len(), 1);
        assert_eq!(section.warnings.len(), 1);
    }

    #[test]
    fn test_severity_parse_and_order() {
        assert_eq!("ERROR".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert!("info".parse::<Severity>().is_err());
        assert!(Severity::Warning < Severity::Error);
    }
}

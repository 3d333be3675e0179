//! Rules command implementation
//!
//! Lists the validation rules with their default and effective severities.

use anyhow::Result;
use assetforge_lint::RuleRegistry;
use assetforge_spec::{Category, ExportConfig, Severity};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use super::{export_config, load_settings, ConfigArgs};

/// One rule as listed by the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRow {
    pub id: String,
    pub category: Category,
    pub description: String,
    pub default_severity: Severity,
    /// Severity after profile and user overrides.
    pub severity: Severity,
}

/// Rule rows sorted by category and id.
pub fn rule_rows(config: &ExportConfig) -> Vec<RuleRow> {
    RuleRegistry::default_rules()
        .rule_metadata()
        .into_iter()
        .map(|m| RuleRow {
            severity: config.resolve_severity(&m.id, m.default_severity),
            id: m.id,
            category: m.category,
            description: m.description,
            default_severity: m.default_severity,
        })
        .collect()
}

/// Run the rules command.
pub fn run(settings_path: &Path, args: &ConfigArgs, json: bool) -> Result<ExitCode> {
    let settings = load_settings(settings_path)?;
    let config = export_config(&settings, args)?;
    let rows = rule_rows(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Rules for profile".cyan().bold(), config.profile);
    let mut current = None;
    for row in &rows {
        if current != Some(row.category) {
            println!("\n{}", format!("{}:", row.category).bold());
            current = Some(row.category);
        }
        let severity = match row.severity {
            Severity::Error => "error".red(),
            Severity::Warning => "warning".yellow(),
        };
        let overridden = if row.severity != row.default_severity {
            format!(" (default {})", row.default_severity).dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "  {:<32} {:<8}{} {}",
            row.id.cyan(),
            severity,
            overridden,
            row.description.dimmed()
        );
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetforge_spec::AssetProfile;

    #[test]
    fn test_hero_prop_escalates_naming() {
        let config = ExportConfig::new(AssetProfile::HeroProp, "Exports");
        let rows = rule_rows(&config);
        let mesh = rows.iter().find(|r| r.id == "naming/mesh").unwrap();
        assert_eq!(mesh.default_severity, Severity::Warning);
        assert_eq!(mesh.severity, Severity::Error);
    }

    #[test]
    fn test_rows_sorted_by_category() {
        let rows = rule_rows(&ExportConfig::new(AssetProfile::SmallProp, "Exports"));
        assert_eq!(rows.len(), 19);
        assert!(rows.windows(2).all(|w| w[0].category <= w[1].category));
        assert!(rows.iter().all(|r| r.severity == r.default_severity));
    }
}

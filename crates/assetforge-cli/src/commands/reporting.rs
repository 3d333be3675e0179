use colored::{ColoredString, Colorize};
use assetforge_spec::finding::{Category, Finding, ValidationResult};

/// Prints findings grouped by category, errors before warnings within each.
pub(crate) fn print_validation(result: &ValidationResult) {
    if result.is_empty() {
        println!("  {} No issues found", "ok".green());
        return;
    }

    let mut categories: Vec<Category> = result.findings.iter().map(|f| f.category).collect();
    categories.dedup();

    for category in categories {
        println!("\n{}", format!("{}:", category).bold());
        let (errors, warnings): (Vec<&Finding>, Vec<&Finding>) =
            result.in_category(category).partition(|f| f.is_error());
        for finding in errors {
            print_finding(finding, "x".red());
        }
        for finding in warnings {
            print_finding(finding, "!".yellow());
        }
    }
}

pub(crate) fn print_finding(finding: &Finding, marker: ColoredString) {
    println!(
        "  {} [{}] {}: {}",
        marker,
        finding.rule_id.cyan(),
        finding.subject.dimmed(),
        finding.message
    );

    match (&finding.actual_value, &finding.expected) {
        (Some(actual), Some(expected)) => println!(
            "    {} actual={}, expected={}",
            "->".dimmed(),
            actual,
            expected
        ),
        (Some(actual), None) => println!("    {} actual={}", "->".dimmed(), actual),
        _ => {}
    }

    if let Some(suggestion) = &finding.suggestion {
        println!("    {} {}", "suggestion:".dimmed(), suggestion);
    }
}

/// Prints the PASSED/BLOCKED summary line.
pub(crate) fn print_summary(result: &ValidationResult) {
    let summary = format!(
        "{} error(s), {} warning(s)",
        result.error_count(),
        result.warning_count()
    );
    if result.has_errors() {
        println!("\n{} {}", "BLOCKED".red().bold(), summary.dimmed());
    } else {
        println!("\n{} {}", "PASSED".green().bold(), summary.dimmed());
    }
}

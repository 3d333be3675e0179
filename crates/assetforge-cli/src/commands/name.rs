//! Name command implementation
//!
//! Checks a name against the active profile's naming convention and prints
//! the suggested correction.

use anyhow::Result;
use assetforge_analysis::naming::{NamingCheck, NamingEngine};
use assetforge_spec::{EntityKind, ExportConfig};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::{export_config, load_settings, ConfigArgs};

/// Checks `name` as an entity of `kind` under `config`.
pub fn check_name(config: &ExportConfig, name: &str, kind: EntityKind) -> Result<NamingCheck> {
    let engine = NamingEngine::from_config(config)?;
    Ok(engine.check(name, kind))
}

/// Run the name command.
///
/// # Returns
/// Exit code: 0 if the name conforms, 1 otherwise
pub fn run(
    name: &str,
    kind: EntityKind,
    settings_path: &Path,
    args: &ConfigArgs,
    json: bool,
) -> Result<ExitCode> {
    let settings = load_settings(settings_path)?;
    let config = export_config(&settings, args)?;
    let check = check_name(&config, name, kind)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&check)?);
    } else if check.passed {
        println!("{} {} '{}' follows {}", "PASSED".green().bold(), kind, name, config.profile);
    } else {
        println!("{} {} '{}': {}", "FAILED".red().bold(), kind, name, check.summary());
        if let Some(suggestion) = &check.suggestion {
            println!("  {} {}", "suggestion:".dimmed(), suggestion.green());
        }
    }

    Ok(if check.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

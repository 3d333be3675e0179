//! Manifest command implementation
//!
//! Reads an export manifest the way the engine importer does and verifies it.

use anyhow::{Context, Result};
use assetforge_spec::error::BackendError;
use assetforge_spec::manifest::ExportManifest;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

/// JSON output for `manifest check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    pub path: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Parses and verifies the manifest at `path`.
pub fn check(path: &Path) -> Result<CheckOutput> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;

    let result = ExportManifest::from_json(&json).and_then(|m| m.verify().map(|_| m));
    Ok(match result {
        Ok(manifest) => CheckOutput {
            path: path.display().to_string(),
            valid: true,
            asset_name: Some(manifest.asset_name),
            content_hash: Some(manifest.content_hash),
            error_code: None,
            error: None,
        },
        Err(e) => CheckOutput {
            path: path.display().to_string(),
            valid: false,
            asset_name: None,
            content_hash: None,
            error_code: Some(e.code().to_string()),
            error: Some(e.to_string()),
        },
    })
}

/// Run the `manifest check` command.
pub fn run_check(path: &str, json: bool) -> Result<ExitCode> {
    let output = check(Path::new(path))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if output.valid {
        println!(
            "{} {} ({})",
            "VALID".green().bold(),
            output.asset_name.as_deref().unwrap_or_default(),
            output.content_hash.as_deref().unwrap_or_default().dimmed()
        );
    } else {
        println!(
            "{} {} [{}]: {}",
            "INVALID".red().bold(),
            path,
            output.error_code.as_deref().unwrap_or_default(),
            output.error.as_deref().unwrap_or_default()
        );
    }

    Ok(if output.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

//! Export command implementation
//!
//! Validates the active object of a scene snapshot and, when there are no
//! errors, writes the FBX through Blender and the manifest next to it.

use anyhow::{Context, Result};
use assetforge_backend_blender::{
    run_export, BlenderExporter, BlenderExporterConfig, ExportOutcome,
};
use assetforge_spec::finding::ValidationSection;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::reporting::{print_summary, print_validation};
use super::{export_config, load_scene, load_settings, ConfigArgs};

/// Blender invocation options.
#[derive(Debug, Clone, Default)]
pub struct BlenderArgs {
    pub blender: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl BlenderArgs {
    fn exporter_config(&self) -> BlenderExporterConfig {
        let mut config = BlenderExporterConfig::default();
        if let Some(path) = &self.blender {
            config = config.blender_path(path);
        }
        if let Some(path) = &self.script {
            config = config.script_path(path);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.timeout_secs(secs);
        }
        config
    }
}

/// JSON output for the export command.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    pub success: bool,
    pub asset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fbx_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,
    pub validation: ValidationSection,
}

/// Run the export command.
///
/// # Returns
/// Exit code: 0 if exported, 1 if blocked by validation errors
pub fn run(
    scene: &str,
    settings_path: &Path,
    args: &ConfigArgs,
    blender: &BlenderArgs,
    json: bool,
) -> Result<ExitCode> {
    let settings = load_settings(settings_path)?;
    let config = export_config(&settings, args)?;
    let snapshot = load_scene(Path::new(scene))?;
    let exporter = BlenderExporter::with_config(blender.exporter_config());

    let asset = snapshot.selection.first().cloned().unwrap_or_default();
    let outcome = run_export(&snapshot, &config, &exporter)
        .with_context(|| format!("Export of '{}' failed", asset))?;

    let output = match &outcome {
        ExportOutcome::Success {
            manifest_path,
            fbx_path,
            validation,
        } => ExportOutput {
            success: true,
            asset,
            fbx_path: Some(fbx_path.display().to_string()),
            manifest_path: Some(manifest_path.display().to_string()),
            validation: ValidationSection::from(validation),
        },
        ExportOutcome::Blocked(validation) => ExportOutput {
            success: false,
            asset,
            fbx_path: None,
            manifest_path: None,
            validation: ValidationSection::from(validation),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Exporting:".cyan().bold(), output.asset);
        print_validation(outcome.validation());
        print_summary(outcome.validation());
        if let (Some(fbx), Some(manifest)) = (&output.fbx_path, &output.manifest_path) {
            println!("  {} {}", "fbx:".dimmed(), fbx);
            println!("  {} {}", "manifest:".dimmed(), manifest);
        }
    }

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

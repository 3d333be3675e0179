//! Validate command implementation
//!
//! Runs the analysis and validation stages on one or more scene snapshots
//! without writing anything.

use anyhow::{Context, Result};
use assetforge_backend_blender::analyze_selection;
use assetforge_spec::finding::ValidationSection;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use super::reporting::{print_summary, print_validation};
use super::{export_config, load_scene, load_settings, scene_files, ConfigArgs};

/// JSON output for one validated scene.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateOutput {
    pub scene: String,
    pub asset: String,
    /// Name the asset would be exported under.
    pub export_name: String,
    pub profile: String,
    pub validation: ValidationSection,
}

/// Run the validate command.
///
/// # Returns
/// Exit code: 0 if every scene passed, 1 if any has errors
pub fn run(scene: &str, settings_path: &Path, args: &ConfigArgs, json: bool) -> Result<ExitCode> {
    let settings = load_settings(settings_path)?;
    let config = export_config(&settings, args)?;

    let files = scene_files(Path::new(scene));
    if files.is_empty() {
        anyhow::bail!("No *.scene.json files found under {}", scene);
    }

    let mut outputs = Vec::new();
    for file in &files {
        let snapshot = load_scene(file)?;
        let analysis = analyze_selection(&snapshot, &config)
            .with_context(|| format!("Failed to analyze {}", file.display()))?;

        if !json {
            println!(
                "{} {} ({})",
                "Validating:".cyan().bold(),
                analysis.asset.name,
                file.display()
            );
            print_validation(&analysis.validation);
            print_summary(&analysis.validation);
        }

        outputs.push(ValidateOutput {
            scene: file.display().to_string(),
            asset: analysis.asset.name.clone(),
            export_name: analysis.export_name().to_string(),
            profile: config.profile.to_string(),
            validation: ValidationSection::from(&analysis.validation),
        });
    }

    let success = outputs.iter().all(|o| o.validation.passed);
    if json {
        let json = if outputs.len() == 1 {
            serde_json::to_string_pretty(&outputs[0])?
        } else {
            serde_json::to_string_pretty(&outputs)?
        };
        println!("{}", json);
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

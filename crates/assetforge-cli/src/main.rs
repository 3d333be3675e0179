//! AssetForge CLI - validate and export game assets from Blender scenes
//!
//! Works on scene snapshots (JSON dumps of the selection, meshes and shader
//! graphs) and writes FBX files plus engine-import manifests.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use assetforge_cli::commands::{self, export::BlenderArgs, ConfigArgs, DEFAULT_SETTINGS_FILE};
use assetforge_cli::logging;
use assetforge_spec::EntityKind;

/// AssetForge - Blender to game-engine asset export validation
#[derive(Parser)]
#[command(name = "assetforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project settings file
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Log debug diagnostics to stderr (ASSETFORGE_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scene snapshots without exporting
    Validate {
        /// Scene snapshot file, or a directory searched for *.scene.json
        scene: String,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate and export the active object to FBX with a manifest
    Export {
        /// Scene snapshot file
        scene: String,

        #[command(flatten)]
        config: ConfigArgs,

        /// Blender executable (default: BLENDER_PATH, then PATH)
        #[arg(long)]
        blender: Option<PathBuf>,

        /// Export script (default: ASSETFORGE_BLENDER_SCRIPT, then the bundled script)
        #[arg(long)]
        blender_script: Option<PathBuf>,

        /// Blender timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List validation rules and their effective severities
    Rules {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check a name against the naming convention
    Name {
        /// Name to check
        name: String,

        /// Entity kind (mesh, material, texture)
        #[arg(short, long, default_value = "mesh")]
        kind: EntityKind,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Read or write project settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Inspect export manifests
    Manifest {
        #[command(subcommand)]
        command: ManifestCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print a setting by dot-separated key path
    Get {
        /// Key path, e.g. engine.assets_directory
        key: String,
    },
    /// Set a setting; the value is parsed as JSON, else taken as a string
    Set {
        /// Key path, e.g. export.naming_prefix
        key: String,
        /// New value
        value: String,
    },
}

#[derive(Subcommand)]
enum ManifestCommands {
    /// Parse and verify a manifest as the engine importer would
    Check {
        /// Path to a .manifest.json file
        path: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let settings = cli.settings.as_path();

    let result = match cli.command {
        Commands::Validate {
            scene,
            config,
            json,
        } => commands::validate::run(&scene, settings, &config, json),
        Commands::Export {
            scene,
            config,
            blender,
            blender_script,
            timeout,
            json,
        } => {
            let blender = BlenderArgs {
                blender,
                script: blender_script,
                timeout_secs: timeout,
            };
            commands::export::run(&scene, settings, &config, &blender, json)
        }
        Commands::Rules { config, json } => commands::rules::run(settings, &config, json),
        Commands::Name {
            name,
            kind,
            config,
            json,
        } => commands::name::run(&name, kind, settings, &config, json),
        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => commands::config::get(settings, &key),
            ConfigCommands::Set { key, value } => commands::config::set(settings, &key, &value),
        },
        Commands::Manifest { command } => match command {
            ManifestCommands::Check { path, json } => commands::manifest::run_check(&path, json),
        },
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_args() {
        let cli = Cli::try_parse_from([
            "assetforge",
            "export",
            "crate.scene.json",
            "--profile",
            "hero_prop",
            "--severity",
            "naming/*=warning",
            "--timeout",
            "60",
        ])
        .unwrap();
        match cli.command {
            Commands::Export {
                config, timeout, ..
            } => {
                assert_eq!(config.profile, assetforge_spec::AssetProfile::HeroProp);
                assert_eq!(config.severity, vec!["naming/*=warning".to_string()]);
                assert_eq!(timeout, Some(60));
            }
            _ => panic!("expected export"),
        }
    }
}

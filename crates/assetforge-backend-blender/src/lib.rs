//! AssetForge Blender backend.
//!
//! Couples the pure analysis and validation crates to the host:
//!
//! - [`host`]: the read-only [`HostScene`] query interface and the JSON
//!   [`SceneSnapshot`] implementation
//! - [`exporter`]: the [`MeshExporter`] collaborator interface
//! - [`orchestrator`]: [`BlenderExporter`], which writes the FBX by running
//!   Blender in background mode
//! - [`pipeline`]: [`analyze_selection`] and [`run_export`]
//!
//! # Example
//!
//! ```no_run
//! use assetforge_backend_blender::{run_export, BlenderExporter, ExportOutcome, SceneSnapshot};
//! use assetforge_spec::{AssetProfile, ExportConfig};
//! use std::path::Path;
//!
//! let scene = SceneSnapshot::load(Path::new("crate.scene.json"))?;
//! let config = ExportConfig::new(AssetProfile::SmallProp, "Exports");
//!
//! match run_export(&scene, &config, &BlenderExporter::new())? {
//!     ExportOutcome::Success { manifest_path, .. } => println!("{}", manifest_path.display()),
//!     ExportOutcome::Blocked(result) => eprintln!("{} errors", result.error_count()),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod exporter;
pub mod host;
pub mod orchestrator;
pub mod pipeline;

pub use error::{ExportError, ExportResult, HostError};
pub use exporter::{ExportRequest, MeshExporter};
pub use host::{HostScene, SceneMaterial, SceneObject, SceneSnapshot};
pub use orchestrator::{BlenderExporter, BlenderExporterConfig};
pub use pipeline::{
    analyze_selection, analyze_selection_with, build_manifest, export_analysis,
    incomplete_marker_path, run_export, AssetAnalysis, ExportOutcome,
};

//! Error types for the Blender backend.

use assetforge_spec::config::ConfigError;
use assetforge_spec::error::{BackendError, ManifestError};
use assetforge_spec::finding::Finding;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors raised while reading the host scene.
#[derive(Debug, Error)]
pub enum HostError {
    /// No object is selected.
    #[error("Nothing selected. Select the mesh to export")]
    NothingSelected,

    /// A selected or referenced object does not exist in the scene.
    #[error("Object '{0}' not found in scene")]
    ObjectNotFound(String),

    /// Failed to read a scene snapshot.
    #[error("Failed to read scene snapshot {path}: {source}")]
    ReadSnapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scene snapshot JSON is invalid.
    #[error("Invalid scene snapshot: {0}")]
    ParseSnapshot(#[from] serde_json::Error),
}

/// Errors that abort an export operation.
///
/// Data-quality problems never end up here; they are findings.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Export configuration is unusable.
    #[error("Invalid export configuration: {0}")]
    Config(#[from] ConfigError),

    /// Host scene could not be read.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Manifest could not be built or serialized.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Export directory could not be created.
    #[error("Failed to create export directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mesh exporter reported a failure.
    #[error("FBX export to {path} failed: {message}")]
    MeshExportFailed { path: PathBuf, message: String },

    /// The FBX was written but the manifest was not.
    ///
    /// The FBX stays in place and an `.incomplete` marker is written next to it.
    #[error("FBX written to {fbx_path} but manifest {manifest_path} could not be written: {source}")]
    ManifestWriteFailed {
        fbx_path: PathBuf,
        manifest_path: PathBuf,
        finding: Box<Finding>,
        #[source]
        source: std::io::Error,
    },

    /// Blender executable not found.
    #[error("Blender executable not found. Ensure Blender is installed and in PATH, or set BLENDER_PATH environment variable")]
    BlenderNotFound,

    /// The scene is not backed by a saved .blend file.
    #[error("The scene has no saved .blend file; Blender needs one to export from")]
    MissingBlendFile,

    /// Failed to spawn Blender process.
    #[error("Failed to spawn Blender process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Blender process timed out.
    #[error("Blender process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Blender process exited with non-zero status.
    #[error("Blender process exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// Failed to read or parse the report written by the export script.
    #[error("Failed to read Blender export report from {path}: {message}")]
    ReportFailed { path: PathBuf, message: String },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new mesh export failed error.
    pub fn mesh_export_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MeshExportFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl BackendError for HostError {
    fn code(&self) -> &'static str {
        match self {
            HostError::NothingSelected => "HOST_001",
            HostError::ObjectNotFound(_) => "HOST_002",
            HostError::ReadSnapshot { .. } => "HOST_003",
            HostError::ParseSnapshot(_) => "HOST_004",
        }
    }

    fn category(&self) -> &'static str {
        "host"
    }
}

impl BackendError for ExportError {
    fn code(&self) -> &'static str {
        match self {
            ExportError::Config(_) => "EXPORT_001",
            ExportError::Host(e) => e.code(),
            ExportError::Manifest(e) => e.code(),
            ExportError::CreateDirectory { .. } => "EXPORT_002",
            ExportError::MeshExportFailed { .. } => "EXPORT_003",
            ExportError::ManifestWriteFailed { .. } => "EXPORT_004",
            ExportError::BlenderNotFound => "EXPORT_005",
            ExportError::MissingBlendFile => "EXPORT_006",
            ExportError::SpawnFailed(_) => "EXPORT_007",
            ExportError::Timeout { .. } => "EXPORT_008",
            ExportError::ProcessFailed { .. } => "EXPORT_009",
            ExportError::ReportFailed { .. } => "EXPORT_010",
            ExportError::Io(_) => "EXPORT_011",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            ExportError::Host(_) => "host",
            ExportError::Manifest(_) => "manifest",
            _ => "export",
        }
    }
}

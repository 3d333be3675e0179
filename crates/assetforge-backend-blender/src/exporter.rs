//! Mesh export collaborator interface.

use assetforge_spec::config::ExportOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ExportResult;

/// What the pipeline asks the mesh exporter to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Scene object to export.
    pub object_name: String,
    /// Destination FBX file.
    pub fbx_path: PathBuf,
    /// Scene file the object lives in, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_file: Option<PathBuf>,
    /// Exporter settings; `apply_modifiers` is always set.
    pub options: ExportOptions,
}

/// Writes the selected mesh to an FBX file.
///
/// Implementations must evaluate modifiers when `options.apply_modifiers`
/// is set and must never touch the source scene data.
pub trait MeshExporter {
    fn export_mesh(&self, request: &ExportRequest) -> ExportResult<()>;
}

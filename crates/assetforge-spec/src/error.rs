//! Shared error types.

use thiserror::Error;

/// Common interface for errors raised by pipeline backends.
///
/// Implementors provide a stable code for programmatic handling and a
/// category for grouping.
///
/// ```ignore
/// use assetforge_spec::error::BackendError;
///
/// fn report<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code, e.g. `EXPORT_004`.
    fn code(&self) -> &'static str;

    /// Human-readable message; defaults to `Display`.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category, e.g. `export`, `host`, `manifest`.
    fn category(&self) -> &'static str;
}

/// Errors raised while building, reading or verifying a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest build was requested for a result containing errors.
    #[error("validation reported {0} error(s); a manifest is only built for passing assets")]
    ValidationFailed(usize),

    /// Mesh statistics were not supplied.
    #[error("mesh statistics missing for asset '{0}'")]
    MissingMeshStats(String),

    /// JSON (de)serialization failed.
    #[error("manifest serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document is not an AssetForge manifest.
    #[error("unsupported manifest schema '{0}'")]
    UnknownSchema(String),

    /// The document was written by a newer, incompatible version.
    #[error("manifest schema version {found} is not supported (reader supports {supported})")]
    UnsupportedVersion { found: String, supported: String },

    /// Stored content hash does not match the content.
    #[error("content hash mismatch: manifest says {stored}, content hashes to {computed}")]
    HashMismatch { stored: String, computed: String },

    /// An engine hint references a texture no material depends on.
    #[error("texture binding '{texture}' on material '{material}' is not a dependency of that material")]
    InconsistentHints { material: String, texture: String },

    /// A written manifest lists error findings.
    #[error("manifest lists {0} validation error(s)")]
    ContainsErrors(usize),
}

impl BackendError for ManifestError {
    fn code(&self) -> &'static str {
        match self {
            ManifestError::ValidationFailed(_) => "MANIFEST_001",
            ManifestError::MissingMeshStats(_) => "MANIFEST_002",
            ManifestError::Serialization(_) => "MANIFEST_003",
            ManifestError::UnknownSchema(_) => "MANIFEST_004",
            ManifestError::UnsupportedVersion { .. } => "MANIFEST_005",
            ManifestError::HashMismatch { .. } => "MANIFEST_006",
            ManifestError::InconsistentHints { .. } => "MANIFEST_007",
            ManifestError::ContainsErrors(_) => "MANIFEST_008",
        }
    }

    fn category(&self) -> &'static str {
        "manifest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_codes() {
        let err = ManifestError::ValidationFailed(2);
        assert_eq!(err.code(), "MANIFEST_001");
        assert_eq!(err.category(), "manifest");
        assert!(err.message().contains("2 error(s)"));

        let err = ManifestError::HashMismatch {
            stored: "a".into(),
            computed: "b".into(),
        };
        assert_eq!(err.code(), "MANIFEST_006");
    }
}

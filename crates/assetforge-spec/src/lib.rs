//! AssetForge shared data model.
//!
//! This crate holds the types every stage of the export pipeline agrees on:
//! source data captured from the host scene (meshes, shader graphs), analysis
//! outputs, validation findings, configuration and the export manifest.
//!
//! # Example
//!
//! ```
//! use assetforge_spec::{AssetProfile, ExportConfig, Severity};
//!
//! let config = ExportConfig::new(AssetProfile::HeroProp, "Exports")
//!     .severity_override("naming/*", Severity::Warning);
//!
//! assert_eq!(
//!     config.resolve_severity("naming/mesh", Severity::Error),
//!     Severity::Warning
//! );
//! ```
//!
//! # Modules
//!
//! - [`asset`]: Asset identity, profiles and entity kinds
//! - [`mesh`]: Mesh source data, modifiers and statistics
//! - [`shader`]: Shader node graph model
//! - [`material`]: Material analysis results
//! - [`texture`]: Texture role classification
//! - [`finding`]: Findings and validation results
//! - [`config`]: Export configuration, profiles and the settings store
//! - [`manifest`]: Export manifest and its builder
//! - [`hash`]: Canonical JSON and content hashing

pub mod asset;
pub mod config;
pub mod error;
pub mod finding;
pub mod fsutil;
pub mod hash;
pub mod manifest;
pub mod material;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use asset::{AssetIdentity, AssetProfile, EntityKind};
pub use config::{
    CaseConvention, ConfigError, EngineSettings, ExportConfig, ExportOptions, NamingConventions,
    NamingRule, ProfileConfig, ProjectSettings, SettingsStore, SeverityOverrides,
    TextureRoleToken,
};
pub use error::{BackendError, ManifestError};
pub use finding::{Category, Finding, Severity, ValidationResult, ValidationSection};
pub use manifest::{ExportManifest, ManifestBuilder, NormalizedNames};
pub use material::{Complexity, GraphFault, MaterialAnalysis, ShaderInput};
pub use mesh::{Axis, Edge, MeshData, MeshInspection, MeshStats, Modifier, ModifierFault};
pub use shader::{
    Colorspace, NodeKind, ShaderGraph, ShaderLink, ShaderNode, ShaderSlot, SocketValue,
    TextureRef,
};
pub use texture::{ClassificationSource, TextureClassification, TextureRole};

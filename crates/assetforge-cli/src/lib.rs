//! AssetForge CLI library.
//!
//! Command implementations behind the `assetforge` binary: validating scene
//! snapshots, exporting through Blender, inspecting rules and names, editing
//! project settings and checking manifests.

pub mod commands;
pub mod logging;

//! AssetForge end-to-end test infrastructure.
//!
//! Integration tests drive the whole pipeline (scene snapshot → analysis →
//! validation → manifest → files) with synthetic scenes and a fake mesh
//! exporter, so no Blender installation is needed.
//!
//! ```bash
//! cargo test -p assetforge-tests
//! ```

pub mod fixtures;

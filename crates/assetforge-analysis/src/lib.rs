//! AssetForge analysis stages.
//!
//! Pure functions over the source data captured from the host scene. None of
//! them fail on bad data: faults are recorded on the outputs and turned into
//! findings by the rule engine.
//!
//! - [`mesh`]: evaluates the modifier stack on a copy and computes statistics
//! - [`shader`]: validates a shader graph and classifies each input slot
//! - [`texture`]: infers texture roles and required colorspaces
//! - [`naming`]: checks names against naming rules and suggests corrections
//!
//! # Example
//!
//! ```
//! use assetforge_analysis::naming::NamingEngine;
//! use assetforge_spec::{AssetProfile, EntityKind};
//!
//! let engine = NamingEngine::for_profile(AssetProfile::HeroProp).unwrap();
//! let check = engine.check("Sword", EntityKind::Mesh);
//!
//! assert!(!check.passed);
//! assert_eq!(check.suggestion.as_deref(), Some("HP_Sword"));
//! ```

pub mod mesh;
pub mod naming;
pub mod shader;
pub mod texture;

pub use mesh::{evaluate_modifiers, inspect};
pub use naming::{NamingCheck, NamingEngine, NamingViolation};
pub use shader::{analyze_material, validate_graph};
pub use texture::TextureClassifier;

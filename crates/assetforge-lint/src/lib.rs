//! Validation rule engine for AssetForge.
//!
//! Runs independent rules over the analysis outputs of one asset and
//! aggregates their findings into a [`ValidationResult`] with
//! configuration-driven severities. Export is blocked iff the result holds an
//! error.
//!
//! # Example
//!
//! ```
//! use assetforge_lint::{RuleContext, RuleRegistry};
//! use assetforge_spec::{AssetIdentity, AssetProfile, ExportConfig};
//!
//! let asset = AssetIdentity::new("SM_Crate", AssetProfile::SmallProp);
//! let config = ExportConfig::new(AssetProfile::SmallProp, "Exports");
//! let ctx = RuleContext {
//!     asset: &asset,
//!     config: &config,
//!     mesh: None,
//!     materials: &[],
//!     textures: &[],
//!     naming: &[],
//! };
//!
//! let result = RuleRegistry::default_rules().validate(&ctx);
//! assert!(result.has_errors());
//! assert_eq!(result.findings[0].rule_id, "geometry/missing-mesh");
//! ```
//!
//! [`ValidationResult`]: assetforge_spec::ValidationResult

pub mod registry;
pub mod rules;

pub use registry::{RuleMetadata, RuleRegistry};
pub use rules::{RuleContext, ValidationRule};

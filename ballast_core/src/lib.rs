//! # ballast_core - Stability Engine for Temporary Structures
//!
//! `ballast_core` checks gates, stands and truss constructions against
//! tipping, sliding and lift-off under wind and self-weight, per EN 13814,
//! EN 17879 and EN 1991-1-4, and computes the ballast mass each check needs.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Explicit context**: norm, scenario and constants are passed in, never global
//! - **Audited**: every number carries a [`audit::Protocol`] trail of formulas and decisions
//! - **Rich Errors**: structured error types, data errors recovered per element
//! - **Deterministic**: wind directions, axes and elements are evaluated in order
//!
//! ## Quick Start
//!
//! ```rust
//! use ballast_core::catalog::Material;
//! use ballast_core::elements::{BasePlate, TrussElement};
//! use ballast_core::geometry::Vec3;
//! use ballast_core::{analyze, AnalysisSettings, Assembly};
//!
//! let mut gate = Assembly::new("Gate")
//!     .with(BasePlate::new("BP left", "BP-1000x1000", Vec3::zeros(), Material::Concrete))
//!     .with(BasePlate::new("BP right", "BP-1000x1000", Vec3::new(6.0, 0.0, 0.0), Material::Concrete))
//!     .with(TrussElement::new("Post left", "F34", Vec3::zeros(), Vec3::new(0.0, 0.0, 4.0)))
//!     .with(TrussElement::new("Post right", "F34", Vec3::new(6.0, 0.0, 0.0), Vec3::new(6.0, 0.0, 4.0)));
//!
//! let report = analyze(&mut gate, &AnalysisSettings::default()).unwrap();
//! assert_eq!(report.results.len(), 3);
//! let json = report.to_json().unwrap();
//! assert!(json.contains("En13814"));
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Vector helpers, convex hull, tipping axes, polygons
//! - [`loads`] - Force records, wind directions, load generation and pool
//! - [`audit`] - Messages, documentation bundles and decisions
//! - [`aero`] - Norm-dispatched aerodynamic coefficients and wind forces
//! - [`elements`] - Trusses, pipes, panels, base plates and ballast
//! - [`checks`] - Tipping, sliding and lift-off
//! - [`orchestrator`] - Multi-norm analysis with scenario fallback
//! - [`catalog`] - Section, plate and friction tables

pub mod aero;
pub mod audit;
pub mod catalog;
pub mod checks;
pub mod construction;
pub mod elements;
pub mod errors;
pub mod geometry;
pub mod loads;
pub mod norms;
pub mod orchestrator;
pub mod safety_factors;
pub mod settings;
pub mod wind_profile;

// Re-export commonly used types at crate root for convenience
pub use construction::{Assembly, Construction};
pub use errors::{CalcError, CalcResult};
pub use norms::Norm;
pub use orchestrator::{analyze, analyze_with_catalog, NormStatus, StabilityReport};
pub use settings::AnalysisSettings;

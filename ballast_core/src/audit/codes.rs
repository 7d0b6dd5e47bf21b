//! Stable message codes.
//!
//! Error-class codes coming from [`CalcError`](crate::errors::CalcError) use
//! `CalcError::error_code()` directly and are not repeated here.

// Aerodynamics
pub const SOLIDITY_OUT_OF_RANGE: &str = "SOLIDITY_OUT_OF_RANGE";
pub const SLENDERNESS_CAPPED: &str = "SLENDERNESS_CAPPED";
pub const SLENDERNESS_EXTRAPOLATED: &str = "SLENDERNESS_EXTRAPOLATED";
pub const REDUCTION_CLAMPED: &str = "REDUCTION_CLAMPED";
pub const REYNOLDS_CONSERVATIVE: &str = "REYNOLDS_CONSERVATIVE";
pub const APPROACH_CLASSIFIED: &str = "APPROACH_CLASSIFIED";
pub const AERO_COEFFICIENT_UNDEFINED: &str = "AERO_COEFFICIENT_UNDEFINED";

// Loads
pub const WIND_LOAD_SKIPPED: &str = "WIND_LOAD_SKIPPED";
pub const SEGMENT_MERGED: &str = "SEGMENT_MERGED";
pub const FRICTION_FALLBACK_NORM: &str = "FRICTION_FALLBACK_NORM";
pub const NO_BASE_PLATES: &str = "NO_BASE_PLATES";

// Checks
pub const CHECK_DIRECTION: &str = "CHECK_DIRECTION";
pub const NO_TIPPING_MOMENT: &str = "NO_TIPPING_MOMENT";
pub const NO_HORIZONTAL_FORCE: &str = "NO_HORIZONTAL_FORCE";
pub const NO_UPLIFT: &str = "NO_UPLIFT";
pub const NON_FINITE_SKIPPED: &str = "NON_FINITE_SKIPPED";
pub const SAFETY_BELOW_REQUIRED: &str = "SAFETY_BELOW_REQUIRED";
pub const BALLAST_REQUIRED: &str = "BALLAST_REQUIRED";

// Orchestrator
pub const NORM_NOT_APPLICABLE: &str = "NORM_NOT_APPLICABLE";
pub const NORM_FAILED: &str = "NORM_FAILED";
pub const FALLBACK_EVALUATED: &str = "FALLBACK_EVALUATED";

//! # Error Types
//!
//! Structured error types for ballast_core. Errors fall into two classes:
//!
//! - **Data errors**: a missing catalog entry, degenerate geometry, a value outside a
//!   tabulated formula's domain or a construction taller than a wind table. These are
//!   recovered locally: the caller records a message in the audit protocol and continues
//!   with a `NaN` (scalar) or an empty list (load records).
//! - **Programmer errors**: the API was used incorrectly (wrong shape of an argument, a
//!   non-unit direction vector, an unimplemented norm/operation combination). These always
//!   propagate as `Err`.
//!
//! ## Example
//!
//! ```rust
//! use ballast_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "length_m",
//!             length_m.to_string(),
//!             "Length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for ballast_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong shape, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Named truss, pipe or base plate is not in the catalog
    #[error("Catalog entry not found: {kind} '{name}'")]
    CatalogEntryNotFound { kind: String, name: String },

    /// No friction coefficient is known for a material pairing
    #[error("No friction coefficient for {material_a} on {material_b}")]
    FrictionPairNotFound {
        material_a: String,
        material_b: String,
    },

    /// Geometry that cannot support the requested operation (zero length, zero area, ...)
    #[error("Degenerate geometry in {operation}: {reason}")]
    DegenerateGeometry { operation: String, reason: String },

    /// A value lies outside the valid domain of a tabulated formula
    #[error("{quantity} = {value} is outside the valid domain: {reason}")]
    OutOfDomain {
        quantity: String,
        value: String,
        reason: String,
    },

    /// Construction is taller than the wind-pressure table covers
    #[error("Construction height {height_m:.2} m exceeds the wind table limit of {max_height_m:.2} m")]
    HeightExceedsTable { height_m: f64, max_height_m: f64 },

    /// Norm/operation combination without an implementation
    #[error("Not implemented: {operation} for norm {norm}")]
    NotImplemented { norm: String, operation: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a CatalogEntryNotFound error
    pub fn catalog_entry_not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        CalcError::CatalogEntryNotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a FrictionPairNotFound error
    pub fn friction_pair_not_found(material_a: impl Into<String>, material_b: impl Into<String>) -> Self {
        CalcError::FrictionPairNotFound {
            material_a: material_a.into(),
            material_b: material_b.into(),
        }
    }

    /// Create a DegenerateGeometry error
    pub fn degenerate(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::DegenerateGeometry {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutOfDomain error
    pub fn out_of_domain(quantity: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        CalcError::OutOfDomain {
            quantity: quantity.into(),
            value: format!("{:.6}", value),
            reason: reason.into(),
        }
    }

    /// Create a NotImplemented error
    pub fn not_implemented(norm: impl Into<String>, operation: impl Into<String>) -> Self {
        CalcError::NotImplemented {
            norm: norm.into(),
            operation: operation.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a recoverable data problem rather than API misuse.
    ///
    /// Data errors are logged into the audit protocol and replaced by a `NaN`
    /// or an empty load list so that aggregation over other elements continues.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            CalcError::CatalogEntryNotFound { .. }
                | CalcError::FrictionPairNotFound { .. }
                | CalcError::DegenerateGeometry { .. }
                | CalcError::OutOfDomain { .. }
                | CalcError::HeightExceedsTable { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::CatalogEntryNotFound { .. } => "CATALOG_ENTRY_NOT_FOUND",
            CalcError::FrictionPairNotFound { .. } => "FRICTION_PAIR_NOT_FOUND",
            CalcError::DegenerateGeometry { .. } => "DEGENERATE_GEOMETRY",
            CalcError::OutOfDomain { .. } => "OUT_OF_DOMAIN",
            CalcError::HeightExceedsTable { .. } => "HEIGHT_EXCEEDS_TABLE",
            CalcError::NotImplemented { .. } => "NOT_IMPLEMENTED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("length_m", "-5.0", "Length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::catalog_entry_not_found("truss", "F99").error_code(),
            "CATALOG_ENTRY_NOT_FOUND"
        );
        assert_eq!(
            CalcError::not_implemented("EN 13814", "reynolds").error_code(),
            "NOT_IMPLEMENTED"
        );
    }

    #[test]
    fn test_data_error_classification() {
        assert!(CalcError::catalog_entry_not_found("pipe", "x").is_data_error());
        assert!(CalcError::degenerate("normalize", "zero length").is_data_error());
        assert!(CalcError::out_of_domain("Re", 1e7, "above table").is_data_error());
        assert!(CalcError::HeightExceedsTable { height_m: 30.0, max_height_m: 25.0 }.is_data_error());

        assert!(!CalcError::invalid_input("direction", "(1,1,0)", "not unit").is_data_error());
        assert!(!CalcError::not_implemented("EN 1991", "x").is_data_error());
    }

    #[test]
    fn test_height_error_message() {
        let err = CalcError::HeightExceedsTable { height_m: 30.0, max_height_m: 25.0 };
        assert!(err.to_string().contains("30.00 m"));
    }
}

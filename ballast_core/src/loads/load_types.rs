//! Load type and variability tags for force records.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Origin of a force record.
///
/// # Example
/// ```
/// use ballast_core::loads::LoadType;
///
/// assert_eq!(LoadType::Weight.code(), "G");
/// assert_eq!(LoadType::from_code("W").unwrap(), LoadType::Wind);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// W - Wind load on an element or segment
    Wind,
    /// G - Self weight or ballast
    Weight,
    /// R - Friction reaction on a base plate
    Friction,
}

impl LoadType {
    pub const ALL: [LoadType; 3] = [LoadType::Wind, LoadType::Weight, LoadType::Friction];

    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Wind => "W",
            LoadType::Weight => "G",
            LoadType::Friction => "R",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Wind => "Wind load",
            LoadType::Weight => "Self weight",
            LoadType::Friction => "Friction force",
        }
    }

    /// Parse a load type code. Unknown codes are a programmer error.
    pub fn from_code(code: &str) -> CalcResult<Self> {
        LoadType::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or_else(|| CalcError::invalid_input("load_type", code, "unknown load type code"))
    }

    /// Whether the load changes with the wind direction
    pub fn is_directional(&self) -> bool {
        matches!(self, LoadType::Wind | LoadType::Friction)
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Permanent or variable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variability {
    Permanent,
    Variable,
}

impl Variability {
    pub const ALL: [Variability; 2] = [Variability::Permanent, Variability::Variable];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for t in LoadType::ALL {
            assert_eq!(LoadType::from_code(t.code()).unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_code_is_programmer_error() {
        let err = LoadType::from_code("S").unwrap_err();
        assert!(!err.is_data_error());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&LoadType::Friction).unwrap();
        assert_eq!(json, "\"Friction\"");
    }

    #[test]
    fn test_directional() {
        assert!(LoadType::Wind.is_directional());
        assert!(!LoadType::Weight.is_directional());
    }
}

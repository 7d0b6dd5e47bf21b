//! # Analysis Settings
//!
//! Physical constants and run options, passed explicitly through the call
//! chain. Every field has a default, so a settings file only needs to list
//! what it changes:
//!
//! ```json
//! {
//!   "norms": ["En1991"],
//!   "wind_directions": { "count": 8 },
//!   "wind_zone": "Zone3",
//!   "temporary_reduction": 0.7
//! }
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::loads::WindDirections;
use crate::norms::Norm;
use crate::safety_factors::GAMMA_BALLAST;

/// Ambient physical constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Air density (kg/m³)
    pub air_density: f64,
    /// Kinematic viscosity of air (m²/s)
    pub kinematic_viscosity: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        PhysicalConstants {
            gravity: 9.81,
            air_density: 1.25,
            kinematic_viscosity: 15e-6,
        }
    }
}

/// Wind zone selecting the basic-pressure row of a zone table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindZone {
    Zone1,
    #[default]
    Zone2,
    Zone3,
    Zone4,
}

impl WindZone {
    pub const ALL: [WindZone; 4] = [WindZone::Zone1, WindZone::Zone2, WindZone::Zone3, WindZone::Zone4];

    pub fn code(&self) -> &'static str {
        match self {
            WindZone::Zone1 => "WZ1",
            WindZone::Zone2 => "WZ2",
            WindZone::Zone3 => "WZ3",
            WindZone::Zone4 => "WZ4",
        }
    }
}

/// Settings of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Norms to evaluate
    pub norms: Vec<Norm>,
    pub wind_directions: WindDirections,
    pub constants: PhysicalConstants,
    pub wind_zone: WindZone,
    /// Optional factor in (0, 1] on zone pressures for temporary structures
    pub temporary_reduction: Option<f64>,
    /// Operating-state wind speed limit for event structures (m/s)
    pub operating_wind_speed: f64,
    /// γ_ballast
    pub ballast_safety_factor: f64,
    /// Ratio below which fallback scenarios are evaluated
    pub required_safety: f64,
    pub evaluate_fallbacks: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            norms: Norm::ALL.to_vec(),
            wind_directions: WindDirections::default(),
            constants: PhysicalConstants::default(),
            wind_zone: WindZone::default(),
            temporary_reduction: None,
            operating_wind_speed: 15.0,
            ballast_safety_factor: GAMMA_BALLAST,
            required_safety: 1.0,
            evaluate_fallbacks: true,
        }
    }
}

fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(CalcError::invalid_input(field, value.to_string(), "must be positive"));
    }
    Ok(())
}

impl AnalysisSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if self.norms.is_empty() {
            return Err(CalcError::invalid_input("norms", "[]", "at least one norm is required"));
        }
        self.wind_directions.validate()?;
        require_positive("constants.gravity", self.constants.gravity)?;
        require_positive("constants.air_density", self.constants.air_density)?;
        require_positive("constants.kinematic_viscosity", self.constants.kinematic_viscosity)?;
        require_positive("operating_wind_speed", self.operating_wind_speed)?;
        require_positive("ballast_safety_factor", self.ballast_safety_factor)?;
        require_positive("required_safety", self.required_safety)?;
        if let Some(r) = self.temporary_reduction {
            if !(r > 0.0 && r <= 1.0) {
                return Err(CalcError::invalid_input(
                    "temporary_reduction",
                    r.to_string(),
                    "reduction factor must be in (0, 1]",
                ));
            }
        }
        Ok(())
    }

    /// Parse and validate settings from JSON.
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let settings: AnalysisSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file.
    pub fn from_json_file(path: &Path) -> CalcResult<Self> {
        let mut file = File::open(path)
            .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let settings: AnalysisSettings = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;
        settings.validate()?;
        Ok(settings)
    }
}

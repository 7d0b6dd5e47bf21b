//! Wind direction generator.
//!
//! Angles are azimuths in degrees: 0° blows towards +x, angles grow
//! counter-clockwise seen from above. Directions are horizontal unit vectors.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::geometry::Vec3;

/// One scanned wind direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindDirection {
    /// Azimuth in [0, 360)
    pub angle_deg: f64,
    /// Unit vector the wind blows along
    pub vector: Vec3,
}

impl WindDirection {
    pub fn from_angle(angle_deg: f64) -> Self {
        let angle_deg = angle_deg.rem_euclid(360.0);
        let rad = angle_deg.to_radians();
        WindDirection {
            angle_deg,
            vector: Vec3::new(rad.cos(), rad.sin(), 0.0),
        }
    }

    /// Label used in audit contexts
    pub fn label(&self) -> String {
        format!("{:.1}", self.angle_deg)
    }
}

/// Set of wind directions to scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindDirections {
    /// N equally spaced azimuths starting at 0°
    Count(usize),
    /// Explicit azimuths in degrees
    Angles(Vec<f64>),
}

impl Default for WindDirections {
    fn default() -> Self {
        WindDirections::Count(4)
    }
}

impl WindDirections {
    pub fn validate(&self) -> CalcResult<()> {
        match self {
            WindDirections::Count(0) => Err(CalcError::invalid_input(
                "wind_directions",
                "0",
                "at least one wind direction is required",
            )),
            WindDirections::Angles(angles) if angles.is_empty() => Err(CalcError::invalid_input(
                "wind_directions",
                "[]",
                "at least one wind direction is required",
            )),
            WindDirections::Angles(angles) if angles.iter().any(|a| !a.is_finite()) => Err(
                CalcError::invalid_input("wind_directions", format!("{:?}", angles), "angles must be finite"),
            ),
            _ => Ok(()),
        }
    }

    /// Generate the directions in scan order.
    pub fn generate(&self) -> CalcResult<Vec<WindDirection>> {
        self.validate()?;
        Ok(match self {
            WindDirections::Count(n) => (0..*n)
                .map(|i| WindDirection::from_angle(360.0 * i as f64 / *n as f64))
                .collect(),
            WindDirections::Angles(angles) => angles.iter().map(|a| WindDirection::from_angle(*a)).collect(),
        })
    }
}

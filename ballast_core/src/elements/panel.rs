//! Flat panels: banners, signs and walls.

use uuid::Uuid;

use super::{Element, WeightBearing, WindInput, WindLoaded};
use crate::aero::panel_wind_force;
use crate::audit::{codes, Protocol};
use crate::catalog::Catalog;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{normalize, polygon_area, polygon_centroid, polygon_normal, Vec3};
use crate::loads::{LoadCase, LoadType, Variability};
use crate::settings::PhysicalConstants;

/// Planar polygon exposed to wind on its full area.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPanel {
    id: Uuid,
    label: String,
    pub corners: Vec<Vec3>,
    /// Mass per square metre (kg/m²)
    pub areal_mass: f64,
}

impl FlatPanel {
    pub fn new(label: impl Into<String>, corners: Vec<Vec3>, areal_mass: f64) -> CalcResult<Self> {
        if corners.len() < 3 {
            return Err(CalcError::invalid_input(
                "corners",
                corners.len().to_string(),
                "a panel needs at least 3 corners",
            ));
        }
        if !(areal_mass.is_finite() && areal_mass >= 0.0) {
            return Err(CalcError::invalid_input(
                "areal_mass",
                areal_mass.to_string(),
                "must be non-negative",
            ));
        }
        Ok(FlatPanel {
            id: Uuid::new_v4(),
            label: label.into(),
            corners,
            areal_mass,
        })
    }

    pub fn area(&self) -> CalcResult<f64> {
        polygon_area(&self.corners)
    }

    fn height_range(&self) -> (f64, f64) {
        self.corners
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| (lo.min(c.z), hi.max(c.z)))
    }
}

impl Element for FlatPanel {
    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn top_height(&self) -> f64 {
        self.height_range().1
    }

    fn as_weight_bearing(&self) -> Option<&dyn WeightBearing> {
        Some(self)
    }

    fn as_wind_loaded(&self) -> Option<&dyn WindLoaded> {
        Some(self)
    }
}

impl WeightBearing for FlatPanel {
    fn weight_loads(&self, constants: &PhysicalConstants, _catalog: &Catalog) -> CalcResult<Vec<LoadCase>> {
        let area = self.area()?;
        let centroid = polygon_centroid(&self.corners)?;
        Ok(vec![LoadCase::new(
            format!("Weight {}", self.label),
            LoadType::Weight,
            Variability::Permanent,
            vec![Vec3::new(0.0, 0.0, -self.areal_mass * area * constants.gravity)],
            vec![self.corners.clone()],
            Some(centroid),
        )?])
    }
}

impl WindLoaded for FlatPanel {
    /// The whole panel takes the highest band pressure it reaches into.
    fn wind_loads(&self, input: &WindInput<'_>, protocol: &mut Protocol) -> CalcResult<Vec<LoadCase>> {
        let area = protocol.recover(self.area(), || f64::NAN)?;
        let normal = protocol.recover(normalize(&polygon_normal(&self.corners)).map(Some), || None)?;
        let normal = match normal {
            Some(n) if area.is_finite() => n,
            _ => {
                protocol.error(
                    codes::WIND_LOAD_SKIPPED,
                    format!("Panel '{}' has no area, wind load skipped", self.label),
                );
                return Ok(Vec::new());
            }
        };
        let (low, high) = self.height_range();
        let pressure = input.profile.max_pressure_between(low, high);
        let force = panel_wind_force(input.norm, area, &normal, &input.direction.vector, pressure, protocol)?;
        Ok(vec![LoadCase::new(
            format!("Wind {} ({} deg)", self.label, input.direction.label()),
            LoadType::Wind,
            Variability::Variable,
            vec![force],
            vec![self.corners.clone()],
            None,
        )?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::WindDirection;
    use crate::norms::Norm;
    use crate::wind_profile::WindProfile;
    use approx::assert_relative_eq;

    fn banner() -> FlatPanel {
        FlatPanel::new(
            "Banner",
            vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(4.0, 0.0, 1.0),
                Vec3::new(4.0, 0.0, 3.0),
                Vec3::new(0.0, 0.0, 3.0),
            ],
            0.5,
        )
        .unwrap()
    }

    #[test]
    fn test_weight_at_centroid() {
        let loads = banner().weight_loads(&PhysicalConstants::default(), &Catalog::builtin()).unwrap();
        assert_relative_eq!(loads[0].resultant().z, -0.5 * 8.0 * 9.81, epsilon = 1e-9);
        assert_relative_eq!(loads[0].attack_points()[0], Vec3::new(2.0, 0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_wind_uses_highest_touched_band() {
        let cat = Catalog::builtin();
        let direction = WindDirection::from_angle(90.0);
        let profile = WindProfile::from_table(&[2.0, 10.0], &[500.0, 800.0]).unwrap();
        let constants = PhysicalConstants::default();
        let input = WindInput {
            norm: Norm::En1991,
            direction: &direction,
            profile: &profile,
            constants: &constants,
            catalog: &cat,
        };
        let mut p = Protocol::new();
        let loads = banner().wind_loads(&input, &mut p).unwrap();
        assert_relative_eq!(loads[0].resultant().y, 1.8 * 800.0 * 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_too_few_corners_rejected() {
        assert!(FlatPanel::new("x", vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)], 1.0).is_err());
    }
}

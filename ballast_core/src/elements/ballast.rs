use uuid::Uuid;

use super::{Element, WeightBearing};
use crate::catalog::Catalog;
use crate::errors::CalcResult;
use crate::geometry::Vec3;
use crate::loads::{LoadCase, LoadType, Variability};
use crate::settings::PhysicalConstants;

/// Counterweight resting at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct BallastBlock {
    id: Uuid,
    label: String,
    /// Mass (kg)
    pub mass: f64,
    pub position: Vec3,
}

impl BallastBlock {
    pub fn new(label: impl Into<String>, mass: f64, position: Vec3) -> Self {
        BallastBlock {
            id: Uuid::new_v4(),
            label: label.into(),
            mass,
            position,
        }
    }
}

impl Element for BallastBlock {
    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn top_height(&self) -> f64 {
        self.position.z
    }

    fn as_weight_bearing(&self) -> Option<&dyn WeightBearing> {
        Some(self)
    }
}

impl WeightBearing for BallastBlock {
    fn weight_loads(&self, constants: &PhysicalConstants, _catalog: &Catalog) -> CalcResult<Vec<LoadCase>> {
        Ok(vec![LoadCase::point(
            format!("Ballast {}", self.label),
            LoadType::Weight,
            Variability::Permanent,
            Vec3::new(0.0, 0.0, -self.mass * constants.gravity),
            self.position,
        )?])
    }
}

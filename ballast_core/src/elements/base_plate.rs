//! Base plates: the ground contacts of a construction.

use uuid::Uuid;

use super::{Cornered, Element, FrictionBearing, WeightBearing};
use crate::catalog::{Catalog, Material};
use crate::errors::CalcResult;
use crate::geometry::Vec3;
use crate::loads::{LoadCase, LoadType, Variability};
use crate::settings::PhysicalConstants;

/// Rectangular base plate lying on the ground.
///
/// The long edge points along `rotation_deg` (0° = +x). An optional mat
/// (e.g. rubber) lies between plate and ground.
#[derive(Debug, Clone, PartialEq)]
pub struct BasePlate {
    id: Uuid,
    label: String,
    /// Catalog name of the plate type
    pub plate: String,
    /// Centre of the plate's ground face
    pub center: Vec3,
    pub rotation_deg: f64,
    pub ground: Material,
    pub mat: Option<Material>,
}

impl BasePlate {
    pub fn new(label: impl Into<String>, plate: impl Into<String>, center: Vec3, ground: Material) -> Self {
        BasePlate {
            id: Uuid::new_v4(),
            label: label.into(),
            plate: plate.into(),
            center,
            rotation_deg: 0.0,
            ground,
            mat: None,
        }
    }

    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn with_mat(mut self, mat: Material) -> Self {
        self.mat = Some(mat);
        self
    }

    fn short_edge(&self) -> Vec3 {
        let rad = self.rotation_deg.to_radians();
        Vec3::new(-rad.sin(), rad.cos(), 0.0)
    }
}

impl Element for BasePlate {
    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn top_height(&self) -> f64 {
        self.center.z
    }

    fn as_weight_bearing(&self) -> Option<&dyn WeightBearing> {
        Some(self)
    }

    fn as_cornered(&self) -> Option<&dyn Cornered> {
        Some(self)
    }

    fn as_friction_bearing(&self) -> Option<&dyn FrictionBearing> {
        Some(self)
    }
}

impl WeightBearing for BasePlate {
    fn weight_loads(&self, constants: &PhysicalConstants, catalog: &Catalog) -> CalcResult<Vec<LoadCase>> {
        let spec = catalog.get_baseplate(&self.plate)?;
        Ok(vec![LoadCase::point(
            format!("Weight {}", self.label),
            LoadType::Weight,
            Variability::Permanent,
            Vec3::new(0.0, 0.0, -spec.mass * constants.gravity),
            self.center,
        )?])
    }
}

impl Cornered for BasePlate {
    fn corners(&self, catalog: &Catalog) -> CalcResult<Vec<Vec3>> {
        let spec = catalog.get_baseplate(&self.plate)?;
        let half_long = self.long_edge() * (spec.length / 2.0);
        let half_short = self.short_edge() * (spec.width / 2.0);
        Ok(vec![
            self.center - half_long - half_short,
            self.center + half_long - half_short,
            self.center + half_long + half_short,
            self.center - half_long + half_short,
        ])
    }
}

impl FrictionBearing for BasePlate {
    fn material_chain(&self, catalog: &Catalog) -> CalcResult<Vec<Material>> {
        let spec = catalog.get_baseplate(&self.plate)?;
        let mut chain = vec![spec.material];
        chain.extend(self.mat);
        chain.push(self.ground);
        Ok(chain)
    }

    fn long_edge(&self) -> Vec3 {
        let rad = self.rotation_deg.to_radians();
        Vec3::new(rad.cos(), rad.sin(), 0.0)
    }

    fn contact_point(&self) -> Vec3 {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_corners_follow_rotation() {
        let cat = Catalog::builtin();
        let plate = BasePlate::new("BP", "BP-800x400", Vec3::new(1.0, 1.0, 0.0), Material::Asphalt).with_rotation(90.0);
        let corners = plate.corners(&cat).unwrap();
        // Long edge along +y after rotation
        let span_y = corners.iter().map(|c| c.y).fold(f64::MIN, f64::max) - corners.iter().map(|c| c.y).fold(f64::MAX, f64::min);
        let span_x = corners.iter().map(|c| c.x).fold(f64::MIN, f64::max) - corners.iter().map(|c| c.x).fold(f64::MAX, f64::min);
        assert_relative_eq!(span_y, 0.8, epsilon = 1e-12);
        assert_relative_eq!(span_x, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_material_chain_with_mat() {
        let cat = Catalog::builtin();
        let plate = BasePlate::new("BP", "BP-600x600", Vec3::zeros(), Material::Concrete).with_mat(Material::Rubber);
        assert_eq!(
            plate.material_chain(&cat).unwrap(),
            vec![Material::Steel, Material::Rubber, Material::Concrete]
        );
    }

    #[test]
    fn test_weight() {
        let cat = Catalog::builtin();
        let plate = BasePlate::new("BP", "BP-1000x1000", Vec3::new(2.0, 0.0, 0.0), Material::Concrete);
        let loads = plate.weight_loads(&PhysicalConstants::default(), &cat).unwrap();
        assert_relative_eq!(loads[0].resultant().z, -78.5 * 9.81, epsilon = 1e-9);
        assert_eq!(loads[0].attack_points()[0], Vec3::new(2.0, 0.0, 0.0));
    }
}

//! Force model and load generation
//!
//! # Overview
//!
//! - [`LoadType`] / [`Variability`] - Tags of a force record
//! - [`LoadCase`] - A force record: individual forces, their attack geometries and the resultant
//! - [`WindDirections`] - Generator for the scanned wind azimuths
//! - [`LoadPool`] - Per-angle cache of generated element loads shared by the three checks
//! - [`generation`] - Builds the per-element load cases for one wind direction
//!
//! # Example
//!
//! ```
//! use ballast_core::geometry::Vec3;
//! use ballast_core::loads::{LoadCase, LoadType, Variability};
//!
//! let wind = LoadCase::new(
//!     "Wind truss",
//!     LoadType::Wind,
//!     Variability::Variable,
//!     vec![Vec3::new(100.0, 0.0, 0.0), Vec3::new(50.0, 0.0, 0.0)],
//!     vec![
//!         vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0)],
//!         vec![Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 3.0)],
//!     ],
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(wind.resultant(), Vec3::new(150.0, 0.0, 0.0));
//! assert_eq!(wind.attack_points()[1], Vec3::new(0.0, 0.0, 2.5));
//! ```

pub mod directions;
pub mod generation;
pub mod load_types;
pub mod pool;

pub use directions::{WindDirection, WindDirections};
pub use generation::{generate_direction_loads, ElementLoads, LoadContext};
pub use load_types::{LoadType, Variability};
pub use pool::{AngleKey, LoadPool, PoolEntry};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::geometry::{attack_point, moment_about_axis, Axis, Vec3};

/// A force record: one or more forces of the same origin.
///
/// Forces and attack geometries are parallel lists. Each attack geometry is a
/// point (point load), two points (line) or a polygon. When no geometries are
/// given every force acts at the explicit centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    pub label: String,
    pub load_type: LoadType,
    pub variability: Variability,
    forces: Vec<Vec3>,
    attack_geometries: Vec<Vec<Vec3>>,
    centroid: Option<Vec3>,
    resultant: Vec3,
    attack_points: Vec<Vec3>,
}

impl LoadCase {
    /// Create a force record and derive its resultant and attack points.
    ///
    /// Shape errors (count mismatch, empty geometry, non-finite forces, no way
    /// to place a force) are programmer errors.
    pub fn new(
        label: impl Into<String>,
        load_type: LoadType,
        variability: Variability,
        forces: Vec<Vec3>,
        attack_geometries: Vec<Vec<Vec3>>,
        centroid: Option<Vec3>,
    ) -> CalcResult<Self> {
        let mut case = LoadCase {
            label: label.into(),
            load_type,
            variability,
            forces,
            attack_geometries,
            centroid,
            resultant: Vec3::zeros(),
            attack_points: Vec::new(),
        };
        case.recompute()?;
        Ok(case)
    }

    /// Single force at a single point.
    pub fn point(
        label: impl Into<String>,
        load_type: LoadType,
        variability: Variability,
        force: Vec3,
        at: Vec3,
    ) -> CalcResult<Self> {
        Self::new(label, load_type, variability, vec![force], Vec::new(), Some(at))
    }

    pub fn forces(&self) -> &[Vec3] {
        &self.forces
    }

    pub fn attack_geometries(&self) -> &[Vec<Vec3>] {
        &self.attack_geometries
    }

    pub fn centroid(&self) -> Option<Vec3> {
        self.centroid
    }

    /// Vector sum of the individual forces
    pub fn resultant(&self) -> Vec3 {
        self.resultant
    }

    /// One attack point per force
    pub fn attack_points(&self) -> &[Vec3] {
        &self.attack_points
    }

    /// Replace the forces and recompute the derived values.
    pub fn set_forces(&mut self, forces: Vec<Vec3>) -> CalcResult<()> {
        self.forces = forces;
        self.recompute()
    }

    /// Multiply every force by a factor.
    pub fn scale(&mut self, factor: f64) -> CalcResult<()> {
        let scaled = self.forces.iter().map(|f| f * factor).collect();
        self.set_forces(scaled)
    }

    /// Recompute the resultant and the attack points after an edit.
    pub fn recompute(&mut self) -> CalcResult<()> {
        if self.forces.is_empty() {
            return Err(CalcError::invalid_input(
                "forces",
                &self.label,
                "a force record needs at least one force",
            ));
        }
        if let Some(bad) = self.forces.iter().find(|f| !f.iter().all(|c| c.is_finite())) {
            return Err(CalcError::invalid_input(
                "forces",
                format!("({}, {}, {})", bad.x, bad.y, bad.z),
                "forces must be finite",
            ));
        }
        if !self.attack_geometries.is_empty() && self.attack_geometries.len() != self.forces.len() {
            return Err(CalcError::invalid_input(
                "attack_geometries",
                self.attack_geometries.len().to_string(),
                format!("expected one attack geometry per force ({})", self.forces.len()),
            ));
        }
        if self.attack_geometries.iter().any(|g| g.is_empty()) {
            return Err(CalcError::invalid_input(
                "attack_geometries",
                &self.label,
                "attack geometries must not be empty",
            ));
        }

        self.resultant = self.forces.iter().fold(Vec3::zeros(), |acc, f| acc + f);
        self.attack_points = if self.attack_geometries.is_empty() {
            let centroid = self.centroid.ok_or_else(|| CalcError::missing_field("centroid"))?;
            vec![centroid; self.forces.len()]
        } else {
            self.attack_geometries
                .iter()
                .map(|geometry| match (attack_point(geometry), self.centroid) {
                    (Ok(p), _) => Ok(p),
                    (Err(_), Some(c)) => Ok(c),
                    (Err(err), None) => Err(err),
                })
                .collect::<CalcResult<Vec<_>>>()?
        };
        Ok(())
    }

    /// Signed moment of every force about an axis.
    pub fn moments_about<'a>(&'a self, axis: &'a Axis) -> impl Iterator<Item = f64> + 'a {
        self.forces
            .iter()
            .zip(&self.attack_points)
            .map(move |(f, p)| moment_about_axis(axis, p, f))
    }

    /// Length of the horizontal part of the resultant
    pub fn horizontal_magnitude(&self) -> f64 {
        self.resultant.x.hypot(self.resultant.y)
    }

    /// Sum of the upward force components
    pub fn upward(&self) -> f64 {
        self.forces.iter().map(|f| f.z.max(0.0)).sum()
    }

    /// Sum of the downward force components (positive number)
    pub fn downward(&self) -> f64 {
        self.forces.iter().map(|f| (-f.z).max(0.0)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Deterministic pseudo-random forces in [-500, 500)
    fn force_family(seed: u64, count: usize) -> Vec<Vec3> {
        let mut state = seed;
        let mut next = || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as f64 / (1u64 << 31) as f64) * 1000.0 - 500.0
        };
        (0..count).map(|_| Vec3::new(next(), next(), next())).collect()
    }

    #[test]
    fn test_resultant_is_component_sum() {
        for seed in 1..30 {
            let forces = force_family(seed, 1 + (seed as usize % 7));
            let case = LoadCase::new(
                "random",
                LoadType::Wind,
                Variability::Variable,
                forces.clone(),
                Vec::new(),
                Some(Vec3::zeros()),
            )
            .unwrap();
            let expected = Vec3::new(
                forces.iter().map(|f| f.x).sum(),
                forces.iter().map(|f| f.y).sum(),
                forces.iter().map(|f| f.z).sum(),
            );
            assert_abs_diff_eq!(case.resultant(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_centroid_fallback_for_every_force() {
        let c = Vec3::new(1.0, 2.0, 3.0);
        let case = LoadCase::new(
            "weights",
            LoadType::Weight,
            Variability::Permanent,
            force_family(3, 5),
            Vec::new(),
            Some(c),
        )
        .unwrap();
        assert_eq!(case.attack_points().len(), 5);
        assert!(case.attack_points().iter().all(|p| *p == c));
    }

    #[test]
    fn test_attack_geometry_kinds() {
        let panel = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 2.0),
        ];
        let case = LoadCase::new(
            "mixed",
            LoadType::Wind,
            Variability::Variable,
            vec![Vec3::new(0.0, 1.0, 0.0); 3],
            vec![vec![Vec3::new(5.0, 5.0, 5.0)], vec![Vec3::zeros(), Vec3::new(0.0, 0.0, 4.0)], panel],
            None,
        )
        .unwrap();
        assert_eq!(case.attack_points()[0], Vec3::new(5.0, 5.0, 5.0));
        assert_abs_diff_eq!(case.attack_points()[1], Vec3::new(0.0, 0.0, 2.0), epsilon = 1e-12);
        assert_abs_diff_eq!(case.attack_points()[2], Vec3::new(1.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_geometry_uses_centroid() {
        let line = vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let c = Vec3::new(9.0, 9.0, 9.0);
        let case = LoadCase::new(
            "collinear",
            LoadType::Wind,
            Variability::Variable,
            vec![Vec3::new(1.0, 0.0, 0.0)],
            vec![line.clone()],
            Some(c),
        )
        .unwrap();
        assert_eq!(case.attack_points()[0], c);

        let err = LoadCase::new(
            "collinear",
            LoadType::Wind,
            Variability::Variable,
            vec![Vec3::new(1.0, 0.0, 0.0)],
            vec![line],
            None,
        )
        .unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn test_shape_errors() {
        let mismatch = LoadCase::new(
            "bad",
            LoadType::Wind,
            Variability::Variable,
            vec![Vec3::zeros(); 2],
            vec![vec![Vec3::zeros()]],
            None,
        );
        assert!(matches!(mismatch, Err(CalcError::InvalidInput { .. })));

        let no_place = LoadCase::new("bad", LoadType::Weight, Variability::Permanent, vec![Vec3::zeros()], Vec::new(), None);
        assert!(matches!(no_place, Err(CalcError::MissingField { .. })));

        let nan = LoadCase::point(
            "bad",
            LoadType::Wind,
            Variability::Variable,
            Vec3::new(f64::NAN, 0.0, 0.0),
            Vec3::zeros(),
        );
        assert!(nan.is_err());
    }

    #[test]
    fn test_set_forces_recomputes() {
        let mut case = LoadCase::point(
            "w",
            LoadType::Weight,
            Variability::Permanent,
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::zeros(),
        )
        .unwrap();
        case.scale(3.0).unwrap();
        assert_eq!(case.resultant(), Vec3::new(0.0, 0.0, -30.0));
        assert_abs_diff_eq!(case.downward(), 30.0);
        assert_eq!(case.upward(), 0.0);
    }
}

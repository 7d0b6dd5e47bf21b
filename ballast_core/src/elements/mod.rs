//! # Construction Elements
//!
//! An element contributes to the checks through capabilities. Each capability
//! is a trait, and [`Element`] exposes them as `Option<&dyn …>` accessors that
//! default to `None`. An element without a capability contributes nothing to
//! that part of the analysis.
//!
//! | capability         | used by                                  |
//! |--------------------|------------------------------------------|
//! | [`WeightBearing`]  | weight loads (all checks)                |
//! | [`WindLoaded`]     | wind loads (all checks)                  |
//! | [`Cornered`]       | footprint hull (tipping axes)            |
//! | [`FrictionBearing`]| friction loads and sliding resistance    |
//!
//! Built-in kinds: [`TrussElement`], [`PipeElement`], [`BasePlate`],
//! [`FlatPanel`] and [`BallastBlock`].

mod ballast;
mod base_plate;
mod members;
mod panel;
pub mod segmentation;

pub use ballast::BallastBlock;
pub use base_plate::BasePlate;
pub use members::{PipeElement, TrussElement};
pub use panel::FlatPanel;
pub use segmentation::{segment_by_height, HeightSegment};

use std::fmt::Debug;

use uuid::Uuid;

use crate::audit::{codes, Formula, Protocol};
use crate::catalog::{Catalog, Material};
use crate::errors::CalcResult;
use crate::geometry::Vec3;
use crate::loads::{LoadCase, WindDirection};
use crate::norms::Norm;
use crate::settings::PhysicalConstants;
use crate::wind_profile::WindProfile;

/// Everything an element needs to generate its wind loads.
#[derive(Debug, Clone, Copy)]
pub struct WindInput<'a> {
    pub norm: Norm,
    pub direction: &'a WindDirection,
    pub profile: &'a WindProfile,
    pub constants: &'a PhysicalConstants,
    pub catalog: &'a Catalog,
}

/// A part of a construction.
pub trait Element: Debug {
    fn id(&self) -> Uuid;

    fn label(&self) -> &str;

    /// Highest point above ground (m)
    fn top_height(&self) -> f64;

    fn as_weight_bearing(&self) -> Option<&dyn WeightBearing> {
        None
    }

    fn as_wind_loaded(&self) -> Option<&dyn WindLoaded> {
        None
    }

    fn as_cornered(&self) -> Option<&dyn Cornered> {
        None
    }

    fn as_friction_bearing(&self) -> Option<&dyn FrictionBearing> {
        None
    }
}

pub trait WeightBearing {
    /// Self-weight as permanent load cases.
    fn weight_loads(&self, constants: &PhysicalConstants, catalog: &Catalog) -> CalcResult<Vec<LoadCase>>;
}

pub trait WindLoaded {
    /// Wind load cases for one direction. An empty list means the element
    /// carries no wind load for this direction.
    fn wind_loads(&self, input: &WindInput<'_>, protocol: &mut Protocol) -> CalcResult<Vec<LoadCase>>;
}

pub trait Cornered {
    /// Ground contact points spanning the footprint.
    fn corners(&self, catalog: &Catalog) -> CalcResult<Vec<Vec3>>;
}

pub trait FrictionBearing {
    /// Contact materials from the element down to the ground.
    fn material_chain(&self, catalog: &Catalog) -> CalcResult<Vec<Material>>;

    /// Horizontal unit vector along the long edge of the contact.
    fn long_edge(&self) -> Vec3;

    /// Point where friction acts.
    fn contact_point(&self) -> Vec3;

    /// Effective friction coefficient of the contact chain.
    ///
    /// The weakest contact governs. Pairs taken from another norm's table are
    /// reported.
    fn effective_friction(&self, norm: Norm, catalog: &Catalog, protocol: &mut Protocol) -> CalcResult<f64> {
        let chain = self.material_chain(catalog)?;
        let friction = catalog.chain_friction(norm, &chain)?;
        for contact in &friction.contacts {
            if contact.norm != norm {
                protocol.hint(
                    codes::FRICTION_FALLBACK_NORM,
                    format!(
                        "No {} value for {} on {}, using {} ({})",
                        norm.code(),
                        contact.a,
                        contact.b,
                        contact.coefficient,
                        contact.norm.code()
                    ),
                );
            }
        }
        let sources: Vec<&str> = friction.contacts.iter().map(|c| c.source.as_str()).collect();
        protocol.document(
            Formula::FrictionCoefficient
                .bundle(friction.coefficient)
                .with_source(sources.join("; ")),
        );
        Ok(friction.coefficient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Severity;

    #[test]
    fn test_effective_friction_reports_norm_fallback() {
        let cat = Catalog::builtin();
        let plate = BasePlate::new("BP", "BP-600x600", Vec3::zeros(), Material::Concrete)
            .with_mat(Material::Rubber);
        let mut p = Protocol::new();
        // Steel/Rubber 0.50, Rubber/Concrete 0.60 (EN 13814 values)
        let mu = plate.effective_friction(Norm::En1991, &cat, &mut p).unwrap();
        assert_eq!(mu, 0.5);
        assert!(p
            .messages_at_least(Severity::Hint)
            .iter()
            .all(|m| m.code == codes::FRICTION_FALLBACK_NORM));
        assert_eq!(p.messages().len(), 2);
        assert_eq!(p.docs().len(), 1);
    }

    #[test]
    fn test_capabilities_by_kind() {
        let block = BallastBlock::new("Counterweight", 500.0, Vec3::zeros());
        assert!(block.as_weight_bearing().is_some());
        assert!(block.as_wind_loaded().is_none());
        assert!(block.as_cornered().is_none());

        let plate = BasePlate::new("BP", "BP-600x600", Vec3::zeros(), Material::Concrete);
        assert!(plate.as_friction_bearing().is_some());
        assert!(plate.as_cornered().is_some());
        assert!(plate.as_wind_loaded().is_none());
    }
}

//! Wind force magnitude and direction.

use super::ObjectType;
use crate::audit::{DocBundle, Formula, Protocol};
use crate::errors::CalcResult;
use crate::geometry::{require_unit, Vec3};

/// `F_w = c_f · q · A`
pub fn wind_force(cf: f64, pressure: f64, area: f64, protocol: &mut Protocol) -> f64 {
    let force = cf * pressure * area;
    protocol.document(
        Formula::WindForce
            .bundle(force)
            .with_sub_value(DocBundle::new("c_f", cf))
            .with_sub_value(DocBundle::new("q", pressure).with_unit("N/m^2"))
            .with_sub_value(DocBundle::new("A", area).with_unit("m^2")),
    );
    force
}

/// Direction the wind force acts in, scaled by the force.
///
/// Trusses and pipes take the wind component normal to their own `axis`:
/// `F · (w − (w·a)a)`. Flat panels take the component along their normal:
/// `F · (w·n) · n`. Both `wind` and `axis` must be unit vectors.
pub fn wind_force_vector(kind: ObjectType, force: f64, wind: &Vec3, axis: &Vec3) -> CalcResult<Vec3> {
    require_unit(wind, "wind")?;
    require_unit(axis, "axis")?;
    Ok(match kind {
        ObjectType::FlatPanel => axis * (force * wind.dot(axis)),
        ObjectType::Truss | ObjectType::Pipe => (wind - axis * wind.dot(axis)) * force,
    })
}

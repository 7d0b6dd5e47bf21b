//! # Geometry Kernel
//!
//! Vector algebra and computational geometry used by the load model and the
//! stability checks. Vectors are `nalgebra::Vector3<f64>` in metres (positions)
//! or newtons (forces); `z` points up.
//!
//! ## Modules
//!
//! - [`polygon`] - Polygon centroid/area (Newell normal + fan triangulation)
//! - [`hull`] - XY convex hull, tipping axes and moments about an axis
//! - [`interpolation`] - Clamped 1D and bilinear table interpolation

pub mod hull;
pub mod interpolation;
pub mod polygon;

pub use hull::{convex_hull_xy, hull_axes, moment_about_axis, Axis};
pub use interpolation::{bilinear, interpolate, Bilinear};
pub use polygon::{attack_point, polygon_area, polygon_centroid, polygon_normal};

use crate::errors::{CalcError, CalcResult};

/// 3D vector type used throughout the crate.
pub type Vec3 = nalgebra::Vector3<f64>;

/// Length below which a vector counts as zero.
pub const EPS: f64 = 1e-12;

/// Tolerance on the norm of vectors that must be unit length.
pub const UNIT_TOLERANCE: f64 = 1e-3;

/// Global "up" direction.
pub fn up() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

/// Returns the unit vector in the direction of `v`.
pub fn normalize(v: &Vec3) -> CalcResult<Vec3> {
    let len = v.norm();
    if len < EPS || !len.is_finite() {
        return Err(CalcError::degenerate(
            "normalize",
            format!("vector ({:.3e}, {:.3e}, {:.3e}) has no direction", v.x, v.y, v.z),
        ));
    }
    Ok(v / len)
}

/// Angle between two vectors in degrees.
///
/// The cosine is clamped to [-1, 1] so nearly parallel vectors do not produce `NaN`.
pub fn angle_deg(a: &Vec3, b: &Vec3) -> CalcResult<f64> {
    let a = normalize(a)?;
    let b = normalize(b)?;
    let cos = a.dot(&b).clamp(-1.0, 1.0);
    Ok(cos.acos().to_degrees())
}

/// Projects `v` onto the plane with the given normal.
pub fn project_onto_plane(v: &Vec3, normal: &Vec3) -> CalcResult<Vec3> {
    let n = normalize(normal)?;
    Ok(v - n * v.dot(&n))
}

/// Vector pointing from `from` to `to`.
pub fn vector_between(from: &Vec3, to: &Vec3) -> Vec3 {
    to - from
}

/// Checks that `v` has unit length within [`UNIT_TOLERANCE`].
///
/// A violation is a programmer error: callers are expected to normalize first.
pub fn require_unit(v: &Vec3, field: &str) -> CalcResult<()> {
    let len = v.norm();
    if !len.is_finite() || (len - 1.0).abs() > UNIT_TOLERANCE {
        return Err(CalcError::invalid_input(
            field,
            format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z),
            format!("expected a unit vector, length is {:.4}", len),
        ));
    }
    Ok(())
}

/// Checks that two points describe a segment of non-zero length.
pub fn require_distinct(start: &Vec3, end: &Vec3, operation: &str) -> CalcResult<()> {
    if (end - start).norm() < EPS {
        return Err(CalcError::degenerate(operation, "start and end point coincide"));
    }
    Ok(())
}

/// Intersection of the segment `a`→`b` with a plane.
///
/// Returns `None` if the segment is parallel to the plane or the intersection
/// lies outside the segment (`t` outside [0, 1]).
pub fn intersect_segment_plane(a: &Vec3, b: &Vec3, plane_point: &Vec3, plane_normal: &Vec3) -> Option<Vec3> {
    let dir = b - a;
    let denom = plane_normal.dot(&dir);
    if denom.abs() < EPS {
        return None;
    }
    let t = plane_normal.dot(&(plane_point - a)) / denom;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(a + dir * t)
}

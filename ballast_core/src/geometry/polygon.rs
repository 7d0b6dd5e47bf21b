//! Polygon centroid and area.
//!
//! Both use the Newell normal of the polygon and a fan triangulation from the
//! first vertex. Signed triangle areas are measured along the Newell normal, so
//! planar non-convex polygons are handled correctly.

use super::{normalize, Vec3, EPS};
use crate::errors::{CalcError, CalcResult};

/// Newell normal of a polygon (not normalized; length equals twice the area).
pub fn polygon_normal(points: &[Vec3]) -> Vec3 {
    let n = points.len();
    let mut normal = Vec3::zeros();
    for i in 0..n {
        let cur = points[i];
        let next = points[(i + 1) % n];
        normal.x += (cur.y - next.y) * (cur.z + next.z);
        normal.y += (cur.z - next.z) * (cur.x + next.x);
        normal.z += (cur.x - next.x) * (cur.y + next.y);
    }
    normal
}

/// Fan triangulation: (signed area sum, area-weighted centroid sum).
fn fan(points: &[Vec3], operation: &str) -> CalcResult<(f64, Vec3)> {
    if points.len() < 3 {
        return Err(CalcError::degenerate(
            operation,
            format!("polygon needs at least 3 points, got {}", points.len()),
        ));
    }
    let unit_normal = normalize(&polygon_normal(points))
        .map_err(|_| CalcError::degenerate(operation, "polygon has zero area"))?;

    let origin = points[0];
    let mut area_sum = 0.0;
    let mut weighted = Vec3::zeros();
    for i in 1..points.len() - 1 {
        let a = points[i] - origin;
        let b = points[i + 1] - origin;
        let area = 0.5 * a.cross(&b).dot(&unit_normal);
        area_sum += area;
        weighted += (origin + points[i] + points[i + 1]) / 3.0 * area;
    }
    if area_sum.abs() < EPS {
        return Err(CalcError::degenerate(operation, "polygon has zero area"));
    }
    Ok((area_sum, weighted))
}

/// Area centroid of a planar polygon.
pub fn polygon_centroid(points: &[Vec3]) -> CalcResult<Vec3> {
    let (area, weighted) = fan(points, "polygon_centroid")?;
    Ok(weighted / area)
}

/// Area of a planar polygon (always non-negative).
pub fn polygon_area(points: &[Vec3]) -> CalcResult<f64> {
    let (area, _) = fan(points, "polygon_area")?;
    Ok(area.abs())
}

/// Representative point of an attack geometry.
///
/// One point is a point load, two points a line (midpoint), three or more a
/// polygon (area centroid).
pub fn attack_point(points: &[Vec3]) -> CalcResult<Vec3> {
    match points {
        [] => Err(CalcError::degenerate("attack_point", "empty attack geometry")),
        [p] => Ok(*p),
        [a, b] => Ok((a + b) / 2.0),
        _ => polygon_centroid(points),
    }
}

//! Footprint hull, tipping axes and moments about an axis.
//!
//! ## Sign Convention
//!
//! Hull vertices are returned counter-clockwise (seen from above). An axis built
//! from a hull edge points along the edge, so the footprint lies to its left.
//! With the right-hand rule a **positive** moment about such an axis rotates the
//! construction outward over the edge (tipping), a **negative** moment presses it
//! back onto the footprint (standing).

use serde::{Deserialize, Serialize};

use super::{normalize, Vec3};
use crate::errors::{CalcError, CalcResult};

/// Points closer than this in x and y are treated as one footprint point.
const DEDUP_TOLERANCE: f64 = 1e-9;

/// Candidate tipping axis: a point plus a unit direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Index of the hull edge this axis was built from
    pub index: usize,
    /// Point on the axis (start vertex of the hull edge)
    pub point: Vec3,
    /// Unit direction (along the counter-clockwise hull edge)
    pub direction: Vec3,
}

impl Axis {
    /// Builds the axis through the hull edge `start`→`end`.
    pub fn from_edge(index: usize, start: Vec3, end: Vec3) -> CalcResult<Self> {
        Ok(Axis {
            index,
            point: start,
            direction: normalize(&(end - start))?,
        })
    }

    /// Short label for audit contexts (e.g. "edge 2").
    pub fn label(&self) -> String {
        format!("edge {}", self.index + 1)
    }
}

/// Signed moment of `force` applied at `point` about `axis`: `(r × F) · d`.
pub fn moment_about_axis(axis: &Axis, point: &Vec3, force: &Vec3) -> f64 {
    let r = point - axis.point;
    r.cross(force).dot(&axis.direction)
}

fn cross_2d(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Convex hull of the XY projection of `points` (Andrew's monotone chain).
///
/// Vertices come back counter-clockwise, without collinear or interior points,
/// at the lowest `z` of the input (the ground contact level).
pub fn convex_hull_xy(points: &[Vec3]) -> CalcResult<Vec<Vec3>> {
    if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite())) {
        return Err(CalcError::degenerate("convex_hull_xy", "non-finite coordinate"));
    }

    let mut xy: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    xy.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    xy.dedup_by(|a, b| (a.0 - b.0).abs() < DEDUP_TOLERANCE && (a.1 - b.1).abs() < DEDUP_TOLERANCE);

    if xy.len() < 3 {
        return Err(CalcError::degenerate(
            "convex_hull_xy",
            format!("need at least 3 distinct footprint points, got {}", xy.len()),
        ));
    }

    let mut lower: Vec<(f64, f64)> = Vec::with_capacity(xy.len());
    for &p in &xy {
        while lower.len() >= 2 && cross_2d(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<(f64, f64)> = Vec::with_capacity(xy.len());
    for &p in xy.iter().rev() {
        while upper.len() >= 2 && cross_2d(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);

    if lower.len() < 3 {
        return Err(CalcError::degenerate("convex_hull_xy", "footprint points are collinear"));
    }

    let ground = points.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
    Ok(lower.into_iter().map(|(x, y)| Vec3::new(x, y, ground)).collect())
}

/// One tipping axis per hull edge.
pub fn hull_axes(hull: &[Vec3]) -> CalcResult<Vec<Axis>> {
    let n = hull.len();
    (0..n)
        .map(|i| Axis::from_edge(i, hull[i], hull[(i + 1) % n]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon_area;
    use approx::assert_abs_diff_eq;

    /// Deterministic pseudo-random coordinates in [0, 10)
    fn scatter(seed: u64, count: usize) -> Vec<Vec3> {
        let mut state = seed;
        let mut next = || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as f64 / (1u64 << 31) as f64) * 10.0
        };
        (0..count).map(|_| Vec3::new(next(), next(), 0.0)).collect()
    }

    #[test]
    fn test_square_with_interior_points() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.5),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0), // collinear on the bottom edge
        ];
        let hull = convex_hull_xy(&pts).unwrap();
        assert_eq!(hull.len(), 4);
        assert_abs_diff_eq!(polygon_area(&hull).unwrap(), 4.0, epsilon = 1e-12);
        assert!(hull.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_hull_is_counter_clockwise() {
        let hull = convex_hull_xy(&scatter(7, 30)).unwrap();
        let n = hull.len();
        let signed: f64 = (0..n)
            .map(|i| hull[i].x * hull[(i + 1) % n].y - hull[(i + 1) % n].x * hull[i].y)
            .sum();
        assert!(signed > 0.0);
    }

    #[test]
    fn test_duplicates_and_too_few_points() {
        let pts = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)];
        assert!(convex_hull_xy(&pts).is_err());

        let collinear = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 2.0, 0.0)];
        assert!(convex_hull_xy(&collinear).is_err());
    }

    #[test]
    fn test_hull_area_monotone_under_superset() {
        for seed in 1..20 {
            let all = scatter(seed, 40);
            let subset = &all[..12];
            let small = polygon_area(&convex_hull_xy(subset).unwrap()).unwrap();
            let large = polygon_area(&convex_hull_xy(&all).unwrap()).unwrap();
            assert!(small <= large + 1e-9, "seed {}: {} > {}", seed, small, large);
        }
    }

    #[test]
    fn test_hull_excludes_strictly_interior_points() {
        for seed in 1..10 {
            let pts = scatter(seed, 25);
            let hull = convex_hull_xy(&pts).unwrap();
            let axes = hull_axes(&hull).unwrap();
            for p in &pts {
                // Left-of-edge distances; all >= 0 means inside or on the hull
                let sides: Vec<f64> = axes
                    .iter()
                    .map(|a| {
                        let r = p - a.point;
                        a.direction.x * r.y - a.direction.y * r.x
                    })
                    .collect();
                assert!(sides.iter().all(|&s| s >= -1e-9));

                let strictly_interior = sides.iter().all(|&s| s > 1e-9);
                let is_vertex = hull.iter().any(|v| (v.x - p.x).abs() < 1e-12 && (v.y - p.y).abs() < 1e-12);
                assert!(!(strictly_interior && is_vertex));
            }
        }
    }

    #[test]
    fn test_moment_sign_convention() {
        // Bottom edge of a square footprint, running +x
        let axis = Axis::from_edge(0, Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)).unwrap();

        // Weight inside the footprint stabilizes
        let standing = moment_about_axis(&axis, &Vec3::new(1.0, 1.0, 0.0), &Vec3::new(0.0, 0.0, -100.0));
        assert_abs_diff_eq!(standing, -100.0, epsilon = 1e-12);

        // Horizontal push outward (-y) at 3 m height tips
        let tipping = moment_about_axis(&axis, &Vec3::new(1.0, 1.0, 3.0), &Vec3::new(0.0, -10.0, 0.0));
        assert_abs_diff_eq!(tipping, 30.0, epsilon = 1e-12);
    }
}

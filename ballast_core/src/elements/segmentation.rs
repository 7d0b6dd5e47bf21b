//! Height-band segmentation of straight members.
//!
//! A member crossing band boundaries of a wind profile is split at the
//! boundary planes. Bands are walked bottom-up. The first band extends down
//! and the last band extends up without limit, so every part of the member
//! lands in exactly one band.

use crate::audit::{codes, Protocol};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{intersect_segment_plane, require_distinct, up, Vec3};
use crate::wind_profile::WindProfile;

/// Pieces shorter than this are merged into their neighbour (m).
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// One piece of a member inside one pressure band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightSegment {
    pub start: Vec3,
    pub end: Vec3,
    /// Band index in the profile
    pub band: usize,
    /// Dynamic pressure of the band (N/m²)
    pub pressure: f64,
}

impl HeightSegment {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

fn boundary_point(low: &Vec3, high: &Vec3, z: f64) -> CalcResult<Vec3> {
    intersect_segment_plane(low, high, &Vec3::new(0.0, 0.0, z), &up())
        .ok_or_else(|| CalcError::degenerate("segment_by_height", format!("no crossing at z = {}", z)))
}

/// Split the member `start → end` at the band boundaries of `profile`.
///
/// Segments run bottom-up. A horizontal member yields a single segment.
pub fn segment_by_height(
    start: &Vec3,
    end: &Vec3,
    profile: &WindProfile,
    protocol: &mut Protocol,
) -> CalcResult<Vec<HeightSegment>> {
    require_distinct(start, end, "segment_by_height")?;
    let bands = profile.bands();
    let (low, high) = if start.z <= end.z { (*start, *end) } else { (*end, *start) };

    if high.z - low.z < MIN_SEGMENT_LENGTH {
        let band = profile.band_index(low.z);
        return Ok(vec![HeightSegment {
            start: low,
            end: high,
            band,
            pressure: bands[band].pressure,
        }]);
    }

    let last = bands.len() - 1;
    let mut segments = Vec::new();
    for (i, band) in bands.iter().enumerate() {
        let bottom = if i == 0 { f64::NEG_INFINITY } else { band.bottom };
        let top = if i == last { f64::INFINITY } else { band.top };
        if high.z <= bottom || low.z >= top {
            continue;
        }
        let entry = if low.z >= bottom { low } else { boundary_point(&low, &high, bottom)? };
        let exit = if high.z <= top { high } else { boundary_point(&low, &high, top)? };
        if (exit - entry).norm() < MIN_SEGMENT_LENGTH {
            protocol.info(
                codes::SEGMENT_MERGED,
                format!("Zero-length piece in band {} merged", i),
            );
            continue;
        }
        segments.push(HeightSegment {
            start: entry,
            end: exit,
            band: i,
            pressure: band.pressure,
        });
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn profile(tops: &[f64]) -> WindProfile {
        let pressures: Vec<f64> = (0..tops.len()).map(|i| 100.0 * (i + 1) as f64).collect();
        WindProfile::from_table(tops, &pressures).unwrap()
    }

    #[test]
    fn test_vertical_member_split_at_boundaries() {
        let p = profile(&[8.0, 20.0, 35.0, 50.0]);
        let mut protocol = Protocol::new();
        let segs = segment_by_height(&Vec3::new(0.0, 0.0, 2.0), &Vec3::new(0.0, 0.0, 25.0), &p, &mut protocol).unwrap();
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].band, 0);
        assert_relative_eq!(segs[0].end.z, 8.0);
        assert_relative_eq!(segs[1].length(), 12.0);
        assert_relative_eq!(segs[2].start.z, 20.0);
        assert_eq!(segs[2].pressure, 300.0);
    }

    #[test]
    fn test_reversed_member_runs_bottom_up() {
        let p = profile(&[5.0, 10.0]);
        let mut protocol = Protocol::new();
        let segs = segment_by_height(&Vec3::new(0.0, 0.0, 9.0), &Vec3::new(0.0, 0.0, 1.0), &p, &mut protocol).unwrap();
        assert_eq!(segs.len(), 2);
        assert!(segs[0].start.z < segs[1].start.z);
    }

    #[test]
    fn test_member_above_table_uses_last_band() {
        let p = profile(&[5.0, 10.0]);
        let mut protocol = Protocol::new();
        let segs = segment_by_height(&Vec3::new(0.0, 0.0, 8.0), &Vec3::new(0.0, 0.0, 14.0), &p, &mut protocol).unwrap();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].band, 1);
        assert_relative_eq!(segs[0].length(), 6.0);
    }

    #[test]
    fn test_horizontal_member_on_boundary() {
        let p = profile(&[5.0, 10.0]);
        let mut protocol = Protocol::new();
        let segs = segment_by_height(&Vec3::new(0.0, 0.0, 5.0), &Vec3::new(6.0, 0.0, 5.0), &p, &mut protocol).unwrap();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].band, 1);
    }

    #[test]
    fn test_endpoint_on_boundary_is_not_split() {
        let p = profile(&[5.0, 10.0]);
        let mut protocol = Protocol::new();
        let segs = segment_by_height(&Vec3::new(0.0, 0.0, 0.0), &Vec3::new(0.0, 0.0, 5.0), &p, &mut protocol).unwrap();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].band, 0);
    }

    #[test]
    fn test_degenerate_member_rejected() {
        let p = profile(&[5.0]);
        let mut protocol = Protocol::new();
        let a = Vec3::new(1.0, 1.0, 1.0);
        assert!(segment_by_height(&a, &a, &p, &mut protocol).unwrap_err().is_data_error());
    }

    #[test]
    fn test_segment_lengths_sum_to_member_length() {
        // Deterministic family of band tables and inclined members
        let mut seed: u64 = 7;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 11) as f64 / (1u64 << 53) as f64
        };
        for _ in 0..200 {
            let count = 1 + (next() * 5.0) as usize;
            let mut tops = Vec::with_capacity(count);
            let mut z = 0.0;
            for _ in 0..count {
                z += 0.5 + next() * 6.0;
                tops.push(z);
            }
            let p = profile(&tops);
            let start = Vec3::new(next() * 4.0, next() * 4.0, next() * z * 1.2);
            let end = Vec3::new(next() * 4.0, next() * 4.0, next() * z * 1.2);
            let mut protocol = Protocol::new();
            let segs = segment_by_height(&start, &end, &p, &mut protocol).unwrap();
            let total: f64 = segs.iter().map(|s| s.length()).sum();
            assert_relative_eq!(total, (end - start).norm(), epsilon = 1e-9);
        }
    }
}

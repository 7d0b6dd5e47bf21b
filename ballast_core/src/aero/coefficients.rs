//! Approach classification, base force coefficient and force coefficient.
//!
//! ## Truss approach
//!
//! The wind component inside the section plane is compared with the section
//! reference direction (the normal of one truss face). The angle between them
//! is reduced modulo the section period (180° ladder, 120° triangle, 90°
//! square) and folded to the distance θ from the nearest face:
//!
//! | θ                        | approach |
//! |--------------------------|----------|
//! | ≤ 10°                    | face     |
//! | ≥ period/2 − 10°         | corner   |
//! | otherwise                | middle   |
//!
//! A wind blowing along the truss axis has no in-section component and gives
//! no force (parallel).

use serde::{Deserialize, Serialize};

use super::Section;
use crate::audit::{codes, DocBundle, Formula, Protocol, Source};
use crate::catalog::TrussSpec;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{interpolate, normalize, Vec3};
use crate::norms::Norm;

/// Half-width of the face and corner bands (degrees)
const APPROACH_BAND_DEG: f64 = 10.0;
/// In-section wind components below this count as parallel flow
const PARALLEL_TOLERANCE: f64 = 1e-6;

/// Reynolds number above which truss coefficients are not tabulated
pub const TRUSS_RE_LIMIT: f64 = 4e5;
/// Pipe coefficient below the critical range and the conservative value above it
pub const PIPE_CF_SUBCRITICAL: f64 = 1.2;
const PIPE_RE: [f64; 4] = [1.8e5, 2.5e5, 3.0e5, 4.0e5];
const PIPE_CF: [f64; 4] = [1.2, 0.8, 0.6, 0.7];

const PANEL_CF: f64 = 1.8;
const PANEL_CF_EN13814: f64 = 1.6;

/// Solidity grid shared by all truss tables
const PHI_GRID: [f64; 7] = [0.05, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
const SQUARE_FACE: [f64; 7] = [1.20, 1.18, 1.15, 1.12, 1.10, 1.10, 1.12];
const SQUARE_CORNER: [f64; 7] = [1.30, 1.28, 1.24, 1.20, 1.18, 1.18, 1.20];
const TRIANGLE_FACE: [f64; 7] = [1.10, 1.08, 1.05, 1.02, 1.00, 1.00, 1.02];
const TRIANGLE_CORNER: [f64; 7] = [1.20, 1.17, 1.13, 1.10, 1.08, 1.08, 1.10];
const LADDER_FACE: [f64; 7] = [1.30, 1.25, 1.20, 1.15, 1.10, 1.10, 1.15];
const LADDER_CORNER: [f64; 7] = [1.40, 1.35, 1.30, 1.25, 1.20, 1.20, 1.25];

/// How the wind meets a truss section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Approach {
    Face,
    Corner,
    /// Between face and corner; carries θ (degrees from the nearest face)
    Middle(f64),
    Parallel,
}

impl Approach {
    pub fn code(&self) -> &'static str {
        match self {
            Approach::Face => "face",
            Approach::Corner => "corner",
            Approach::Middle(_) => "middle",
            Approach::Parallel => "parallel",
        }
    }
}

/// Classify the approach of `wind` on a truss with unit `axis` and section
/// `reference` direction.
pub fn classify_approach(wind: &Vec3, axis: &Vec3, reference: &Vec3, period_deg: f64) -> CalcResult<Approach> {
    let in_section = wind - axis * wind.dot(axis);
    if in_section.norm() < PARALLEL_TOLERANCE {
        return Ok(Approach::Parallel);
    }
    let r = normalize(&(reference - axis * reference.dot(axis)))?;
    let angle = r.cross(&in_section).dot(axis).atan2(r.dot(&in_section)).to_degrees();
    let reduced = angle.rem_euclid(period_deg);
    let theta = reduced.min(period_deg - reduced);

    Ok(if theta <= APPROACH_BAND_DEG {
        Approach::Face
    } else if theta >= period_deg / 2.0 - APPROACH_BAND_DEG {
        Approach::Corner
    } else {
        Approach::Middle(theta)
    })
}

fn truss_tables(spec: &TrussSpec) -> (&'static [f64; 7], &'static [f64; 7]) {
    match spec.chord_count {
        2 => (&LADDER_FACE, &LADDER_CORNER),
        3 => (&TRIANGLE_FACE, &TRIANGLE_CORNER),
        _ => (&SQUARE_FACE, &SQUARE_CORNER),
    }
}

fn truss_coefficient(spec: &TrussSpec, approach: Approach, phi: f64) -> f64 {
    let (face, corner) = truss_tables(spec);
    let face_cf = interpolate(&PHI_GRID, face, phi);
    let corner_cf = interpolate(&PHI_GRID, corner, phi);
    match approach {
        Approach::Face => face_cf,
        Approach::Corner => corner_cf,
        Approach::Parallel => 0.0,
        Approach::Middle(theta) if spec.chord_count == 4 => {
            let lo = APPROACH_BAND_DEG;
            let hi = spec.period_deg() / 2.0 - APPROACH_BAND_DEG;
            interpolate(&[lo, hi], &[face_cf, corner_cf], theta)
        }
        Approach::Middle(_) => face_cf.max(corner_cf),
    }
}

/// Base force coefficient c_f0.
///
/// - pipe: 1.2 below Re = 1.8e5, tabulated in the critical range, 1.2 above 4e5
/// - truss: φ tables per approach; undefined above Re = 4e5
/// - flat panel: fixed value
#[allow(clippy::too_many_arguments)]
pub fn base_force_coefficient(
    norm: Norm,
    section: Section<'_>,
    wind: &Vec3,
    axis: &Vec3,
    reference: &Vec3,
    phi: f64,
    re: f64,
    protocol: &mut Protocol,
) -> CalcResult<f64> {
    let (cf0, source) = match section {
        Section::FlatPanel { .. } => match norm {
            Norm::En13814 => (PANEL_CF_EN13814, Source::En13814 { section: "force coefficients" }),
            _ => (PANEL_CF, Source::En1991 { section: "7.4.3" }),
        },
        Section::Pipe(_) => {
            if !re.is_finite() {
                return Err(CalcError::out_of_domain("Re", re, "Reynolds number undefined"));
            }
            let cf0 = if re < PIPE_RE[0] {
                PIPE_CF_SUBCRITICAL
            } else if re <= PIPE_RE[PIPE_RE.len() - 1] {
                interpolate(&PIPE_RE, &PIPE_CF, re)
            } else {
                protocol.hint(
                    codes::REYNOLDS_CONSERVATIVE,
                    format!("Re = {:.3e} above the tabulated range, using c_f0 = {}", re, PIPE_CF_SUBCRITICAL),
                );
                PIPE_CF_SUBCRITICAL
            };
            (cf0, Source::En1991 { section: "7.9.2, Figure 7.28" })
        }
        Section::Truss(spec) => {
            if !(re.is_finite() && re <= TRUSS_RE_LIMIT) {
                return Err(CalcError::out_of_domain(
                    "Re",
                    re,
                    format!("truss coefficients are tabulated up to Re = {:.0e}", TRUSS_RE_LIMIT),
                ));
            }
            if !(PHI_GRID[0]..=PHI_GRID[PHI_GRID.len() - 1]).contains(&phi) {
                protocol.hint(
                    codes::REDUCTION_CLAMPED,
                    format!("phi = {:.3} outside the truss coefficient table, clamped", phi),
                );
            }
            let approach = classify_approach(wind, axis, reference, spec.period_deg())?;
            protocol.info(
                codes::APPROACH_CLASSIFIED,
                format!("{} truss approached at {}", spec.name, approach.code()),
            );
            (truss_coefficient(spec, approach, phi), Source::En1991 { section: "7.11, Figure 7.33" })
        }
    };

    protocol.document(
        Formula::BaseForceCoefficient
            .bundle_cited(cf0, &source)
            .with_sub_value(DocBundle::new("phi", phi))
            .with_sub_value(DocBundle::new("Re", re)),
    );
    Ok(cf0)
}

/// Force coefficient `c_f = c_f0 · ψ_λ` (flat panels: the fixed table value).
pub fn force_coefficient(section: Section<'_>, cf0: f64, psi: f64, protocol: &mut Protocol) -> f64 {
    let cf = match section {
        Section::FlatPanel { .. } => cf0,
        _ => cf0 * psi,
    };
    protocol.document(
        Formula::ForceCoefficient
            .bundle(cf)
            .with_sub_value(DocBundle::new("c_f0", cf0))
            .with_sub_value(DocBundle::new("psi_lambda", psi)),
    );
    cf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use approx::assert_relative_eq;

    fn axis() -> Vec3 {
        Vec3::new(0.0, 0.0, 1.0)
    }

    fn reference() -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }

    fn wind_at(deg: f64) -> Vec3 {
        let r = deg.to_radians();
        Vec3::new(r.cos(), r.sin(), 0.0)
    }

    #[test]
    fn test_square_truss_classification() {
        assert_eq!(classify_approach(&wind_at(0.0), &axis(), &reference(), 90.0).unwrap(), Approach::Face);
        assert_eq!(classify_approach(&wind_at(95.0), &axis(), &reference(), 90.0).unwrap(), Approach::Face);
        assert_eq!(classify_approach(&wind_at(45.0), &axis(), &reference(), 90.0).unwrap(), Approach::Corner);
        assert_eq!(classify_approach(&wind_at(-50.0), &axis(), &reference(), 90.0).unwrap(), Approach::Corner);
        match classify_approach(&wind_at(20.0), &axis(), &reference(), 90.0).unwrap() {
            Approach::Middle(theta) => assert_relative_eq!(theta, 20.0, epsilon = 1e-9),
            other => panic!("expected middle, got {:?}", other),
        }
    }

    #[test]
    fn test_triangle_and_ladder_periods() {
        assert_eq!(classify_approach(&wind_at(120.0), &axis(), &reference(), 120.0).unwrap(), Approach::Face);
        assert_eq!(classify_approach(&wind_at(60.0), &axis(), &reference(), 120.0).unwrap(), Approach::Corner);
        assert_eq!(classify_approach(&wind_at(180.0), &axis(), &reference(), 180.0).unwrap(), Approach::Face);
        assert_eq!(classify_approach(&wind_at(90.0), &axis(), &reference(), 180.0).unwrap(), Approach::Corner);
    }

    #[test]
    fn test_parallel_wind() {
        assert_eq!(classify_approach(&axis(), &axis(), &reference(), 90.0).unwrap(), Approach::Parallel);
    }

    #[test]
    fn test_square_middle_interpolates() {
        let cat = Catalog::builtin();
        let spec = cat.get_truss("F34").unwrap();
        let face = truss_coefficient(spec, Approach::Face, 0.3);
        let corner = truss_coefficient(spec, Approach::Corner, 0.3);
        let mid = truss_coefficient(spec, Approach::Middle(22.5), 0.3);
        assert_relative_eq!(mid, (face + corner) / 2.0, epsilon = 1e-12);

        let tri = cat.get_truss("F33").unwrap();
        let tri_mid = truss_coefficient(tri, Approach::Middle(30.0), 0.3);
        assert_relative_eq!(tri_mid, 1.10);
    }

    #[test]
    fn test_truss_high_reynolds_is_data_error() {
        let cat = Catalog::builtin();
        let spec = cat.get_truss("F34").unwrap();
        let mut p = Protocol::new();
        let err = base_force_coefficient(Norm::En1991, Section::Truss(spec), &reference(), &axis(), &reference(), 0.3, 5e5, &mut p)
            .unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn test_pipe_reynolds_ranges() {
        let cat = Catalog::builtin();
        let pipe = cat.get_pipe("48.3x3.2").unwrap();
        let mut p = Protocol::new();
        let cf = |re: f64, p: &mut Protocol| {
            base_force_coefficient(Norm::En1991, Section::Pipe(pipe), &reference(), &axis(), &reference(), 1.0, re, p).unwrap()
        };
        assert_eq!(cf(1e5, &mut p), 1.2);
        assert_relative_eq!(cf(2.5e5, &mut p), 0.8);
        assert!(p.messages().is_empty());
        assert_eq!(cf(1e6, &mut p), 1.2);
        assert_eq!(p.messages()[0].code, codes::REYNOLDS_CONSERVATIVE);
    }

    #[test]
    fn test_panel_coefficients_per_norm() {
        let mut p = Protocol::new();
        let panel = Section::FlatPanel { area: 2.0 };
        let en13814 = base_force_coefficient(Norm::En13814, panel, &reference(), &reference(), &reference(), 1.0, 0.0, &mut p).unwrap();
        let en1991 = base_force_coefficient(Norm::En1991, panel, &reference(), &reference(), &reference(), 1.0, 0.0, &mut p).unwrap();
        assert_eq!(en13814, 1.6);
        assert_eq!(en1991, 1.8);
        assert_eq!(force_coefficient(panel, en1991, 0.5, &mut p), 1.8);
    }
}

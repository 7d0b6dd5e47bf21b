//! Effective slenderness and end-effect factor.

use super::Section;
use crate::audit::{codes, DocBundle, Formula, Protocol, Source};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{bilinear, interpolate};
use crate::norms::Norm;

/// Calibration points of the length factor k(L): (15 m, 2.0) to (50 m, 1.4).
const K_LENGTHS: [f64; 2] = [15.0, 50.0];
const K_FACTORS: [f64; 2] = [2.0, 1.4];

/// Upper limit of the effective slenderness
pub const MAX_SLENDERNESS: f64 = 70.0;

/// ψ_λ grid: slenderness (columns) × solidity ratio (rows)
const PSI_LAMBDA: [f64; 6] = [1.0, 5.0, 10.0, 20.0, 50.0, 70.0];
const PSI_PHI: [f64; 4] = [0.1, 0.5, 0.9, 1.0];
const PSI_TABLE: [[f64; 6]; 4] = [
    [0.96, 0.97, 0.98, 0.99, 1.00, 1.00],
    [0.80, 0.84, 0.88, 0.92, 0.96, 0.98],
    [0.68, 0.72, 0.76, 0.82, 0.89, 0.92],
    [0.60, 0.64, 0.68, 0.74, 0.85, 0.92],
];

/// `λ = min(k(L) · L / b, 70)` with `b` the section height or diameter.
pub fn slenderness(norm: Norm, section: Section<'_>, length: f64, protocol: &mut Protocol) -> CalcResult<f64> {
    let b = match section {
        Section::Truss(t) => t.section_height,
        Section::Pipe(p) => p.outer_diameter,
        Section::FlatPanel { .. } => {
            return Err(CalcError::not_implemented(norm.code(), "slenderness of a flat panel"))
        }
    };
    if !(length.is_finite() && length > 0.0) {
        return Err(CalcError::degenerate("slenderness", "member length is not positive"));
    }

    if length < K_LENGTHS[0] || length > K_LENGTHS[1] {
        protocol.hint(
            codes::SLENDERNESS_EXTRAPOLATED,
            format!(
                "Length {:.2} m is outside {}..{} m, length factor held at the table edge",
                length, K_LENGTHS[0], K_LENGTHS[1]
            ),
        );
    }
    let k = interpolate(&K_LENGTHS, &K_FACTORS, length);
    let raw = k * length / b;
    let lambda = if raw > MAX_SLENDERNESS {
        protocol.info(
            codes::SLENDERNESS_CAPPED,
            format!("Slenderness {:.1} capped at {}", raw, MAX_SLENDERNESS),
        );
        MAX_SLENDERNESS
    } else {
        raw
    };

    protocol.document(
        Formula::Slenderness
            .bundle(lambda)
            .with_sub_value(DocBundle::new("k", k))
            .with_sub_value(DocBundle::new("L", length).with_unit("m")),
    );
    Ok(lambda)
}

/// End-effect factor ψ_λ.
///
/// EN 13814 does not reduce for slenderness (ψ_λ = 1). Otherwise a bilinear
/// lookup over slenderness × solidity; inputs outside the grid are clamped.
pub fn slenderness_reduction(norm: Norm, lambda: f64, phi: f64, protocol: &mut Protocol) -> CalcResult<f64> {
    if lambda.is_nan() || phi.is_nan() {
        return Err(CalcError::out_of_domain("psi_lambda input", f64::NAN, "slenderness or solidity undefined"));
    }
    let psi = match norm {
        Norm::En13814 => 1.0,
        _ => {
            let rows: Vec<&[f64]> = PSI_TABLE.iter().map(|r| r.as_slice()).collect();
            let result = bilinear(&PSI_LAMBDA, &PSI_PHI, &rows, lambda, phi);
            if result.clamped {
                protocol.hint(
                    codes::REDUCTION_CLAMPED,
                    format!("lambda = {:.2}, phi = {:.3} outside the end-effect table, clamped", lambda, phi),
                );
            }
            result.value
        }
    };
    let source = match norm {
        Norm::En13814 => Source::En13814 { section: "force coefficients" },
        _ => Source::En1991 { section: "7.13, Figure 7.36" },
    };
    protocol.document(Formula::SlendernessReduction.bundle_cited(psi, &source));
    Ok(psi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Severity;
    use crate::catalog::Catalog;
    use approx::assert_relative_eq;

    #[test]
    fn test_length_factor_interpolation() {
        let cat = Catalog::builtin();
        let truss = cat.get_truss("F44").unwrap();
        let mut p = Protocol::new();
        // L = 20 m: k = 2.0 - 0.6 * 5/35
        let lambda = slenderness(Norm::En1991, Section::Truss(truss), 20.0, &mut p).unwrap();
        let k: f64 = 2.0 - 0.6 * 5.0 / 35.0;
        assert_relative_eq!(lambda, (k * 20.0 / 0.40).min(70.0), epsilon = 1e-12);
    }

    #[test]
    fn test_short_member_hints_and_caps() {
        let cat = Catalog::builtin();
        let pipe = cat.get_pipe("48.3x3.2").unwrap();
        let mut p = Protocol::new();
        let lambda = slenderness(Norm::En1991, Section::Pipe(pipe), 6.0, &mut p).unwrap();
        assert_eq!(lambda, MAX_SLENDERNESS);
        let found: Vec<&str> = p.messages().iter().map(|m| m.code.as_str()).collect();
        assert!(found.contains(&codes::SLENDERNESS_EXTRAPOLATED));
        assert!(found.contains(&codes::SLENDERNESS_CAPPED));
    }

    #[test]
    fn test_reduction_grid_points() {
        let mut p = Protocol::new();
        assert_relative_eq!(slenderness_reduction(Norm::En1991, 20.0, 0.5, &mut p).unwrap(), 0.92);
        assert_relative_eq!(slenderness_reduction(Norm::En17879, 70.0, 1.0, &mut p).unwrap(), 0.92);
        assert!(p.messages().is_empty());
    }

    #[test]
    fn test_reduction_clamped() {
        let mut p = Protocol::new();
        let psi = slenderness_reduction(Norm::En1991, 100.0, 0.05, &mut p).unwrap();
        assert_relative_eq!(psi, 1.0);
        assert_eq!(p.messages_at_least(Severity::Hint).len(), 1);
    }

    #[test]
    fn test_en13814_has_no_reduction() {
        let mut p = Protocol::new();
        assert_eq!(slenderness_reduction(Norm::En13814, 10.0, 0.3, &mut p).unwrap(), 1.0);
    }
}

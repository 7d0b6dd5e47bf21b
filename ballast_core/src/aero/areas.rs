//! Projected area, enclosed area and solidity ratio.

use super::Section;
use crate::audit::{codes, Formula, Protocol};
use crate::errors::{CalcError, CalcResult};

fn require_length(length: f64, operation: &str) -> CalcResult<()> {
    if !(length.is_finite() && length > 0.0) {
        return Err(CalcError::degenerate(operation, format!("member length {} is not positive", length)));
    }
    Ok(())
}

/// Area of the element projected onto a plane normal to the wind.
///
/// - pipe: `L · D`
/// - truss: `L · (2·d_chord + √2·d_diag)` (two chords and one diagonal run per face)
/// - flat panel: the polygon area
pub fn projected_area(section: Section<'_>, length: f64) -> CalcResult<f64> {
    match section {
        Section::FlatPanel { area } => {
            if !(area.is_finite() && area > 0.0) {
                return Err(CalcError::degenerate("projected_area", "panel has no area"));
            }
            Ok(area)
        }
        Section::Pipe(p) => {
            require_length(length, "projected_area")?;
            Ok(length * p.outer_diameter)
        }
        Section::Truss(t) => {
            require_length(length, "projected_area")?;
            Ok(length * (2.0 * t.chord_diameter + std::f64::consts::SQRT_2 * t.diagonal_diameter))
        }
    }
}

/// Outline area of the element face.
///
/// Pipes and panels are solid, so their enclosed area equals the projected area.
pub fn enclosed_area(section: Section<'_>, length: f64) -> CalcResult<f64> {
    match section {
        Section::Truss(t) => {
            require_length(length, "enclosed_area")?;
            Ok(length * t.section_height)
        }
        _ => projected_area(section, length),
    }
}

/// `φ = A / A_c`; values outside [0, 1] are reported but not clamped.
pub fn solidity_ratio(projected: f64, enclosed: f64, protocol: &mut Protocol) -> CalcResult<f64> {
    if !(enclosed.is_finite() && enclosed > 0.0) {
        return Err(CalcError::degenerate("solidity_ratio", "enclosed area is not positive"));
    }
    let phi = projected / enclosed;
    if !(0.0..=1.0).contains(&phi) {
        protocol.warn(
            codes::SOLIDITY_OUT_OF_RANGE,
            format!("Solidity ratio {:.3} is outside [0, 1]", phi),
        );
    }
    protocol.document(Formula::SolidityRatio.bundle(phi));
    Ok(phi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Severity;
    use crate::catalog::Catalog;
    use approx::assert_relative_eq;

    #[test]
    fn test_truss_areas() {
        let cat = Catalog::builtin();
        let truss = cat.get_truss("F34").unwrap();
        let a = projected_area(Section::Truss(truss), 2.0).unwrap();
        assert_relative_eq!(a, 2.0 * (0.1 + std::f64::consts::SQRT_2 * 0.02), epsilon = 1e-12);
        let ac = enclosed_area(Section::Truss(truss), 2.0).unwrap();
        assert_relative_eq!(ac, 0.58, epsilon = 1e-12);

        let mut p = Protocol::new();
        let phi = solidity_ratio(a, ac, &mut p).unwrap();
        assert!(phi > 0.0 && phi < 1.0);
        assert!(p.messages().is_empty());
    }

    #[test]
    fn test_pipe_is_solid() {
        let cat = Catalog::builtin();
        let pipe = cat.get_pipe("60.3x3.6").unwrap();
        let a = projected_area(Section::Pipe(pipe), 3.0).unwrap();
        let ac = enclosed_area(Section::Pipe(pipe), 3.0).unwrap();
        assert_eq!(a, ac);
    }

    #[test]
    fn test_zero_length_is_degenerate() {
        let cat = Catalog::builtin();
        let pipe = cat.get_pipe("60.3x3.6").unwrap();
        let err = projected_area(Section::Pipe(pipe), 0.0).unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn test_solidity_out_of_range_warns_without_clamping() {
        let mut p = Protocol::new();
        let phi = solidity_ratio(3.0, 2.0, &mut p).unwrap();
        assert_eq!(phi, 1.5);
        assert_eq!(p.messages_at_least(Severity::Warn).len(), 1);
    }
}

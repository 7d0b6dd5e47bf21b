//! Reynolds number.

use super::Section;
use crate::audit::{DocBundle, Formula, Protocol};
use crate::errors::{CalcError, CalcResult};
use crate::norms::Norm;
use crate::settings::PhysicalConstants;

/// `Re = b · v / ν` with `v = sqrt(2q / ρ)`.
///
/// `b` is the chord diameter of a truss or the outer diameter of a pipe.
/// Any non-positive input is outside the formula's domain.
pub fn reynolds_number(
    norm: Norm,
    section: Section<'_>,
    pressure: f64,
    constants: &PhysicalConstants,
    protocol: &mut Protocol,
) -> CalcResult<f64> {
    let b = match section {
        Section::Truss(t) => t.chord_diameter,
        Section::Pipe(p) => p.outer_diameter,
        Section::FlatPanel { .. } => {
            return Err(CalcError::not_implemented(norm.code(), "Reynolds number of a flat panel"))
        }
    };
    for (quantity, value) in [
        ("q", pressure),
        ("rho", constants.air_density),
        ("nu", constants.kinematic_viscosity),
        ("b", b),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(CalcError::out_of_domain(quantity, value, "Reynolds number needs positive inputs"));
        }
    }

    // Same velocity definition under every norm
    let v = (2.0 * pressure / constants.air_density).sqrt();
    let re = b * v / constants.kinematic_viscosity;

    protocol.document(
        Formula::ReynoldsNumber
            .bundle(re)
            .with_sub_value(DocBundle::new("b", b).with_unit("m"))
            .with_sub_value(DocBundle::new("q", pressure).with_unit("N/m^2")),
    );
    Ok(re)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_value() {
        let cat = Catalog::builtin();
        let pipe = cat.get_pipe("48.3x3.2").unwrap();
        let mut p = Protocol::new();
        // q = 800 N/m², rho = 1.25 → v = 35.78 m/s
        let re = reynolds_number(Norm::En1991, Section::Pipe(pipe), 800.0, &PhysicalConstants::default(), &mut p)
            .unwrap();
        let expected = 0.0483 * (1280.0f64).sqrt() / 15e-6;
        assert_relative_eq!(re, expected, max_relative = 1e-12);
        assert_eq!(p.docs().len(), 1);
    }

    #[test]
    fn test_non_positive_inputs() {
        let cat = Catalog::builtin();
        let truss = cat.get_truss("F34").unwrap();
        let mut p = Protocol::new();
        let err = reynolds_number(Norm::En13814, Section::Truss(truss), 0.0, &PhysicalConstants::default(), &mut p)
            .unwrap_err();
        assert!(err.is_data_error());

        let bad = PhysicalConstants {
            kinematic_viscosity: -1.0,
            ..PhysicalConstants::default()
        };
        assert!(reynolds_number(Norm::En1991, Section::Truss(truss), 500.0, &bad, &mut p).is_err());
    }

    #[test]
    fn test_panel_is_programmer_error() {
        let mut p = Protocol::new();
        let err = reynolds_number(
            Norm::En1991,
            Section::FlatPanel { area: 1.0 },
            500.0,
            &PhysicalConstants::default(),
            &mut p,
        )
        .unwrap_err();
        assert!(!err.is_data_error());
    }
}

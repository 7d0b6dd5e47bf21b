//! Bundled default catalog.

use super::{BasePlateSpec, Catalog, FrictionEntry, Material, PipeSpec, TrussSpec};
use crate::norms::Norm;

const STEEL_DENSITY: f64 = 7850.0;
const ALUMINIUM_DENSITY: f64 = 2700.0;

fn truss(name: &str, chord_count: u8, section_height: f64, linear_mass: f64) -> TrussSpec {
    TrussSpec {
        name: name.to_string(),
        chord_count,
        section_height,
        chord_diameter: 0.05,
        diagonal_diameter: 0.02,
        linear_mass,
    }
}

fn pipe(name: &str, outer_diameter: f64, wall_thickness: f64, density: f64) -> PipeSpec {
    PipeSpec {
        name: name.to_string(),
        outer_diameter,
        wall_thickness,
        density,
    }
}

fn plate(name: &str, length: f64, width: f64, mass: f64) -> BasePlateSpec {
    BasePlateSpec {
        name: name.to_string(),
        length,
        width,
        mass,
        material: Material::Steel,
    }
}

fn pair(norm: Norm, a: Material, b: Material, coefficient: f64, source: &str) -> FrictionEntry {
    FrictionEntry {
        norm,
        a,
        b,
        coefficient,
        source: source.to_string(),
    }
}

pub(super) fn catalog() -> Catalog {
    use Material::*;

    const EN13814: &str = "EN 13814-1, friction coefficients for ballast";
    const EN17879: &str = "EN 17879, friction coefficients";

    Catalog {
        trusses: vec![
            truss("F32", 2, 0.29, 3.6),
            truss("F33", 3, 0.29, 5.0),
            truss("F34", 4, 0.29, 6.5),
            truss("F44", 4, 0.40, 8.2),
        ],
        pipes: vec![
            pipe("48.3x3.2", 0.0483, 0.0032, STEEL_DENSITY),
            pipe("60.3x3.6", 0.0603, 0.0036, STEEL_DENSITY),
            pipe("50x4 Alu", 0.050, 0.004, ALUMINIUM_DENSITY),
        ],
        base_plates: vec![
            plate("BP-600x600", 0.6, 0.6, 30.0),
            plate("BP-800x400", 0.8, 0.4, 25.0),
            plate("BP-1000x1000", 1.0, 1.0, 78.5),
        ],
        friction: vec![
            pair(Norm::En13814, Steel, Steel, 0.15, EN13814),
            pair(Norm::En13814, Steel, Concrete, 0.30, EN13814),
            pair(Norm::En13814, Steel, Asphalt, 0.30, EN13814),
            pair(Norm::En13814, Steel, Timber, 0.40, EN13814),
            pair(Norm::En13814, Steel, Rubber, 0.50, EN13814),
            pair(Norm::En13814, Steel, Gravel, 0.35, EN13814),
            pair(Norm::En13814, Aluminium, Concrete, 0.30, EN13814),
            pair(Norm::En13814, Timber, Concrete, 0.50, EN13814),
            pair(Norm::En13814, Timber, Lawn, 0.40, EN13814),
            pair(Norm::En13814, Rubber, Concrete, 0.60, EN13814),
            pair(Norm::En13814, Rubber, Asphalt, 0.60, EN13814),
            pair(Norm::En17879, Steel, Steel, 0.10, EN17879),
            pair(Norm::En17879, Steel, Concrete, 0.25, EN17879),
            pair(Norm::En17879, Steel, Asphalt, 0.25, EN17879),
            pair(Norm::En17879, Steel, Timber, 0.40, EN17879),
            pair(Norm::En17879, Steel, Rubber, 0.50, EN17879),
            pair(Norm::En17879, Steel, Lawn, 0.30, EN17879),
            pair(Norm::En17879, Timber, Lawn, 0.50, EN17879),
            pair(Norm::En17879, Rubber, Concrete, 0.50, EN17879),
            pair(Norm::En17879, Rubber, Lawn, 0.40, EN17879),
        ],
    }
}

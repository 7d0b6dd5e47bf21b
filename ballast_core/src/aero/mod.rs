//! # Aerodynamic Coefficient Pipeline
//!
//! Norm-dispatched formulas turning a dynamic pressure and an element's
//! geometry into a wind force:
//!
//! ```text
//! Re ─┐
//! A, A_c → φ ─┼→ c_f0 ─┐
//! λ ──────────┴→ ψ_λ ──┴→ c_f → F = c_f · q · A → F⃗
//! ```
//!
//! ## Modules
//!
//! - [`reynolds`] - Reynolds number
//! - [`areas`] - Projected area, enclosed area, solidity ratio
//! - [`slenderness`] - Effective slenderness and the end-effect factor ψ_λ
//! - [`coefficients`] - Approach classification, base and final force coefficients
//! - [`wind_force`] - Scalar wind force and its direction
//!
//! Functions whose result differs between norms (Reynolds number, slenderness,
//! base coefficient, ψ_λ) take the [`Norm`] and dispatch with a `match`.
//! Areas, solidity and `c_f = c_f0 · ψ_λ` are the same under every norm and
//! take no norm. Data problems are returned as data errors; the
//! [`member_wind_force`] pipeline turns them into a logged message and `NaN`.

pub mod areas;
pub mod coefficients;
pub mod reynolds;
pub mod slenderness;
pub mod wind_force;

pub use areas::{enclosed_area, projected_area, solidity_ratio};
pub use coefficients::{base_force_coefficient, classify_approach, force_coefficient, Approach};
pub use reynolds::reynolds_number;
pub use slenderness::{slenderness, slenderness_reduction};
pub use wind_force::{wind_force, wind_force_vector};

use serde::{Deserialize, Serialize};

use crate::audit::{codes, DocBundle, Protocol};
use crate::catalog::{PipeSpec, TrussSpec};
use crate::errors::CalcResult;
use crate::geometry::{require_distinct, require_unit, Vec3};
use crate::norms::Norm;
use crate::settings::PhysicalConstants;

/// Aerodynamic object class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Truss,
    Pipe,
    FlatPanel,
}

impl ObjectType {
    pub fn code(&self) -> &'static str {
        match self {
            ObjectType::Truss => "truss",
            ObjectType::Pipe => "pipe",
            ObjectType::FlatPanel => "flat panel",
        }
    }
}

/// Cross-section data an element feeds into the pipeline.
#[derive(Debug, Clone, Copy)]
pub enum Section<'a> {
    Truss(&'a TrussSpec),
    Pipe(&'a PipeSpec),
    /// Flat panel with its polygon area (m²)
    FlatPanel { area: f64 },
}

impl Section<'_> {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Section::Truss(_) => ObjectType::Truss,
            Section::Pipe(_) => ObjectType::Pipe,
            Section::FlatPanel { .. } => ObjectType::FlatPanel,
        }
    }
}

/// Convert a data error into an error message plus `NaN`.
pub fn or_nan(protocol: &mut Protocol, result: CalcResult<f64>) -> CalcResult<f64> {
    protocol.recover(result, || f64::NAN)
}

/// One straight piece of an elongated member exposed to a single pressure.
#[derive(Debug, Clone, Copy)]
pub struct MemberSegment {
    pub start: Vec3,
    pub end: Vec3,
    /// Section reference direction (unit, normal to the member axis)
    pub reference: Vec3,
    /// Dynamic pressure on this piece (N/m²)
    pub pressure: f64,
}

/// Full pipeline for one segment of a truss or pipe.
///
/// Returns the force vector, or a `NaN` vector after logging when a data
/// problem makes the force undefined.
pub fn member_wind_force(
    norm: Norm,
    section: Section<'_>,
    segment: &MemberSegment,
    wind: &Vec3,
    constants: &PhysicalConstants,
    protocol: &mut Protocol,
) -> CalcResult<Vec3> {
    let nan = Vec3::repeat(f64::NAN);
    require_unit(wind, "wind")?;
    require_unit(&segment.reference, "reference")?;
    let distinct = require_distinct(&segment.start, &segment.end, "member_wind_force").map(|_| 0.0);
    if or_nan(protocol, distinct)?.is_nan() {
        return Ok(nan);
    }

    let axis_vec = segment.end - segment.start;
    let length = axis_vec.norm();
    let axis = axis_vec / length;
    let q = segment.pressure;

    let re = reynolds_number(norm, section, q, constants, protocol);
    let re = or_nan(protocol, re)?;
    let area = or_nan(protocol, projected_area(section, length))?;
    let enclosed = or_nan(protocol, enclosed_area(section, length))?;
    if re.is_nan() || area.is_nan() || enclosed.is_nan() {
        return Ok(nan);
    }

    let phi = solidity_ratio(area, enclosed, protocol);
    let phi = or_nan(protocol, phi)?;
    let lambda = slenderness(norm, section, length, protocol);
    let lambda = or_nan(protocol, lambda)?;
    if phi.is_nan() || lambda.is_nan() {
        return Ok(nan);
    }

    let cf0 = base_force_coefficient(norm, section, wind, &axis, &segment.reference, phi, re, protocol);
    let cf0 = or_nan(protocol, cf0)?;
    if cf0.is_nan() {
        protocol.warn(
            codes::AERO_COEFFICIENT_UNDEFINED,
            format!("No force coefficient for {} at Re = {:.3e}", section.object_type().code(), re),
        );
        return Ok(nan);
    }
    let psi = slenderness_reduction(norm, lambda, phi, protocol);
    let psi = or_nan(protocol, psi)?;
    let cf = force_coefficient(section, cf0, psi, protocol);
    if cf.is_nan() {
        return Ok(nan);
    }

    let force = wind_force(cf, q, area, protocol);
    let vector = wind_force_vector(section.object_type(), force, wind, &axis)?;
    protocol.document(
        DocBundle::new("Wind force vector", vector)
            .with_unit("N")
            .with_formula("F_vec = F_w * (w - (w . a) a)")
            .with_symbols(&["w", "a"]),
    );
    Ok(vector)
}

/// Pipeline for a flat panel: fixed coefficient, force along the panel normal.
pub fn panel_wind_force(
    norm: Norm,
    area: f64,
    normal: &Vec3,
    wind: &Vec3,
    pressure: f64,
    protocol: &mut Protocol,
) -> CalcResult<Vec3> {
    require_unit(wind, "wind")?;
    require_unit(normal, "normal")?;
    let section = Section::FlatPanel { area };
    let cf0 = base_force_coefficient(norm, section, wind, normal, normal, 1.0, 0.0, protocol)?;
    let cf = force_coefficient(section, cf0, 1.0, protocol);
    let force = wind_force(cf, pressure, area, protocol);
    wind_force_vector(ObjectType::FlatPanel, force, wind, normal)
}

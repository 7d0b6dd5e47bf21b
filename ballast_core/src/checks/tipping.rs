//! Tipping check.
//!
//! Candidate axes are the edges of the convex hull of all element corners.
//! For every direction and axis each load case is split into a tipping part
//! (`γ_unfav · max(M, 0)`) and a standing part (`γ_fav · max(−M, 0)`). Per
//! element the worst case of each load type is kept:
//!
//! - wind: largest tipping moment
//! - weight: largest tipping minus standing moment
//! - other: largest tipping moment
//!
//! The ratio of an axis is standing / tipping. A direction is governed by its
//! weakest axis and the check by its weakest direction.

use std::collections::BTreeMap;

use super::{case_factors, finish, finite_or_skip, pooled_loads, CheckContext, CheckKind, CheckOutcome, DirectionResult};
use crate::audit::{codes, DocBundle, Formula, Protocol};
use crate::construction::Construction;
use crate::elements::Element;
use crate::errors::CalcResult;
use crate::geometry::{convex_hull_xy, hull_axes, moment_about_axis, polygon_centroid, Axis, Vec3, EPS};
use crate::loads::{ElementLoads, LoadCase, LoadType};
use crate::safety_factors::GAMMA_FAVORABLE_PERMANENT;

/// Envelope candidate: one load case's moments.
#[derive(Debug, Clone, Copy)]
struct Envelope<'a> {
    key: f64,
    tipping: f64,
    standing: f64,
    label: &'a str,
}

/// (tipping, standing) moment of one load case about an axis.
fn case_moments(case: &LoadCase, axis: &Axis) -> (f64, f64) {
    let (unfavorable, favorable) = case_factors(case);
    case.moments_about(axis).fold((0.0, 0.0), |(tip, stand), m| {
        (tip + unfavorable * m.max(0.0), stand + favorable * (-m).max(0.0))
    })
}

/// Enveloped (tipping, standing) moment of all elements about one axis.
fn axis_moments(elements: &[Box<dyn Element>], loads: &ElementLoads, axis: &Axis, protocol: &mut Protocol) -> (f64, f64) {
    let mut total = (0.0, 0.0);
    for element in elements {
        let Some(cases) = loads.get(&element.id()) else {
            continue;
        };
        let mut envelopes: BTreeMap<&'static str, Envelope<'_>> = BTreeMap::new();
        for case in cases {
            let (tip, stand) = case_moments(case, axis);
            let (Some(tip), Some(stand)) = (
                finite_or_skip(tip, "tipping moment", protocol),
                finite_or_skip(stand, "standing moment", protocol),
            ) else {
                continue;
            };
            let (slot, key) = match case.load_type {
                LoadType::Wind => ("wind", tip),
                LoadType::Weight => ("weight", tip - stand),
                LoadType::Friction => ("other", tip),
            };
            let candidate = Envelope {
                key,
                tipping: tip,
                standing: stand,
                label: &case.label,
            };
            envelopes
                .entry(slot)
                .and_modify(|current| {
                    if candidate.key > current.key {
                        *current = candidate;
                    }
                })
                .or_insert(candidate);
        }
        for (slot, envelope) in envelopes {
            total.0 += envelope.tipping;
            total.1 += envelope.standing;
            protocol.decide_with(
                format!("{} envelope", slot),
                envelope.label,
                &[("axis", axis.label()), ("element", element.label().to_string())],
            );
        }
    }
    total
}

/// Run the tipping check.
pub fn check_tipping(construction: &mut dyn Construction, ctx: &CheckContext<'_>) -> CalcResult<CheckOutcome> {
    let kind = CheckKind::Tipping;
    let mut protocol = ctx.protocol(kind);
    construction.validate()?;
    let entries = pooled_loads(construction, ctx)?;
    let elements = construction.elements();

    let mut corners = Vec::new();
    for element in elements {
        if let Some(cornered) = element.as_cornered() {
            let points = cornered.corners(ctx.catalog);
            corners.extend(protocol.recover(points, Vec::new)?);
        }
    }
    let hull = protocol.recover(convex_hull_xy(&corners).map(Some), || None)?;
    let Some(hull) = hull else {
        return Ok(CheckOutcome::undefined(kind, protocol));
    };
    let axes = hull_axes(&hull)?;
    let centroid = polygon_centroid(&hull)?;

    let settings = ctx.settings;
    let unit_ballast = Vec3::new(0.0, 0.0, -settings.constants.gravity);
    let mut per_direction = Vec::with_capacity(entries.len());
    let mut trails = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(direction) = entry.direction else {
            continue;
        };
        let mut trail = protocol.child("wind_angle", direction.label());
        trail.merge_docs(entry.protocol);

        let mut governing: Option<(f64, String)> = None;
        let mut ballast_kg: f64 = 0.0;
        for axis in &axes {
            let (tipping, standing) = axis_moments(elements, &entry.loads, axis, &mut trail);
            let ratio = if tipping <= EPS { f64::INFINITY } else { standing / tipping };
            let per_kg = GAMMA_FAVORABLE_PERMANENT * (-moment_about_axis(axis, &centroid, &unit_ballast)).max(0.0);
            let deficit = (settings.required_safety * tipping - standing).max(0.0);
            let axis_ballast = if deficit <= 0.0 {
                0.0
            } else if per_kg > EPS {
                deficit / (per_kg * settings.ballast_safety_factor)
            } else {
                f64::INFINITY
            };
            ballast_kg = ballast_kg.max(axis_ballast);

            let label = axis.label();
            trail.document(Formula::TippingMoment.bundle(tipping).with_context("axis", label.clone()));
            trail.document(Formula::StandingMoment.bundle(standing).with_context("axis", label.clone()));
            trail.document(
                Formula::TippingSafety
                    .bundle(ratio)
                    .with_context("axis", label.clone())
                    .with_sub_value(DocBundle::new("m_1", per_kg).with_unit("Nm/kg")),
            );
            if governing.as_ref().map_or(true, |(best, _)| ratio < *best) {
                governing = Some((ratio, label));
            }
        }

        let (ratio, axis) = governing.unwrap_or((f64::INFINITY, String::new()));
        if ratio.is_infinite() {
            trail.info(codes::NO_TIPPING_MOMENT, "No tipping moment about any axis");
        }
        trail.decide("governing_axis", axis.clone());
        per_direction.push(DirectionResult {
            angle_deg: direction.angle_deg,
            ratio,
            ballast_kg,
            axis: Some(axis),
        });
        trails.push(trail);
    }

    Ok(finish(kind, per_direction, trails, protocol, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Material};
    use crate::construction::Assembly;
    use crate::elements::{BasePlate, PipeElement};
    use crate::loads::{LoadCase, Variability, WindDirections};
    use crate::norms::Norm;
    use crate::settings::AnalysisSettings;
    use crate::wind_profile::primary_scenario;
    use approx::assert_relative_eq;

    fn square_axis() -> Axis {
        // Edge from (2,0) to (2,2) of a counter-clockwise 2 x 2 square
        Axis::from_edge(1, Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 0.0)).unwrap()
    }

    #[test]
    fn test_case_moments_split_by_sign() {
        let axis = square_axis();
        let wind = LoadCase::point(
            "wind",
            LoadType::Wind,
            Variability::Variable,
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 2.0),
        )
        .unwrap();
        let (tip, stand) = case_moments(&wind, &axis);
        assert_relative_eq!(tip, 1.2 * 200.0, epsilon = 1e-9);
        assert_eq!(stand, 0.0);

        let weight = LoadCase::point(
            "weight",
            LoadType::Weight,
            Variability::Permanent,
            Vec3::new(0.0, 0.0, -1000.0),
            Vec3::new(1.0, 1.0, 0.5),
        )
        .unwrap();
        let (tip, stand) = case_moments(&weight, &axis);
        assert_eq!(tip, 0.0);
        assert_relative_eq!(stand, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gate_tipping_uses_pool_and_reports_axis() {
        let mut gate = Assembly::new("Gate")
            .with(BasePlate::new("BP left", "BP-600x600", Vec3::zeros(), Material::Concrete))
            .with(BasePlate::new("BP right", "BP-600x600", Vec3::new(4.0, 0.0, 0.0), Material::Concrete))
            .with(PipeElement::new("Post left", "60.3x3.6", Vec3::zeros(), Vec3::new(0.0, 0.0, 3.0)))
            .with(PipeElement::new("Post right", "60.3x3.6", Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 3.0)));
        let settings = AnalysisSettings {
            wind_directions: WindDirections::Count(8),
            ..AnalysisSettings::default()
        };
        let scenario = primary_scenario(Norm::En13814, &settings, 3.0).unwrap();
        let catalog = Catalog::builtin();
        let ctx = CheckContext {
            norm: Norm::En13814,
            scenario: &scenario,
            settings: &settings,
            catalog: &catalog,
            reset: false,
        };

        let first = check_tipping(&mut gate, &ctx).unwrap();
        assert_eq!(first.per_direction.len(), 8);
        assert!(first.ratio.is_finite() && first.ratio > 0.0);
        assert!(first.governing_axis.is_some());
        assert_eq!(gate.pool().len(), 8);

        let second = check_tipping(&mut gate, &ctx).unwrap();
        assert_eq!(second.ratio, first.ratio);
        assert_eq!(gate.pool().stats(), (8, 8));
    }

    #[test]
    fn test_no_footprint_is_undefined() {
        let mut post = Assembly::new("Post")
            .with(PipeElement::new("Post", "60.3x3.6", Vec3::zeros(), Vec3::new(0.0, 0.0, 3.0)));
        let settings = AnalysisSettings::default();
        let scenario = primary_scenario(Norm::En1991, &settings, 3.0).unwrap();
        let catalog = Catalog::builtin();
        let ctx = CheckContext {
            norm: Norm::En1991,
            scenario: &scenario,
            settings: &settings,
            catalog: &catalog,
            reset: true,
        };
        let out = check_tipping(&mut post, &ctx).unwrap();
        assert!(out.ratio.is_nan());
        assert!(out.protocol.has_errors());
    }
}

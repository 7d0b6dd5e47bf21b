//! Sliding check.
//!
//! Resistance is `μ_min · max(N, 0)` with `μ_min` the weakest friction contact
//! and `N` the favorable downward weight minus the unfavorable uplift. Demand
//! is the magnitude of the summed per-element wind envelopes. A contact whose
//! friction is undefined leaves the whole check undefined.

use super::{case_factors, finish, finite_or_skip, pooled_loads, CheckContext, CheckKind, CheckOutcome, DirectionResult};
use crate::audit::{codes, DocBundle, Formula, Protocol};
use crate::construction::Construction;
use crate::elements::Element;
use crate::errors::CalcResult;
use crate::geometry::{Vec3, EPS};
use crate::loads::{ElementLoads, LoadType};

/// Enveloped vertical forces of all elements for one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct VerticalEnvelope {
    /// Favorable downward force (N)
    pub downward: f64,
    /// Unfavorable upward force (N)
    pub upward: f64,
}

/// Per element: the largest factored uplift of any case and the smallest
/// factored downward force among weight cases, summed over elements.
pub(crate) fn vertical_envelope(
    elements: &[Box<dyn Element>],
    loads: &ElementLoads,
    protocol: &mut Protocol,
) -> VerticalEnvelope {
    let mut total = VerticalEnvelope::default();
    for element in elements {
        let Some(cases) = loads.get(&element.id()) else {
            continue;
        };
        let mut upward: f64 = 0.0;
        let mut downward: Option<f64> = None;
        for case in cases {
            let (unfavorable, favorable) = case_factors(case);
            if let Some(up) = finite_or_skip(unfavorable * case.upward(), "uplift", protocol) {
                upward = upward.max(up);
            }
            if case.load_type == LoadType::Weight {
                if let Some(down) = finite_or_skip(favorable * case.downward(), "downward force", protocol) {
                    downward = Some(downward.map_or(down, |d| d.min(down)));
                }
            }
        }
        total.upward += upward;
        total.downward += downward.unwrap_or(0.0);
    }
    total
}

/// Factored horizontal wind force: per element the wind case with the
/// largest horizontal magnitude, summed as vectors.
fn horizontal_envelope(elements: &[Box<dyn Element>], loads: &ElementLoads, protocol: &mut Protocol) -> Vec3 {
    let mut total = Vec3::zeros();
    for element in elements {
        let Some(cases) = loads.get(&element.id()) else {
            continue;
        };
        let governing = cases
            .iter()
            .filter(|c| c.load_type == LoadType::Wind)
            .filter(|c| finite_or_skip(c.horizontal_magnitude(), "horizontal force", protocol).is_some())
            .max_by(|a, b| a.horizontal_magnitude().total_cmp(&b.horizontal_magnitude()));
        if let Some(case) = governing {
            let (unfavorable, _) = case_factors(case);
            let r = case.resultant();
            total += Vec3::new(r.x, r.y, 0.0) * unfavorable;
            protocol.decide_with("wind envelope", case.label.clone(), &[("element", element.label().to_string())]);
        }
    }
    total
}

/// Run the sliding check.
pub fn check_sliding(construction: &mut dyn Construction, ctx: &CheckContext<'_>) -> CalcResult<CheckOutcome> {
    let kind = CheckKind::Sliding;
    let mut protocol = ctx.protocol(kind);
    construction.validate()?;
    let entries = pooled_loads(construction, ctx)?;
    let elements = construction.elements();

    let mut contacts = 0;
    let mut undefined = false;
    let mut mu = f64::INFINITY;
    for element in elements {
        let Some(contact) = element.as_friction_bearing() else {
            continue;
        };
        contacts += 1;
        let mut contact_protocol = protocol.child("element", element.label());
        let value = contact.effective_friction(ctx.norm, ctx.catalog, &mut contact_protocol);
        let value = contact_protocol.recover(value, || f64::NAN)?;
        protocol.merge(contact_protocol);
        if value.is_nan() {
            undefined = true;
        } else {
            mu = mu.min(value);
        }
    }
    if contacts == 0 {
        protocol.error(codes::NO_BASE_PLATES, "No friction contacts, sliding resistance undefined");
        return Ok(CheckOutcome::undefined(kind, protocol));
    }
    if undefined || !(mu.is_finite() && mu > 0.0) {
        return Ok(CheckOutcome::undefined(kind, protocol));
    }
    protocol.document(Formula::FrictionCoefficient.bundle(mu).with_context("contact", "minimum"));

    let settings = ctx.settings;
    let gravity = settings.constants.gravity;
    let mut per_direction = Vec::with_capacity(entries.len());
    let mut trails = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(direction) = entry.direction else {
            continue;
        };
        let mut trail = protocol.child("wind_angle", direction.label());
        trail.merge_docs(entry.protocol);

        let horizontal = horizontal_envelope(elements, &entry.loads, &mut trail).norm();
        let vertical = vertical_envelope(elements, &entry.loads, &mut trail);
        let normal = vertical.downward - vertical.upward;
        let ratio = if horizontal <= EPS {
            trail.info(codes::NO_HORIZONTAL_FORCE, "No horizontal force");
            f64::INFINITY
        } else {
            mu * normal.max(0.0) / horizontal
        };
        let ballast_kg = if horizontal <= EPS {
            0.0
        } else {
            (settings.required_safety * horizontal / mu - normal).max(0.0) / (gravity * settings.ballast_safety_factor)
        };

        trail.document(
            Formula::SlidingSafety
                .bundle(ratio)
                .with_sub_value(DocBundle::new("mu", mu))
                .with_sub_value(DocBundle::new("N", normal).with_unit("N"))
                .with_sub_value(DocBundle::new("H", horizontal).with_unit("N")),
        );
        per_direction.push(DirectionResult {
            angle_deg: direction.angle_deg,
            ratio,
            ballast_kg,
            axis: None,
        });
        trails.push(trail);
    }

    Ok(finish(kind, per_direction, trails, protocol, settings))
}

//! Load generation for one wind direction.
//!
//! Two passes over the elements:
//!
//! 1. weight and wind records of every element
//! 2. friction records of the base plates, from the loads of pass 1
//!
//! The construction's total downward load and total horizontal load are
//! shared equally among the friction contacts. Each contact's friction
//! opposes its horizontal share, is limited to `μ·N`, and is split into the
//! components along and across the plate's long edge.

use std::collections::BTreeMap;

use uuid::Uuid;

use super::directions::WindDirection;
use super::{LoadCase, LoadType, Variability};
use crate::audit::{codes, DocBundle, Formula, Protocol};
use crate::catalog::Catalog;
use crate::elements::{Element, WindInput};
use crate::errors::CalcResult;
use crate::geometry::{Vec3, EPS};
use crate::norms::Norm;
use crate::settings::PhysicalConstants;
use crate::wind_profile::Scenario;

/// Load records per element id.
pub type ElementLoads = BTreeMap<Uuid, Vec<LoadCase>>;

/// Inputs shared by every element of one generation run.
#[derive(Debug, Clone, Copy)]
pub struct LoadContext<'a> {
    pub norm: Norm,
    pub scenario: &'a Scenario,
    pub constants: &'a PhysicalConstants,
    pub catalog: &'a Catalog,
}

impl LoadContext<'_> {
    /// Key of everything the generated loads depend on besides the
    /// elements: scenario, physical constants and catalog content.
    pub fn fingerprint(&self) -> CalcResult<String> {
        let c = self.constants;
        Ok(format!(
            "{}|g={:016x},rho={:016x},nu={:016x}|catalog={:016x}",
            self.scenario.fingerprint(),
            c.gravity.to_bits(),
            c.air_density.to_bits(),
            c.kinematic_viscosity.to_bits(),
            self.catalog.fingerprint()?
        ))
    }
}

/// Generate the load records of all elements for one wind direction.
///
/// Data problems of single elements are logged and leave that element's
/// list short; programmer errors abort.
pub fn generate_direction_loads(
    elements: &[Box<dyn Element>],
    direction: &WindDirection,
    ctx: &LoadContext<'_>,
    protocol: &mut Protocol,
) -> CalcResult<ElementLoads> {
    let mut loads = ElementLoads::new();
    let input = WindInput {
        norm: ctx.norm,
        direction,
        profile: &ctx.scenario.profile,
        constants: ctx.constants,
        catalog: ctx.catalog,
    };

    for element in elements {
        let mut element_protocol = protocol.child("element", element.label());
        let mut cases = Vec::new();
        if let Some(weight) = element.as_weight_bearing() {
            let generated = weight.weight_loads(ctx.constants, ctx.catalog);
            cases.extend(element_protocol.recover(generated, Vec::new)?);
        }
        if let Some(wind) = element.as_wind_loaded() {
            let generated = wind.wind_loads(&input, &mut element_protocol);
            cases.extend(element_protocol.recover(generated, Vec::new)?);
        }
        protocol.merge(element_protocol);
        loads.insert(element.id(), cases);
    }

    add_friction_loads(elements, &mut loads, ctx, protocol)?;
    Ok(loads)
}

fn add_friction_loads(
    elements: &[Box<dyn Element>],
    loads: &mut ElementLoads,
    ctx: &LoadContext<'_>,
    protocol: &mut Protocol,
) -> CalcResult<()> {
    let contacts: Vec<&dyn Element> = elements
        .iter()
        .filter(|e| e.as_friction_bearing().is_some())
        .map(|e| e.as_ref())
        .collect();
    if contacts.is_empty() {
        protocol.info(codes::NO_BASE_PLATES, "No friction contacts, friction loads skipped");
        return Ok(());
    }

    let all_cases = loads.values().flatten();
    let (downward, horizontal) = all_cases.fold((0.0, Vec3::zeros()), |(down, hor), case| {
        let r = case.resultant();
        (down + case.downward(), hor + Vec3::new(r.x, r.y, 0.0))
    });
    let share = contacts.len() as f64;
    let normal_share = downward / share;
    let horizontal_share = horizontal / share;
    if horizontal_share.norm() < EPS {
        return Ok(());
    }

    for element in contacts {
        let Some(contact) = element.as_friction_bearing() else {
            continue;
        };
        let mut contact_protocol = protocol.child("element", element.label());
        let mu = contact.effective_friction(ctx.norm, ctx.catalog, &mut contact_protocol);
        let mu = contact_protocol.recover(mu, || f64::NAN)?;
        if mu.is_nan() {
            protocol.merge(contact_protocol);
            continue;
        }

        let limit = mu * normal_share.max(0.0);
        let magnitude = horizontal_share.norm().min(limit);
        let friction = -horizontal_share.normalize() * magnitude;
        let edge = contact.long_edge();
        let along = edge * friction.dot(&edge);
        let across = friction - along;
        contact_protocol.document(
            Formula::FrictionForce
                .bundle(magnitude)
                .with_sub_value(DocBundle::new("mu", mu))
                .with_sub_value(DocBundle::new("N", normal_share).with_unit("N"))
                .with_sub_value(DocBundle::new("H", horizontal_share.norm()).with_unit("N")),
        );
        let point = contact.contact_point();
        let case = LoadCase::new(
            format!("Friction {}", element.label()),
            LoadType::Friction,
            Variability::Variable,
            vec![along, across],
            vec![vec![point], vec![point]],
            None,
        )?;
        protocol.merge(contact_protocol);
        loads.entry(element.id()).or_default().push(case);
    }
    Ok(())
}

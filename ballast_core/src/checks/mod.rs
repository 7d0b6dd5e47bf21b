//! # Stability Checks
//!
//! Tipping, sliding and lift-off. Every check scans the wind directions of the
//! settings, takes the loads of each direction from the construction's
//! [`LoadPool`](crate::loads::LoadPool), envelopes the load cases per element
//! and keeps the direction with the lowest safety ratio.
//!
//! The audit trail of the governing direction is kept in full and tagged
//! [`Role::Relevant`]. The runner-up keeps its documentation tagged
//! [`Role::DecisionRelevant`] and its error messages. All other directions
//! keep their documentation tagged [`Role::Irrelevant`] and their error
//! messages.
//!
//! A check takes only the documentation of the pooled load generation into
//! its trails. Messages logged while generating loads stay on the
//! [`PoolEntry`]; the orchestrator merges them once per scenario.

pub mod lift_off;
pub mod sliding;
pub mod tipping;

pub use lift_off::check_lift_off;
pub use sliding::check_sliding;
pub use tipping::check_tipping;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audit::{codes, Formula, Message, Protocol, Role, Severity, Source};
use crate::catalog::Catalog;
use crate::construction::Construction;
use crate::errors::CalcResult;
use crate::loads::{generate_direction_loads, LoadCase, LoadContext, PoolEntry};
use crate::norms::Norm;
use crate::safety_factors::partial_safety_factor;
use crate::settings::AnalysisSettings;
use crate::wind_profile::Scenario;

/// The three stability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckKind {
    Tipping,
    Sliding,
    LiftOff,
}

impl CheckKind {
    pub const ALL: [CheckKind; 3] = [CheckKind::Tipping, CheckKind::Sliding, CheckKind::LiftOff];

    pub fn code(&self) -> &'static str {
        match self {
            CheckKind::Tipping => "tipping",
            CheckKind::Sliding => "sliding",
            CheckKind::LiftOff => "lift_off",
        }
    }

    pub fn safety_formula(&self) -> Formula {
        match self {
            CheckKind::Tipping => Formula::TippingSafety,
            CheckKind::Sliding => Formula::SlidingSafety,
            CheckKind::LiftOff => Formula::LiftOffSafety,
        }
    }

    pub fn ballast_formula(&self) -> Formula {
        match self {
            CheckKind::Tipping => Formula::TippingBallast,
            CheckKind::Sliding => Formula::SlidingBallast,
            CheckKind::LiftOff => Formula::LiftOffBallast,
        }
    }

    /// Where the verification format comes from under a norm.
    pub fn source(&self, norm: Norm) -> Source {
        let section = match self {
            CheckKind::Tipping => "stability against overturning",
            CheckKind::Sliding => "safety against sliding",
            CheckKind::LiftOff => "safety against lifting",
        };
        match norm {
            Norm::En13814 => Source::En13814 { section },
            Norm::En17879 => Source::En17879 { section },
            Norm::En1991 => Source::Mechanics,
        }
    }
}

/// Inputs of one check run.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub norm: Norm,
    pub scenario: &'a Scenario,
    pub settings: &'a AnalysisSettings,
    pub catalog: &'a Catalog,
    /// Discard cached loads before the run
    pub reset: bool,
}

impl CheckContext<'_> {
    /// Fresh protocol scoped to this norm, scenario and check.
    pub fn protocol(&self, kind: CheckKind) -> Protocol {
        Protocol::new()
            .with("norm", self.norm.code())
            .with("scenario", self.scenario.label.clone())
            .with("check", kind.code())
    }
}

/// Governing values of one wind direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionResult {
    pub angle_deg: f64,
    pub ratio: f64,
    pub ballast_kg: f64,
    /// Governing tipping axis
    pub axis: Option<String>,
}

/// Result of one check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub check: CheckKind,
    /// Governing (minimum) safety ratio, `inf` without demand, `NaN` if undefined
    pub ratio: f64,
    /// Required ballast (kg)
    pub ballast_kg: f64,
    pub governing_angle: Option<f64>,
    pub governing_axis: Option<String>,
    pub per_direction: Vec<DirectionResult>,
    #[serde(skip)]
    pub protocol: Protocol,
}

impl CheckOutcome {
    /// Outcome of a check that could not be evaluated; the reason is in `protocol`.
    pub fn undefined(check: CheckKind, protocol: Protocol) -> Self {
        CheckOutcome {
            check,
            ratio: f64::NAN,
            ballast_kg: f64::NAN,
            governing_angle: None,
            governing_axis: None,
            per_direction: Vec::new(),
            protocol,
        }
    }

    /// Whether the ratio reaches `required`. An undefined ratio never does.
    pub fn is_sufficient(&self, required: f64) -> bool {
        self.ratio >= required
    }

    /// Report projection.
    pub fn safety_value(&self, norm: Norm) -> SafetyValue {
        let meta = self.check.safety_formula().metadata();
        SafetyValue {
            ratio: self.ratio,
            ballast_kg: self.ballast_kg,
            method: format!("{}: {}", meta.title, meta.formula),
            source: self.check.source(norm).citation(),
            governing_angle: self.governing_angle,
            governing_axis: self.governing_axis.clone(),
            messages: self.protocol.messages_at_least(Severity::Warn),
        }
    }
}

/// A safety ratio as reported per norm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyValue {
    pub ratio: f64,
    pub ballast_kg: f64,
    pub method: String,
    pub source: String,
    pub governing_angle: Option<f64>,
    pub governing_axis: Option<String>,
    pub messages: Vec<Message>,
}

/// Loads of every configured direction, from the pool or freshly generated.
pub(crate) fn pooled_loads(construction: &mut dyn Construction, ctx: &CheckContext<'_>) -> CalcResult<Vec<PoolEntry>> {
    let directions = ctx.settings.wind_directions.generate()?;
    let load_ctx = LoadContext {
        norm: ctx.norm,
        scenario: ctx.scenario,
        constants: &ctx.settings.constants,
        catalog: ctx.catalog,
    };
    let (elements, pool) = construction.parts_mut();
    pool.prepare(&load_ctx.fingerprint()?, ctx.reset);
    directions
        .iter()
        .map(|direction| {
            pool.get_or_generate(direction, |dir| {
                let mut protocol = Protocol::new()
                    .with("norm", ctx.norm.code())
                    .with("scenario", ctx.scenario.label.clone())
                    .with("wind_angle", dir.label());
                let loads = generate_direction_loads(elements, dir, &load_ctx, &mut protocol)?;
                Ok(PoolEntry {
                    direction: Some(*dir),
                    loads,
                    protocol,
                })
            })
            .cloned()
        })
        .collect()
}

/// Partial-factor-weighted (unfavorable, favorable) multiplier pair of a case.
pub(crate) fn case_factors(case: &LoadCase) -> (f64, f64) {
    (
        partial_safety_factor(case.load_type, case.variability, false),
        partial_safety_factor(case.load_type, case.variability, true),
    )
}

/// Keep a value if finite, otherwise log that it was skipped.
pub(crate) fn finite_or_skip(value: f64, what: &str, protocol: &mut Protocol) -> Option<f64> {
    if value.is_finite() {
        Some(value)
    } else {
        protocol.warn(codes::NON_FINITE_SKIPPED, format!("Non-finite {} skipped", what));
        None
    }
}

/// Rank directions, merge their trails and derive the governing values.
pub(crate) fn finish(
    check: CheckKind,
    per_direction: Vec<DirectionResult>,
    trails: Vec<Protocol>,
    mut protocol: Protocol,
    settings: &AnalysisSettings,
) -> CheckOutcome {
    let mut order: Vec<usize> = (0..per_direction.len()).collect();
    order.sort_by(|&a, &b| per_direction[a].ratio.total_cmp(&per_direction[b].ratio));
    let mut rank = vec![0; per_direction.len()];
    for (position, &index) in order.iter().enumerate() {
        rank[index] = position;
    }
    for (index, mut trail) in trails.into_iter().enumerate() {
        if let Some(direction) = per_direction.get(index) {
            trail.info(
                codes::CHECK_DIRECTION,
                format!(
                    "{} at {:.1} deg: ratio {:.3}, ballast {:.1} kg",
                    check.code(),
                    direction.angle_deg,
                    direction.ratio,
                    direction.ballast_kg
                ),
            );
        }
        match rank.get(index) {
            Some(0) => protocol.merge_tagged(trail, Role::Relevant, true),
            Some(1) => protocol.merge_tagged(trail, Role::DecisionRelevant, false),
            _ => protocol.merge_tagged(trail, Role::Irrelevant, false),
        }
    }

    let Some(winner) = order.first().map(|&i| &per_direction[i]) else {
        return CheckOutcome::undefined(check, protocol);
    };
    let ratio = winner.ratio;
    let ballast_kg = per_direction.iter().map(|d| d.ballast_kg).fold(0.0, f64::max);
    let governing_angle = Some(winner.angle_deg);
    let governing_axis = winner.axis.clone();

    protocol.decide("governing_direction", format!("{:.1}", winner.angle_deg));
    if let Some(axis) = &governing_axis {
        protocol.decide("governing_axis", axis.clone());
    }
    protocol.document(check.safety_formula().bundle(ratio).with_role(Role::Relevant));
    protocol.document(check.ballast_formula().bundle(ballast_kg).with_role(Role::Relevant));
    if !(ratio >= settings.required_safety) {
        protocol.warn(
            codes::SAFETY_BELOW_REQUIRED,
            format!(
                "{} safety {:.3} below {} (wind {:.1} deg)",
                check.code(),
                ratio,
                settings.required_safety,
                winner.angle_deg
            ),
        );
    }
    if ballast_kg > 0.0 {
        protocol.info(
            codes::BALLAST_REQUIRED,
            format!("{} requires {:.1} kg ballast", check.code(), ballast_kg),
        );
    }
    debug!(check = check.code(), ratio, angle = winner.angle_deg, "Governing direction");

    CheckOutcome {
        check,
        ratio,
        ballast_kg,
        governing_angle,
        governing_axis,
        per_direction,
        protocol,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Severity;

    fn direction(angle: f64, ratio: f64, ballast: f64) -> DirectionResult {
        DirectionResult {
            angle_deg: angle,
            ratio,
            ballast_kg: ballast,
            axis: None,
        }
    }

    fn trail(angle: f64) -> Protocol {
        let mut p = Protocol::new().with("wind_angle", angle.to_string());
        p.document(Formula::TippingMoment.bundle(1.0));
        p.warn("W", "warning");
        p.error("E", "error");
        p
    }

    #[test]
    fn test_finish_selects_minimum_and_tags_roles() {
        let dirs = vec![direction(0.0, 2.0, 0.0), direction(90.0, 0.5, 40.0), direction(180.0, 1.5, 10.0)];
        let trails = vec![trail(0.0), trail(90.0), trail(180.0)];
        let out = finish(CheckKind::Tipping, dirs, trails, Protocol::new(), &AnalysisSettings::default());

        assert_eq!(out.ratio, 0.5);
        assert_eq!(out.ballast_kg, 40.0);
        assert_eq!(out.governing_angle, Some(90.0));

        let p = &out.protocol;
        let relevant = p.docs().iter().filter(|d| d.role == Some(Role::Relevant)).count();
        let runner_up = p.docs().iter().filter(|d| d.role == Some(Role::DecisionRelevant)).count();
        let losers = p.docs().iter().filter(|d| d.role == Some(Role::Irrelevant)).count();
        // Winner's bundle plus the two summary bundles; runner-up (1.5 at 180 deg)
        assert_eq!(relevant, 3);
        assert_eq!(runner_up, 1);
        assert_eq!(losers, 1);
        // Only the winner keeps its per-direction summary
        let summaries: Vec<_> = p.messages().iter().filter(|m| m.code == codes::CHECK_DIRECTION).collect();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].text.contains("90.0 deg"));
        assert_eq!(p.messages().iter().filter(|m| m.code == "E").count(), 3);
        assert_eq!(p.messages().iter().filter(|m| m.code == "W").count(), 1);
        assert!(p.messages_at_least(Severity::Warn).iter().any(|m| m.code == codes::SAFETY_BELOW_REQUIRED));
        assert_eq!(p.decision("governing_direction").map(|d| d.value.as_str()), Some("90.0"));
    }

    #[test]
    fn test_undefined_ratio_is_never_sufficient() {
        let out = CheckOutcome::undefined(CheckKind::Sliding, Protocol::new());
        assert!(!out.is_sufficient(1.0));
        assert!(out.ratio.is_nan());
    }
}

//! # Stability Analysis
//!
//! Runs tipping, sliding and lift-off for every configured norm and collects
//! the results into one [`StabilityReport`].
//!
//! Per norm:
//!
//! 1. derive the primary wind scenario; a construction taller than the
//!    norm's table makes the norm [`NormStatus::NotApplicable`]
//! 2. run the three checks, sharing the construction's load pool
//! 3. if any ratio falls below the required safety, evaluate the norm's
//!    fallback scenario and report it under `alternatives`; a failing
//!    fallback keeps the primary values and marks the norm as an error
//!
//! A failure inside one norm never aborts the others; it turns into that
//! norm's [`NormStatus::Error`] with the reason in `messages`.
//!
//! ## Example
//!
//! ```rust
//! use ballast_core::catalog::{Catalog, Material};
//! use ballast_core::construction::Assembly;
//! use ballast_core::elements::{BasePlate, PipeElement};
//! use ballast_core::geometry::Vec3;
//! use ballast_core::orchestrator::analyze_with_catalog;
//! use ballast_core::settings::AnalysisSettings;
//!
//! let mut post = Assembly::new("Flag post")
//!     .with(BasePlate::new("Plate", "BP-1000x1000", Vec3::zeros(), Material::Concrete))
//!     .with(PipeElement::new("Post", "60.3x3.6", Vec3::zeros(), Vec3::new(0.0, 0.0, 3.0)));
//!
//! let report = analyze_with_catalog(&mut post, &AnalysisSettings::default(), &Catalog::builtin()).unwrap();
//! assert_eq!(report.results.len(), 3);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::audit::{codes, DocEntry, Message, Protocol, Severity};
use crate::catalog::{self, Catalog};
use crate::checks::{check_lift_off, check_sliding, check_tipping, CheckContext, CheckOutcome, SafetyValue};
use crate::construction::Construction;
use crate::errors::{CalcError, CalcResult};
use crate::norms::Norm;
use crate::settings::AnalysisSettings;
use crate::wind_profile::{fallback_scenario, primary_scenario, Scenario};

/// Messages kept per norm in the report
const MAX_REPORTED_MESSAGES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NormStatus {
    Calculated,
    NotApplicable,
    Error,
}

/// The three checks under one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub tipping: SafetyValue,
    pub sliding: SafetyValue,
    pub lift_off: SafetyValue,
    /// Largest ballast of the three checks (kg)
    pub max_ballast_kg: f64,
    #[serde(skip)]
    pub protocol: Protocol,
}

impl ScenarioResult {
    /// Smallest of the three ratios, `NaN` if any is undefined.
    pub fn min_ratio(&self) -> f64 {
        [self.tipping.ratio, self.sliding.ratio, self.lift_off.ratio]
            .into_iter()
            .fold(f64::INFINITY, |acc, r| if r.is_nan() || acc.is_nan() { f64::NAN } else { acc.min(r) })
    }
}

/// Result of one norm.
#[derive(Debug, Clone, Serialize)]
pub struct NormResult {
    pub status: NormStatus,
    pub scenario: Option<String>,
    pub messages: Vec<Message>,
    pub tipping: Option<SafetyValue>,
    pub sliding: Option<SafetyValue>,
    pub lift_off: Option<SafetyValue>,
    pub max_ballast_kg: Option<f64>,
    /// Fallback scenarios keyed by label
    pub alternatives: BTreeMap<String, ScenarioResult>,
    pub docs: Vec<DocEntry>,
}

impl NormResult {
    fn without_values(status: NormStatus, protocol: &Protocol) -> Self {
        NormResult {
            status,
            scenario: None,
            messages: bounded(protocol.messages()),
            tipping: None,
            sliding: None,
            lift_off: None,
            max_ballast_kg: None,
            alternatives: BTreeMap::new(),
            docs: Vec::new(),
        }
    }
}

/// Complete multi-norm result.
#[derive(Debug, Clone, Serialize)]
pub struct StabilityReport {
    pub calculated_at: DateTime<Utc>,
    pub construction: String,
    pub height_m: f64,
    pub results: BTreeMap<Norm, NormResult>,
}

impl StabilityReport {
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn bounded(messages: &[Message]) -> Vec<Message> {
    messages.iter().take(MAX_REPORTED_MESSAGES).cloned().collect()
}

/// Largest finite ballast of the outcomes, `NaN` if none is finite.
fn max_ballast(outcomes: &[&CheckOutcome]) -> f64 {
    outcomes
        .iter()
        .map(|o| o.ballast_kg)
        .filter(|b| !b.is_nan())
        .fold(f64::NAN, f64::max)
}

/// Run the three checks for one scenario.
pub fn run_scenario(
    construction: &mut dyn Construction,
    norm: Norm,
    scenario: &Scenario,
    settings: &AnalysisSettings,
    catalog: &Catalog,
) -> CalcResult<ScenarioResult> {
    let ctx = CheckContext {
        norm,
        scenario,
        settings,
        catalog,
        reset: false,
    };
    let tipping = check_tipping(construction, &ctx)?;
    let sliding = check_sliding(construction, &ctx)?;
    let lift_off = check_lift_off(construction, &ctx)?;

    let max_ballast_kg = max_ballast(&[&tipping, &sliding, &lift_off]);
    let (tipping_value, sliding_value, lift_off_value) =
        (tipping.safety_value(norm), sliding.safety_value(norm), lift_off.safety_value(norm));

    let mut protocol = Protocol::new().with("norm", norm.code()).with("scenario", scenario.label.clone());
    scenario.document(&mut protocol);
    for outcome in [tipping, sliding, lift_off] {
        protocol.merge(outcome.protocol);
    }
    for entry in construction.pool().entries() {
        protocol.merge_messages_once(&entry.protocol, "wind_angle");
    }
    Ok(ScenarioResult {
        scenario: scenario.label.clone(),
        tipping: tipping_value,
        sliding: sliding_value,
        lift_off: lift_off_value,
        max_ballast_kg,
        protocol,
    })
}

fn evaluate_norm(
    construction: &mut dyn Construction,
    norm: Norm,
    settings: &AnalysisSettings,
    catalog: &Catalog,
) -> NormResult {
    let mut protocol = Protocol::new().with("norm", norm.code());
    let height = construction.total_height();

    let scenario = match primary_scenario(norm, settings, height) {
        Ok(scenario) => scenario,
        Err(err) => {
            let status = if err.is_data_error() {
                protocol.warn(codes::NORM_NOT_APPLICABLE, format!("{}: {}", norm.code(), err));
                NormStatus::NotApplicable
            } else {
                protocol.error(codes::NORM_NOT_APPLICABLE, format!("{}: {}", norm.code(), err));
                NormStatus::Error
            };
            info!(norm = norm.code(), reason = %err, "Norm not applicable");
            return NormResult::without_values(status, &protocol);
        }
    };

    info!(norm = norm.code(), scenario = %scenario.label, "Running stability checks");
    let primary = match run_scenario(construction, norm, &scenario, settings, catalog) {
        Ok(result) => result,
        Err(err) => return failed(norm, err, protocol),
    };

    let mut alternatives = BTreeMap::new();
    let required = settings.required_safety;
    if settings.evaluate_fallbacks && !(primary.min_ratio() >= required) {
        match fallback_scenario(norm, settings, height) {
            Some(Ok(fallback)) => {
                info!(norm = norm.code(), scenario = %fallback.label, "Evaluating fallback scenario");
                protocol.info(
                    codes::FALLBACK_EVALUATED,
                    format!("Safety below {} under '{}', evaluated '{}'", required, scenario.label, fallback.label),
                );
                match run_scenario(construction, norm, &fallback, settings, catalog) {
                    Ok(mut alternative) => {
                        protocol.merge_errors_only(std::mem::take(&mut alternative.protocol));
                        alternatives.insert(fallback.label.clone(), alternative);
                    }
                    Err(err) => {
                        warn!(norm = norm.code(), scenario = %fallback.label, error = %err, "Fallback scenario failed");
                        protocol.error(codes::NORM_FAILED, format!("Fallback '{}' failed: {}", fallback.label, err));
                    }
                }
            }
            Some(Err(err)) => {
                protocol.hint(codes::FALLBACK_EVALUATED, format!("Fallback scenario not available: {}", err));
            }
            None => {}
        }
    }

    let ScenarioResult {
        scenario: label,
        tipping,
        sliding,
        lift_off,
        max_ballast_kg,
        protocol: checks_protocol,
    } = primary;
    protocol.merge(checks_protocol);

    let status = if protocol.has_errors() { NormStatus::Error } else { NormStatus::Calculated };
    info!(norm = norm.code(), status = ?status, max_ballast_kg, "Norm finished");
    NormResult {
        status,
        scenario: Some(label),
        messages: bounded(&protocol.messages_at_least(Severity::Info)),
        tipping: Some(tipping),
        sliding: Some(sliding),
        lift_off: Some(lift_off),
        max_ballast_kg: Some(max_ballast_kg),
        alternatives,
        docs: protocol.render_docs(),
    }
}

fn failed(norm: Norm, err: CalcError, mut protocol: Protocol) -> NormResult {
    warn!(norm = norm.code(), error = %err, "Norm failed");
    protocol.error(codes::NORM_FAILED, err.to_string());
    NormResult::without_values(NormStatus::Error, &protocol)
}

/// Analyze a construction with an explicit catalog.
///
/// Returns `Err` only for invalid settings or an empty construction; every
/// analysis failure is reported per norm.
pub fn analyze_with_catalog(
    construction: &mut dyn Construction,
    settings: &AnalysisSettings,
    catalog: &Catalog,
) -> CalcResult<StabilityReport> {
    settings.validate()?;
    construction.validate()?;
    construction.parts_mut().1.reset();

    let mut results = BTreeMap::new();
    for &norm in &settings.norms {
        results.insert(norm, evaluate_norm(construction, norm, settings, catalog));
    }
    Ok(StabilityReport {
        calculated_at: Utc::now(),
        construction: construction.label().to_string(),
        height_m: construction.total_height(),
        results,
    })
}

/// Analyze a construction with the process-wide catalog.
pub fn analyze(construction: &mut dyn Construction, settings: &AnalysisSettings) -> CalcResult<StabilityReport> {
    let catalog = catalog::current();
    analyze_with_catalog(construction, settings, &catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Material;
    use crate::construction::Assembly;
    use crate::elements::{BasePlate, Element, FlatPanel, TrussElement, WindInput, WindLoaded};
    use crate::geometry::Vec3;
    use crate::loads::{LoadCase, LoadType, Variability};
    use uuid::Uuid;

    /// Pushes hard under storm pressure and cannot model light wind.
    #[derive(Debug)]
    struct StormSail(Uuid);

    impl Element for StormSail {
        fn id(&self) -> Uuid {
            self.0
        }
        fn label(&self) -> &str {
            "Storm sail"
        }
        fn top_height(&self) -> f64 {
            2.0
        }
        fn as_wind_loaded(&self) -> Option<&dyn WindLoaded> {
            Some(self)
        }
    }

    impl WindLoaded for StormSail {
        fn wind_loads(&self, input: &WindInput<'_>, _protocol: &mut Protocol) -> CalcResult<Vec<LoadCase>> {
            if input.profile.max_pressure_between(0.0, 2.0) < 300.0 {
                return Err(CalcError::not_implemented(input.norm.code(), "storm sail below 300 Pa"));
            }
            Ok(vec![LoadCase::point(
                "Storm sail wind",
                LoadType::Wind,
                Variability::Variable,
                input.direction.vector * 50_000.0,
                Vec3::new(3.0, 0.0, 2.0),
            )?])
        }
    }

    fn gate(height: f64) -> Assembly {
        Assembly::new("Gate")
            .with(BasePlate::new("BP left", "BP-1000x1000", Vec3::zeros(), Material::Concrete))
            .with(BasePlate::new("BP right", "BP-1000x1000", Vec3::new(6.0, 0.0, 0.0), Material::Concrete))
            .with(TrussElement::new("Post left", "F34", Vec3::zeros(), Vec3::new(0.0, 0.0, height)))
            .with(TrussElement::new("Post right", "F34", Vec3::new(6.0, 0.0, 0.0), Vec3::new(6.0, 0.0, height)))
            .with(TrussElement::new(
                "Beam",
                "F34",
                Vec3::new(0.0, 0.0, height),
                Vec3::new(6.0, 0.0, height),
            ))
    }

    #[test]
    fn test_every_norm_reported() {
        let mut g = gate(4.0);
        let report = analyze_with_catalog(&mut g, &AnalysisSettings::default(), &Catalog::builtin()).unwrap();
        assert_eq!(report.results.len(), 3);
        for result in report.results.values() {
            assert_ne!(result.status, NormStatus::NotApplicable);
            let tipping = result.tipping.as_ref().unwrap();
            assert!(tipping.ratio.is_finite() && tipping.ratio > 0.0);
            assert!(result.max_ballast_kg.unwrap() >= 0.0);
            assert!(!result.docs.is_empty());
        }
        assert!(report.to_json().unwrap().contains("calculated_at"));
    }

    #[test]
    fn test_tall_construction_not_applicable_for_zone_tables() {
        let mut g = gate(30.0);
        let report = analyze_with_catalog(&mut g, &AnalysisSettings::default(), &Catalog::builtin()).unwrap();
        assert_eq!(report.results[&Norm::En1991].status, NormStatus::NotApplicable);
        assert_eq!(report.results[&Norm::En17879].status, NormStatus::NotApplicable);
        assert_ne!(report.results[&Norm::En13814].status, NormStatus::NotApplicable);
        assert!(report.results[&Norm::En1991].messages[0].code == codes::NORM_NOT_APPLICABLE);
    }

    #[test]
    fn test_fallback_reported_alongside_primary() {
        // A light banner gate that cannot stand without ballast
        let mut g = gate(4.0).with(
            FlatPanel::new(
                "Banner",
                vec![
                    Vec3::new(0.0, 0.0, 2.0),
                    Vec3::new(6.0, 0.0, 2.0),
                    Vec3::new(6.0, 0.0, 4.0),
                    Vec3::new(0.0, 0.0, 4.0),
                ],
                0.3,
            )
            .unwrap(),
        );
        let settings = AnalysisSettings {
            norms: vec![Norm::En17879],
            ..AnalysisSettings::default()
        };
        let report = analyze_with_catalog(&mut g, &settings, &Catalog::builtin()).unwrap();
        let result = &report.results[&Norm::En17879];
        assert!(result.max_ballast_kg.unwrap() > 0.0);
        assert_eq!(result.alternatives.len(), 1);
        assert!(result.scenario.as_deref().unwrap().starts_with("non-operating"));
        let alternative = result.alternatives.values().next().unwrap();
        assert!(alternative.max_ballast_kg < result.max_ballast_kg.unwrap());
    }

    #[test]
    fn test_failing_fallback_keeps_primary_result() {
        let mut g = gate(4.0).with(StormSail(Uuid::new_v4()));
        let settings = AnalysisSettings {
            norms: vec![Norm::En13814],
            ..AnalysisSettings::default()
        };
        let report = analyze_with_catalog(&mut g, &settings, &Catalog::builtin()).unwrap();
        let result = &report.results[&Norm::En13814];

        assert_eq!(result.status, NormStatus::Error);
        assert_eq!(result.scenario.as_deref(), Some("out of service"));
        let tipping = result.tipping.as_ref().unwrap();
        assert!(tipping.ratio.is_finite() && tipping.ratio < 1.0);
        assert!(result.max_ballast_kg.unwrap() > 0.0);
        assert!(result.alternatives.is_empty());
        assert!(result
            .messages
            .iter()
            .any(|m| m.code == codes::NORM_FAILED && m.text.contains("in service")));
    }

    #[test]
    fn test_generation_errors_reported_once_per_scenario() {
        let mut g = gate(4.0).with(TrussElement::new(
            "Ghost",
            "X99",
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 2.0),
        ));
        let settings = AnalysisSettings {
            norms: vec![Norm::En13814],
            evaluate_fallbacks: false,
            ..AnalysisSettings::default()
        };
        let report = analyze_with_catalog(&mut g, &settings, &Catalog::builtin()).unwrap();
        let result = &report.results[&Norm::En13814];

        assert_eq!(result.status, NormStatus::Error);
        let misses: Vec<&Message> = result
            .messages
            .iter()
            .filter(|m| m.code == "CATALOG_ENTRY_NOT_FOUND")
            .collect();
        // One from the weight, at most one more from the wind
        assert!(!misses.is_empty() && misses.len() <= 2);
        assert!(misses.iter().all(|m| !m.context.contains_key("wind_angle")));
        assert!(misses.iter().all(|m| m.context.get("element").map(String::as_str) == Some("Ghost")));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut g = gate(4.0);
        let settings = AnalysisSettings {
            norms: Vec::new(),
            ..AnalysisSettings::default()
        };
        assert!(analyze_with_catalog(&mut g, &settings, &Catalog::builtin()).is_err());
    }
}

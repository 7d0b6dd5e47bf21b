//! # Ballast CLI Application
//!
//! Builds a sample 6 m x 4 m truss gate on two base plates with a banner,
//! runs the stability checks for every norm and prints a summary plus the
//! JSON report.
//!
//! Usage: `ballast_cli [settings.json]`. Log output is controlled by
//! `RUST_LOG` (default `ballast_core=info,ballast_cli=info`).

use std::path::Path;
use std::process::ExitCode;

use ballast_core::catalog::Material;
use ballast_core::checks::SafetyValue;
use ballast_core::elements::{BasePlate, FlatPanel, TrussElement};
use ballast_core::geometry::Vec3;
use ballast_core::orchestrator::NormResult;
use ballast_core::{analyze, AnalysisSettings, Assembly, CalcResult, NormStatus};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const GATE_WIDTH_M: f64 = 6.0;
const GATE_HEIGHT_M: f64 = 4.0;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ballast_core=info,ballast_cli=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_settings() -> CalcResult<AnalysisSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "Loading settings");
            AnalysisSettings::from_json_file(Path::new(&path))
        }
        None => Ok(AnalysisSettings::default()),
    }
}

fn sample_gate() -> CalcResult<Assembly> {
    let (w, h) = (GATE_WIDTH_M, GATE_HEIGHT_M);
    let banner = FlatPanel::new(
        "Banner",
        vec![
            Vec3::new(0.3, 0.0, h - 1.5),
            Vec3::new(w - 0.3, 0.0, h - 1.5),
            Vec3::new(w - 0.3, 0.0, h - 0.3),
            Vec3::new(0.3, 0.0, h - 0.3),
        ],
        0.5,
    )?;
    Ok(Assembly::new("Truss gate 6 m x 4 m")
        .with(BasePlate::new("Base plate left", "BP-1000x1000", Vec3::zeros(), Material::Concrete).with_mat(Material::Rubber))
        .with(BasePlate::new("Base plate right", "BP-1000x1000", Vec3::new(w, 0.0, 0.0), Material::Concrete).with_mat(Material::Rubber))
        .with(TrussElement::new("Post left", "F34", Vec3::zeros(), Vec3::new(0.0, 0.0, h)))
        .with(TrussElement::new("Post right", "F34", Vec3::new(w, 0.0, 0.0), Vec3::new(w, 0.0, h)))
        .with(TrussElement::new("Cross beam", "F34", Vec3::new(0.0, 0.0, h), Vec3::new(w, 0.0, h)))
        .with(banner))
}

fn status_icon(value: &SafetyValue, required: f64) -> &'static str {
    if value.ratio.is_nan() {
        "[??]"
    } else if value.ratio >= required {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn print_check(name: &str, value: Option<&SafetyValue>, required: f64) {
    let Some(value) = value else {
        println!("  {:<10} -", name);
        return;
    };
    let angle = value.governing_angle.map(|a| format!("{:.1}°", a)).unwrap_or_else(|| "-".to_string());
    println!(
        "  {:<10} S = {:>7.2}  ballast {:>8.1} kg  at {:>6}  {}",
        name,
        value.ratio,
        value.ballast_kg,
        angle,
        status_icon(value, required)
    );
}

fn print_norm(norm: &str, result: &NormResult, required: f64) {
    println!("{}", norm);
    let status = match result.status {
        NormStatus::Calculated => "calculated",
        NormStatus::NotApplicable => "not applicable",
        NormStatus::Error => "error",
    };
    println!("  status: {}  scenario: {}", status, result.scenario.as_deref().unwrap_or("-"));
    print_check("Tipping", result.tipping.as_ref(), required);
    print_check("Sliding", result.sliding.as_ref(), required);
    print_check("Lift-off", result.lift_off.as_ref(), required);
    if let Some(ballast) = result.max_ballast_kg {
        println!("  Required ballast: {:.1} kg", ballast);
    }
    for (label, alternative) in &result.alternatives {
        println!("  Alternative '{}': required ballast {:.1} kg", label, alternative.max_ballast_kg);
    }
    for message in result.messages.iter().filter(|m| m.severity >= ballast_core::audit::Severity::Warn).take(5) {
        println!("  {} {}: {}", message.severity.code(), message.code, message.text);
    }
    println!();
}

fn run() -> CalcResult<()> {
    let settings = load_settings()?;
    let mut gate = sample_gate()?;

    println!("Ballast CLI - Stability of Temporary Structures");
    println!("===============================================");
    println!();

    let report = analyze(&mut gate, &settings)?;
    println!("Construction: {} (height {:.1} m)", report.construction, report.height_m);
    println!();
    for (norm, result) in &report.results {
        print_norm(norm.display_name(), result, settings.required_safety);
    }

    println!("JSON Output:");
    println!("{}", report.to_json()?);
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "Analysis failed");
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

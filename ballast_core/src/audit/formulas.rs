//! # Formula Registry
//!
//! Every quantity that ends up in a [`DocBundle`](super::DocBundle) is produced by
//! one of the formulas listed here. The registry supplies the title, formula text,
//! symbol definitions and source citation, so the audit trail can explain each
//! number without the calculation code repeating that text.
//!
//! ```rust
//! use ballast_core::audit::Formula;
//!
//! let bundle = Formula::WindForce.bundle(412.5);
//! assert_eq!(bundle.unit.as_deref(), Some("N"));
//! assert!(bundle.source.unwrap().starts_with("EN 1991-1-4"));
//! ```

use serde::{Deserialize, Serialize};

use super::DocBundle;

// ============================================================================
// Sources
// ============================================================================

/// Where a formula or table value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// EN 1991-1-4 Wind actions
    En1991 { section: &'static str },
    /// EN 13814 Fairground and amusement park machinery and structures
    En13814 { section: &'static str },
    /// EN 17879 Event structures
    En17879 { section: &'static str },
    /// Rigid-body statics (no code reference needed)
    Mechanics,
}

impl Source {
    /// Format the reference for display
    pub fn citation(&self) -> String {
        match self {
            Source::En1991 { section } => format!("EN 1991-1-4, {}", section),
            Source::En13814 { section } => format!("EN 13814-1, {}", section),
            Source::En17879 { section } => format!("EN 17879, {}", section),
            Source::Mechanics => "Rigid-body statics".to_string(),
        }
    }

    pub fn short_form(&self) -> &'static str {
        match self {
            Source::En1991 { .. } => "EN 1991-1-4",
            Source::En13814 { .. } => "EN 13814-1",
            Source::En17879 { .. } => "EN 17879",
            Source::Mechanics => "Mechanics",
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Definition of a symbol used in a formula.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub symbol: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
}

impl Symbol {
    pub const fn new(symbol: &'static str, description: &'static str, unit: &'static str) -> Self {
        Self {
            symbol,
            description,
            unit,
        }
    }
}

/// Complete metadata for a documented quantity.
#[derive(Debug, Clone)]
pub struct FormulaMetadata {
    pub title: &'static str,
    /// Plain-text formula
    pub formula: &'static str,
    /// Unit of the result (empty for dimensionless values)
    pub unit: &'static str,
    pub source: Source,
    pub symbols: Vec<Symbol>,
}

// ============================================================================
// Formula Enum
// ============================================================================

/// All documented formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formula {
    // Aerodynamics
    ReynoldsNumber,
    ProjectedArea,
    EnclosedArea,
    SolidityRatio,
    Slenderness,
    BaseForceCoefficient,
    SlendernessReduction,
    ForceCoefficient,
    DynamicPressure,
    WindForce,

    // Loads
    WeightForce,
    FrictionCoefficient,
    FrictionForce,

    // Checks
    TippingMoment,
    StandingMoment,
    TippingSafety,
    SlidingSafety,
    LiftOffSafety,
    TippingBallast,
    SlidingBallast,
    LiftOffBallast,
}

/// Every registered formula, in display order.
pub const ALL_FORMULAS: &[Formula] = &[
    Formula::ReynoldsNumber,
    Formula::ProjectedArea,
    Formula::EnclosedArea,
    Formula::SolidityRatio,
    Formula::Slenderness,
    Formula::BaseForceCoefficient,
    Formula::SlendernessReduction,
    Formula::ForceCoefficient,
    Formula::DynamicPressure,
    Formula::WindForce,
    Formula::WeightForce,
    Formula::FrictionCoefficient,
    Formula::FrictionForce,
    Formula::TippingMoment,
    Formula::StandingMoment,
    Formula::TippingSafety,
    Formula::SlidingSafety,
    Formula::LiftOffSafety,
    Formula::TippingBallast,
    Formula::SlidingBallast,
    Formula::LiftOffBallast,
];

impl Formula {
    pub fn metadata(&self) -> FormulaMetadata {
        match self {
            Formula::ReynoldsNumber => FormulaMetadata {
                title: "Reynolds number",
                formula: "Re = b * v / nu, v = sqrt(2 q / rho)",
                unit: "",
                source: Source::En1991 { section: "7.9.1, (7.15)" },
                symbols: vec![
                    Symbol::new("b", "Characteristic diameter (chord or pipe)", "m"),
                    Symbol::new("v", "Peak wind velocity", "m/s"),
                    Symbol::new("nu", "Kinematic viscosity of air", "m^2/s"),
                    Symbol::new("q", "Dynamic pressure", "N/m^2"),
                    Symbol::new("rho", "Air density", "kg/m^3"),
                ],
            },
            Formula::ProjectedArea => FormulaMetadata {
                title: "Projected area",
                formula: "A = L * D (pipe), A = L * (2 d_c + sqrt(2) d_d) (truss)",
                unit: "m^2",
                source: Source::En1991 { section: "7.11" },
                symbols: vec![
                    Symbol::new("L", "Element length", "m"),
                    Symbol::new("D", "Outer diameter", "m"),
                    Symbol::new("d_c", "Chord diameter", "m"),
                    Symbol::new("d_d", "Diagonal diameter", "m"),
                ],
            },
            Formula::EnclosedArea => FormulaMetadata {
                title: "Enclosed area",
                formula: "A_c = L * h",
                unit: "m^2",
                source: Source::En1991 { section: "7.13, (7.28)" },
                symbols: vec![
                    Symbol::new("L", "Element length", "m"),
                    Symbol::new("h", "Section height", "m"),
                ],
            },
            Formula::SolidityRatio => FormulaMetadata {
                title: "Solidity ratio",
                formula: "phi = A / A_c",
                unit: "",
                source: Source::En1991 { section: "7.13, (7.28)" },
                symbols: vec![
                    Symbol::new("A", "Projected area", "m^2"),
                    Symbol::new("A_c", "Enclosed area", "m^2"),
                ],
            },
            Formula::Slenderness => FormulaMetadata {
                title: "Effective slenderness",
                formula: "lambda = min(k(L) * L / b, 70)",
                unit: "",
                source: Source::En1991 { section: "7.13, Table 7.16" },
                symbols: vec![
                    Symbol::new("k", "Length-dependent factor, 2.0 at 15 m to 1.4 at 50 m", ""),
                    Symbol::new("L", "Element length", "m"),
                    Symbol::new("b", "Section height or diameter", "m"),
                ],
            },
            Formula::BaseForceCoefficient => FormulaMetadata {
                title: "Base force coefficient",
                formula: "c_f0 = table(phi, approach) or table(Re)",
                unit: "",
                source: Source::En1991 { section: "7.9.2 and 7.11" },
                symbols: vec![
                    Symbol::new("phi", "Solidity ratio", ""),
                    Symbol::new("Re", "Reynolds number", ""),
                ],
            },
            Formula::SlendernessReduction => FormulaMetadata {
                title: "End-effect factor",
                formula: "psi_lambda = table(lambda, phi)",
                unit: "",
                source: Source::En1991 { section: "7.13, Figure 7.36" },
                symbols: vec![
                    Symbol::new("lambda", "Effective slenderness", ""),
                    Symbol::new("phi", "Solidity ratio", ""),
                ],
            },
            Formula::ForceCoefficient => FormulaMetadata {
                title: "Force coefficient",
                formula: "c_f = c_f0 * psi_lambda",
                unit: "",
                source: Source::En1991 { section: "7.11, (7.25)" },
                symbols: vec![
                    Symbol::new("c_f0", "Base force coefficient", ""),
                    Symbol::new("psi_lambda", "End-effect factor", ""),
                ],
            },
            Formula::DynamicPressure => FormulaMetadata {
                title: "Dynamic pressure",
                formula: "q = table(z) or q = rho * v^2 / 2",
                unit: "N/m^2",
                source: Source::En13814 { section: "wind loads" },
                symbols: vec![
                    Symbol::new("z", "Height above ground", "m"),
                    Symbol::new("v", "Wind speed", "m/s"),
                ],
            },
            Formula::WindForce => FormulaMetadata {
                title: "Wind force",
                formula: "F_w = c_f * q * A",
                unit: "N",
                source: Source::En1991 { section: "5.3, (5.3)" },
                symbols: vec![
                    Symbol::new("c_f", "Force coefficient", ""),
                    Symbol::new("q", "Dynamic pressure", "N/m^2"),
                    Symbol::new("A", "Reference (projected) area", "m^2"),
                ],
            },
            Formula::WeightForce => FormulaMetadata {
                title: "Self weight",
                formula: "G = m * g",
                unit: "N",
                source: Source::Mechanics,
                symbols: vec![
                    Symbol::new("m", "Mass", "kg"),
                    Symbol::new("g", "Gravitational acceleration", "m/s^2"),
                ],
            },
            Formula::FrictionCoefficient => FormulaMetadata {
                title: "Effective friction coefficient",
                formula: "mu = min(mu_i) over the material chain",
                unit: "",
                source: Source::En17879 { section: "friction coefficients" },
                symbols: vec![Symbol::new("mu_i", "Coefficient of one material pairing", "")],
            },
            Formula::FrictionForce => FormulaMetadata {
                title: "Friction force",
                formula: "R = min(mu * N, H)",
                unit: "N",
                source: Source::Mechanics,
                symbols: vec![
                    Symbol::new("mu", "Effective friction coefficient", ""),
                    Symbol::new("N", "Normal force on the plate", "N"),
                    Symbol::new("H", "Horizontal force on the plate", "N"),
                ],
            },
            Formula::TippingMoment => FormulaMetadata {
                title: "Tipping moment",
                formula: "M_T = sum(gamma * max(M, 0)), M = (r x F) . d",
                unit: "Nm",
                source: Source::Mechanics,
                symbols: vec![
                    Symbol::new("r", "Lever from axis point to attack point", "m"),
                    Symbol::new("F", "Force", "N"),
                    Symbol::new("d", "Unit axis direction", ""),
                    Symbol::new("gamma", "Partial safety factor", ""),
                ],
            },
            Formula::StandingMoment => FormulaMetadata {
                title: "Standing moment",
                formula: "M_S = sum(gamma * max(-M, 0))",
                unit: "Nm",
                source: Source::Mechanics,
                symbols: vec![
                    Symbol::new("M", "Signed moment about the axis", "Nm"),
                    Symbol::new("gamma", "Partial safety factor", ""),
                ],
            },
            Formula::TippingSafety => FormulaMetadata {
                title: "Tipping safety",
                formula: "S_T = M_S / M_T",
                unit: "",
                source: Source::En13814 { section: "stability against overturning" },
                symbols: vec![
                    Symbol::new("M_S", "Stabilizing moment", "Nm"),
                    Symbol::new("M_T", "Destabilizing moment", "Nm"),
                ],
            },
            Formula::SlidingSafety => FormulaMetadata {
                title: "Sliding safety",
                formula: "S_G = mu * N / H",
                unit: "",
                source: Source::En13814 { section: "safety against sliding" },
                symbols: vec![
                    Symbol::new("mu", "Minimum friction coefficient", ""),
                    Symbol::new("N", "Net downward force", "N"),
                    Symbol::new("H", "Horizontal force", "N"),
                ],
            },
            Formula::LiftOffSafety => FormulaMetadata {
                title: "Lift-off safety",
                formula: "S_A = D / U",
                unit: "",
                source: Source::En13814 { section: "safety against lifting" },
                symbols: vec![
                    Symbol::new("D", "Downward holding force", "N"),
                    Symbol::new("U", "Upward force", "N"),
                ],
            },
            Formula::TippingBallast => FormulaMetadata {
                title: "Ballast against tipping",
                formula: "m_B = max(0, S_req * M_T - M_S) / (m_1 * gamma_B)",
                unit: "kg",
                source: Source::Mechanics,
                symbols: vec![
                    Symbol::new("m_1", "Standing moment of 1 kg at the footprint centroid", "Nm/kg"),
                    Symbol::new("gamma_B", "Ballast safety factor", ""),
                ],
            },
            Formula::SlidingBallast => FormulaMetadata {
                title: "Ballast against sliding",
                formula: "m_B = max(0, S_req * H / mu - N) / (g * gamma_B)",
                unit: "kg",
                source: Source::Mechanics,
                symbols: vec![
                    Symbol::new("H", "Horizontal force", "N"),
                    Symbol::new("mu", "Minimum friction coefficient", ""),
                    Symbol::new("N", "Net downward force", "N"),
                ],
            },
            Formula::LiftOffBallast => FormulaMetadata {
                title: "Ballast against lift-off",
                formula: "m_B = max(0, S_req * U - D) / (g * gamma_B)",
                unit: "kg",
                source: Source::Mechanics,
                symbols: vec![
                    Symbol::new("U", "Upward force", "N"),
                    Symbol::new("D", "Downward holding force", "N"),
                ],
            },
        }
    }

    /// Documentation bundle for a value computed with this formula.
    pub fn bundle(&self, value: impl Into<super::DocValue>) -> DocBundle {
        let meta = self.metadata();
        let symbols: Vec<&str> = meta.symbols.iter().map(|s| s.symbol).collect();
        let mut bundle = DocBundle::new(meta.title, value)
            .with_formula(meta.formula)
            .with_symbols(&symbols)
            .with_source(meta.source.citation());
        if !meta.unit.is_empty() {
            bundle = bundle.with_unit(meta.unit);
        }
        bundle
    }

    /// Same as [`Formula::bundle`] with the citation replaced by a norm-specific one.
    pub fn bundle_cited(&self, value: impl Into<super::DocValue>, source: &Source) -> DocBundle {
        let mut bundle = self.bundle(value);
        bundle.source = Some(source.citation());
        bundle
    }
}

/// Markdown listing of every registered formula.
pub fn generate_formulas_markdown() -> String {
    let mut output = String::from("# Formulas\n\n");
    for formula in ALL_FORMULAS {
        let meta = formula.metadata();
        output.push_str(&format!("## {}\n\n", meta.title));
        output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula));
        if !meta.symbols.is_empty() {
            output.push_str("| Symbol | Description | Unit |\n");
            output.push_str("|--------|-------------|------|\n");
            for s in &meta.symbols {
                output.push_str(&format!("| {} | {} | {} |\n", s.symbol, s.description, s.unit));
            }
            output.push('\n');
        }
        output.push_str(&format!("**Reference:** {}\n\n", meta.source.citation()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_formulas_have_metadata() {
        assert_eq!(ALL_FORMULAS.len(), 21);
        for f in ALL_FORMULAS {
            let meta = f.metadata();
            assert!(!meta.title.is_empty(), "{:?} has no title", f);
            assert!(!meta.formula.is_empty(), "{:?} has no formula", f);
            assert!(!meta.symbols.is_empty(), "{:?} has no symbols", f);
        }
        assert!(Formula::WindForce.metadata().formula.contains("c_f * q * A"));
    }

    #[test]
    fn test_citation() {
        assert_eq!(Source::En1991 { section: "5.3" }.citation(), "EN 1991-1-4, 5.3");
        assert_eq!(Source::Mechanics.short_form(), "Mechanics");
    }

    #[test]
    fn test_bundle_dimensionless_has_no_unit() {
        let b = Formula::SolidityRatio.bundle(0.3);
        assert!(b.unit.is_none());
        assert_eq!(b.symbols, vec!["A".to_string(), "A_c".to_string()]);
    }

    #[test]
    fn test_markdown_lists_all() {
        let md = generate_formulas_markdown();
        for f in ALL_FORMULAS {
            assert!(md.contains(f.metadata().title));
        }
    }
}

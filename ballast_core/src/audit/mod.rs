//! # Audit Protocol
//!
//! Structured provenance for every number the engine produces. A [`Protocol`]
//! is an append-only log of:
//!
//! - [`Message`]s - severity + stable code + text + context
//! - [`DocBundle`]s - a titled result with formula, symbols, source citation and sub-values
//! - [`Decision`]s - which candidate won a choice (e.g. the governing load case on an axis)
//!
//! Protocols are passed by `&mut` down the call tree. Sub-computations that
//! compete (wind directions, tipping axes) each get a [`Protocol::child`]; once
//! a winner is chosen the parent merges the children explicitly:
//!
//! ```rust
//! use ballast_core::audit::{Protocol, Role, Severity};
//!
//! let mut check = Protocol::new().with("check", "tipping");
//! let mut winner = check.child("wind_angle", "90");
//! let mut loser = check.child("wind_angle", "0");
//! winner.info("TIP_DIRECTION", "evaluated");
//! loser.error("AERO_COEFFICIENT_UNDEFINED", "no coefficient");
//! loser.info("TIP_DIRECTION", "evaluated");
//!
//! check.merge_tagged(winner, Role::Relevant, false);
//! check.merge_errors_only(loser);
//! assert_eq!(check.messages().len(), 2);
//! assert!(check.has_errors());
//! ```

pub mod codes;
pub mod formulas;

pub use formulas::{Formula, FormulaMetadata, Source};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Key/value scope attached to every audit record.
///
/// Reserved keys: `norm`, `scenario`, `check`, `wind_angle`, `axis`, `element`, `role`.
pub type Context = BTreeMap<String, String>;

/// Message severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Hint,
    Warn,
    Error,
}

impl Severity {
    pub fn code(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Hint => "hint",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

/// Relevance of a documentation bundle once the governing candidate is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Belongs to the governing candidate
    Relevant,
    /// Belongs to the runner-up; explains why the winner was chosen
    DecisionRelevant,
    /// Neither
    Irrelevant,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::Relevant => "relevant",
            Role::DecisionRelevant => "decision_relevant",
            Role::Irrelevant => "irrelevant",
        }
    }
}

/// A log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    /// Stable machine-readable code (see [`codes`])
    pub code: String,
    pub text: String,
    pub context: Context,
}

/// Value of a documentation bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocValue {
    Scalar(f64),
    Vector([f64; 3]),
}

impl From<f64> for DocValue {
    fn from(v: f64) -> Self {
        DocValue::Scalar(v)
    }
}

impl From<crate::geometry::Vec3> for DocValue {
    fn from(v: crate::geometry::Vec3) -> Self {
        DocValue::Vector([v.x, v.y, v.z])
    }
}

/// A documented result: value, how it was computed and where the rule comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocBundle {
    pub title: String,
    pub value: DocValue,
    pub unit: Option<String>,
    pub formula: Option<String>,
    pub symbols: Vec<String>,
    pub source: Option<String>,
    pub sub_values: Vec<DocBundle>,
    pub context: Context,
    pub role: Option<Role>,
}

impl DocBundle {
    pub fn new(title: impl Into<String>, value: impl Into<DocValue>) -> Self {
        DocBundle {
            title: title.into(),
            value: value.into(),
            unit: None,
            formula: None,
            symbols: Vec::new(),
            source: None,
            sub_values: Vec::new(),
            context: Context::new(),
            role: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_symbols(mut self, symbols: &[&str]) -> Self {
        self.symbols = symbols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Attach an input value (builder pattern)
    pub fn with_sub_value(mut self, sub: DocBundle) -> Self {
        self.sub_values.push(sub);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.set_role(role);
        self
    }

    fn set_role(&mut self, role: Role) {
        self.role = Some(role);
        self.context.insert("role".to_string(), role.code().to_string());
    }
}

/// A recorded choice, scoped by context (e.g. which load case governed on which axis).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub key: String,
    pub value: String,
    pub context: Context,
}

/// UI-facing projection of a documentation bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocEntry {
    pub title: String,
    pub value: DocValue,
    pub unit: Option<String>,
    pub formula: Option<String>,
    pub citation: Option<String>,
    pub role: Option<Role>,
}

/// Append-only audit log with a base context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    base: Context,
    messages: Vec<Message>,
    docs: Vec<DocBundle>,
    decisions: Vec<Decision>,
}

impl Protocol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a base context entry (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.base.insert(key.into(), value.into());
        self
    }

    /// Fresh, empty protocol inheriting this one's base context plus one entry.
    pub fn child(&self, key: impl Into<String>, value: impl Into<String>) -> Protocol {
        let mut base = self.base.clone();
        base.insert(key.into(), value.into());
        Protocol {
            base,
            ..Protocol::default()
        }
    }

    pub fn context(&self) -> &Context {
        &self.base
    }

    fn scoped(&self, mut context: Context) -> Context {
        for (k, v) in &self.base {
            context.entry(k.clone()).or_insert_with(|| v.clone());
        }
        context
    }

    /// Append a message with extra context entries.
    pub fn log_with(
        &mut self,
        severity: Severity,
        code: &str,
        text: impl Into<String>,
        extra: &[(&str, String)],
    ) {
        let context = self.scoped(extra.iter().map(|(k, v)| (k.to_string(), v.clone())).collect());
        self.messages.push(Message {
            severity,
            code: code.to_string(),
            text: text.into(),
            context,
        });
    }

    pub fn log(&mut self, severity: Severity, code: &str, text: impl Into<String>) {
        self.log_with(severity, code, text, &[]);
    }

    pub fn info(&mut self, code: &str, text: impl Into<String>) {
        self.log(Severity::Info, code, text);
    }

    pub fn hint(&mut self, code: &str, text: impl Into<String>) {
        self.log(Severity::Hint, code, text);
    }

    pub fn warn(&mut self, code: &str, text: impl Into<String>) {
        self.log(Severity::Warn, code, text);
    }

    pub fn error(&mut self, code: &str, text: impl Into<String>) {
        self.log(Severity::Error, code, text);
    }

    /// Record a structured error as an error-severity message.
    pub fn record_error(&mut self, err: &CalcError) {
        self.error(err.error_code(), err.to_string());
    }

    /// Turn a data error into a logged message plus a fallback value.
    ///
    /// Programmer errors are passed through unchanged.
    pub fn recover<T>(&mut self, result: CalcResult<T>, fallback: impl FnOnce() -> T) -> CalcResult<T> {
        match result {
            Ok(v) => Ok(v),
            Err(err) if err.is_data_error() => {
                self.record_error(&err);
                Ok(fallback())
            }
            Err(err) => Err(err),
        }
    }

    /// Append a documentation bundle (base context fills missing keys).
    pub fn document(&mut self, mut bundle: DocBundle) {
        bundle.context = self.scoped(std::mem::take(&mut bundle.context));
        self.docs.push(bundle);
    }

    pub fn decide(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.decide_with(key, value, &[]);
    }

    pub fn decide_with(&mut self, key: impl Into<String>, value: impl Into<String>, extra: &[(&str, String)]) {
        let context = self.scoped(extra.iter().map(|(k, v)| (k.to_string(), v.clone())).collect());
        self.decisions.push(Decision {
            key: key.into(),
            value: value.into(),
            context,
        });
    }

    /// Re-tag every documentation bundle with a role.
    pub fn tag_role(&mut self, role: Role) {
        for doc in &mut self.docs {
            doc.set_role(role);
        }
    }

    /// Merge everything from `other`.
    pub fn merge(&mut self, other: Protocol) {
        self.messages.extend(other.messages);
        self.docs.extend(other.docs);
        self.decisions.extend(other.decisions);
    }

    /// Merge documentation and decisions from `other`, dropping its messages.
    pub fn merge_docs(&mut self, other: Protocol) {
        self.docs.extend(other.docs);
        self.decisions.extend(other.decisions);
    }

    /// Merge the messages of `other` that are not logged yet.
    ///
    /// Two messages are the same when severity, code, text and context agree
    /// once `ignored_key` is dropped from the context. Merged messages lose
    /// that key.
    pub fn merge_messages_once(&mut self, other: &Protocol, ignored_key: &str) {
        let key = |m: &Message| {
            let mut context = m.context.clone();
            context.remove(ignored_key);
            (m.severity, m.code.clone(), m.text.clone(), context)
        };
        let mut seen: BTreeSet<_> = self.messages.iter().map(key).collect();
        for message in &other.messages {
            let entry = key(message);
            if seen.insert(entry.clone()) {
                let (severity, code, text, context) = entry;
                self.messages.push(Message {
                    severity,
                    code,
                    text,
                    context,
                });
            }
        }
    }

    /// Merge only error-severity messages from `other` (a losing candidate).
    pub fn merge_errors_only(&mut self, other: Protocol) {
        self.messages
            .extend(other.messages.into_iter().filter(|m| m.severity == Severity::Error));
    }

    /// Merge `other` with its documentation re-tagged as `role`.
    ///
    /// With `full_messages` the complete message log and decisions are kept
    /// (the winner); otherwise only error messages survive (the runner-up).
    pub fn merge_tagged(&mut self, mut other: Protocol, role: Role, full_messages: bool) {
        other.tag_role(role);
        self.docs.extend(other.docs);
        if full_messages {
            self.messages.extend(other.messages);
            self.decisions.extend(other.decisions);
        } else {
            self.messages
                .extend(other.messages.into_iter().filter(|m| m.severity == Severity::Error));
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn docs(&self) -> &[DocBundle] {
        &self.docs
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.severity == Severity::Error)
    }

    /// Messages at or above a severity, in log order.
    pub fn messages_at_least(&self, severity: Severity) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| m.severity >= severity)
            .cloned()
            .collect()
    }

    /// Most recent decision for a key.
    pub fn decision(&self, key: &str) -> Option<&Decision> {
        self.decisions.iter().rev().find(|d| d.key == key)
    }

    /// Documentation as a flat list for display.
    pub fn render_docs(&self) -> Vec<DocEntry> {
        self.docs
            .iter()
            .map(|d| DocEntry {
                title: d.title.clone(),
                value: d.value,
                unit: d.unit.clone(),
                formula: d.formula.clone(),
                citation: d.source.clone(),
                role: d.role,
            })
            .collect()
    }
}

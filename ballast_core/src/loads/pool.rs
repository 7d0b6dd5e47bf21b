//! Per-angle load cache.
//!
//! The tipping, sliding and lift-off checks of one scenario evaluate the same
//! wind directions. The pool stores the generated element loads per quantized
//! angle so the aerodynamic pipeline runs once per direction and scenario.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::directions::WindDirection;
use super::generation::ElementLoads;
use crate::audit::Protocol;
use crate::errors::CalcResult;

/// Angle quantization: keys are angles in micro-degrees.
const ANGLE_RESOLUTION: f64 = 1e6;

/// Quantized wind angle used as cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AngleKey(i64);

impl AngleKey {
    pub fn from_deg(angle_deg: f64) -> Self {
        AngleKey((angle_deg.rem_euclid(360.0) * ANGLE_RESOLUTION).round() as i64)
    }

    pub fn deg(&self) -> f64 {
        self.0 as f64 / ANGLE_RESOLUTION
    }
}

/// Loads generated for one wind direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolEntry {
    pub direction: Option<WindDirection>,
    pub loads: ElementLoads,
    /// Audit trail of the load generation
    pub protocol: Protocol,
}

/// Load cache attached to a construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadPool {
    scenario: Option<String>,
    entries: BTreeMap<AngleKey, PoolEntry>,
    #[serde(skip)]
    hits: usize,
    #[serde(skip)]
    misses: usize,
}

impl LoadPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached entry.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.scenario = None;
    }

    /// Bind the pool to a load-context fingerprint (scenario, constants and
    /// catalog).
    ///
    /// Entries computed under another fingerprint, or all entries when
    /// `reset` is set, are discarded.
    pub fn prepare(&mut self, fingerprint: &str, reset: bool) {
        if reset || self.scenario.as_deref() != Some(fingerprint) {
            if !self.entries.is_empty() {
                debug!(
                    from = self.scenario.as_deref().unwrap_or("-"),
                    to = fingerprint,
                    "Resetting load pool"
                );
            }
            self.entries.clear();
            self.scenario = Some(fingerprint.to_string());
        }
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    pub fn get(&self, angle_deg: f64) -> Option<&PoolEntry> {
        self.entries.get(&AngleKey::from_deg(angle_deg))
    }

    /// Cached entries in angle order.
    pub fn entries(&self) -> impl Iterator<Item = &PoolEntry> {
        self.entries.values()
    }

    pub fn insert(&mut self, entry: PoolEntry) {
        let angle = entry.direction.map(|d| d.angle_deg).unwrap_or(0.0);
        self.entries.insert(AngleKey::from_deg(angle), entry);
    }

    /// Cached entry for a direction, generating it on a miss.
    pub fn get_or_generate<F>(&mut self, direction: &WindDirection, generate: F) -> CalcResult<&PoolEntry>
    where
        F: FnOnce(&WindDirection) -> CalcResult<PoolEntry>,
    {
        let key = AngleKey::from_deg(direction.angle_deg);
        if self.entries.contains_key(&key) {
            self.hits += 1;
            debug!(angle = direction.angle_deg, "Load pool hit");
        } else {
            self.misses += 1;
            debug!(angle = direction.angle_deg, "Load pool miss");
            let entry = generate(direction)?;
            self.entries.insert(key, entry);
        }
        self.entries
            .get(&key)
            .ok_or_else(|| crate::errors::CalcError::Internal {
                message: "load pool entry vanished after insert".to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}

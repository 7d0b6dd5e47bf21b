//! # Component Catalog
//!
//! Physical specs of trusses, pipes and base plates plus material friction
//! pairs. The engine looks specs up by name; a miss is a
//! [`CalcError::CatalogEntryNotFound`] (a data error, recovered upstream).
//!
//! The process-wide catalog starts as [`Catalog::builtin`] and can be swapped
//! with [`reload`]. Reloading is not expected to race with running analyses:
//! a running analysis keeps the `Arc` it obtained from [`current`].
//!
//! ```rust
//! use ballast_core::catalog::{self, Material};
//! use ballast_core::norms::Norm;
//!
//! let cat = catalog::current();
//! let truss = cat.get_truss("F34").unwrap();
//! assert_eq!(truss.chord_count, 4);
//!
//! let (mu, _source) = cat.get_friction(Norm::En13814, Material::Rubber, Material::Concrete).unwrap();
//! assert!(mu > 0.0);
//! ```

mod builtin;

use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{CalcError, CalcResult};
use crate::norms::Norm;

/// Materials that can meet at a base plate contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Steel,
    Aluminium,
    Timber,
    Rubber,
    Concrete,
    Asphalt,
    Lawn,
    Gravel,
}

impl Material {
    pub fn display_name(&self) -> &'static str {
        match self {
            Material::Steel => "Steel",
            Material::Aluminium => "Aluminium",
            Material::Timber => "Timber",
            Material::Rubber => "Rubber mat",
            Material::Concrete => "Concrete",
            Material::Asphalt => "Asphalt",
            Material::Lawn => "Lawn",
            Material::Gravel => "Gravel",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lattice truss section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrussSpec {
    pub name: String,
    /// Number of chords (2 = ladder, 3 = triangle, 4 = square)
    pub chord_count: u8,
    /// Outer section height (m)
    pub section_height: f64,
    /// Chord outer diameter (m)
    pub chord_diameter: f64,
    /// Diagonal outer diameter (m)
    pub diagonal_diameter: f64,
    /// Mass per metre (kg/m)
    pub linear_mass: f64,
}

impl TrussSpec {
    /// Angular period of the section seen along the truss axis (degrees)
    pub fn period_deg(&self) -> f64 {
        match self.chord_count {
            2 => 180.0,
            n => 360.0 / n as f64,
        }
    }
}

/// Circular hollow section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSpec {
    pub name: String,
    /// Outer diameter (m)
    pub outer_diameter: f64,
    /// Wall thickness (m)
    pub wall_thickness: f64,
    /// Material density (kg/m³)
    pub density: f64,
}

impl PipeSpec {
    /// Mass per metre (kg/m)
    pub fn linear_mass(&self) -> f64 {
        let inner = self.outer_diameter - 2.0 * self.wall_thickness;
        std::f64::consts::PI / 4.0 * (self.outer_diameter.powi(2) - inner.powi(2)) * self.density
    }
}

/// Base plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePlateSpec {
    pub name: String,
    /// Long edge (m)
    pub length: f64,
    /// Short edge (m)
    pub width: f64,
    /// Mass (kg)
    pub mass: f64,
    pub material: Material,
}

/// Friction coefficient of a material pairing under one norm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionEntry {
    pub norm: Norm,
    pub a: Material,
    pub b: Material,
    pub coefficient: f64,
    /// Citation of the table the value comes from
    pub source: String,
}

impl FrictionEntry {
    fn matches(&self, a: Material, b: Material) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }
}

/// Effective friction of a material chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainFriction {
    /// Minimum coefficient over the chain
    pub coefficient: f64,
    /// One entry per contact, in chain order
    pub contacts: Vec<FrictionEntry>,
}

/// In-memory catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub trusses: Vec<TrussSpec>,
    pub pipes: Vec<PipeSpec>,
    pub base_plates: Vec<BasePlateSpec>,
    pub friction: Vec<FrictionEntry>,
}

fn require_positive(kind: &str, name: &str, field: &str, value: f64) -> CalcResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(CalcError::invalid_input(
            format!("{} '{}'.{}", kind, name, field),
            value.to_string(),
            "must be positive",
        ));
    }
    Ok(())
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the bundled default specs
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Content hash; two catalogs with equal specs share it.
    pub fn fingerprint(&self) -> CalcResult<u64> {
        let mut hasher = DefaultHasher::new();
        serde_json::to_string(self)?.hash(&mut hasher);
        Ok(hasher.finish())
    }

    pub fn get_truss(&self, name: &str) -> CalcResult<&TrussSpec> {
        self.trusses
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| CalcError::catalog_entry_not_found("truss", name))
    }

    pub fn get_pipe(&self, name: &str) -> CalcResult<&PipeSpec> {
        self.pipes
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| CalcError::catalog_entry_not_found("pipe", name))
    }

    pub fn get_baseplate(&self, name: &str) -> CalcResult<&BasePlateSpec> {
        self.base_plates
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| CalcError::catalog_entry_not_found("base plate", name))
    }

    /// Friction entry for a pairing, falling back to other norms when the
    /// requested norm does not list it. Pairs match in either order.
    pub fn friction_entry(&self, norm: Norm, a: Material, b: Material) -> CalcResult<&FrictionEntry> {
        self.friction
            .iter()
            .find(|e| e.norm == norm && e.matches(a, b))
            .or_else(|| {
                Norm::ALL
                    .iter()
                    .filter(|n| **n != norm)
                    .find_map(|n| self.friction.iter().find(|e| e.norm == *n && e.matches(a, b)))
            })
            .ok_or_else(|| CalcError::friction_pair_not_found(a.to_string(), b.to_string()))
    }

    /// `(coefficient, source)` for a material pairing.
    pub fn get_friction(&self, norm: Norm, a: Material, b: Material) -> CalcResult<(f64, String)> {
        let entry = self.friction_entry(norm, a, b)?;
        Ok((entry.coefficient, entry.source.clone()))
    }

    /// Effective coefficient of a contact chain, e.g. plate → mat → ground.
    pub fn chain_friction(&self, norm: Norm, chain: &[Material]) -> CalcResult<ChainFriction> {
        if chain.len() < 2 {
            return Err(CalcError::invalid_input(
                "material_chain",
                format!("{:?}", chain),
                "a contact needs at least two materials",
            ));
        }
        let contacts = chain
            .windows(2)
            .map(|pair| self.friction_entry(norm, pair[0], pair[1]).cloned())
            .collect::<CalcResult<Vec<_>>>()?;
        let coefficient = contacts
            .iter()
            .map(|c| c.coefficient)
            .fold(f64::INFINITY, f64::min);
        Ok(ChainFriction { coefficient, contacts })
    }

    pub fn validate(&self) -> CalcResult<()> {
        for t in &self.trusses {
            if !(2..=4).contains(&t.chord_count) {
                return Err(CalcError::invalid_input(
                    format!("truss '{}'.chord_count", t.name),
                    t.chord_count.to_string(),
                    "supported chord counts are 2, 3 and 4",
                ));
            }
            require_positive("truss", &t.name, "section_height", t.section_height)?;
            require_positive("truss", &t.name, "chord_diameter", t.chord_diameter)?;
            require_positive("truss", &t.name, "diagonal_diameter", t.diagonal_diameter)?;
            require_positive("truss", &t.name, "linear_mass", t.linear_mass)?;
        }
        for p in &self.pipes {
            require_positive("pipe", &p.name, "outer_diameter", p.outer_diameter)?;
            require_positive("pipe", &p.name, "wall_thickness", p.wall_thickness)?;
            require_positive("pipe", &p.name, "density", p.density)?;
            if 2.0 * p.wall_thickness > p.outer_diameter {
                return Err(CalcError::invalid_input(
                    format!("pipe '{}'.wall_thickness", p.name),
                    p.wall_thickness.to_string(),
                    "wall is thicker than the radius",
                ));
            }
        }
        for b in &self.base_plates {
            require_positive("base plate", &b.name, "length", b.length)?;
            require_positive("base plate", &b.name, "width", b.width)?;
            require_positive("base plate", &b.name, "mass", b.mass)?;
        }
        for f in &self.friction {
            require_positive("friction", &format!("{}/{}", f.a, f.b), "coefficient", f.coefficient)?;
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_file(path: &Path) -> CalcResult<Self> {
        let mut file = File::open(path)
            .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_json_str(&contents)
    }
}

static CATALOG: Lazy<RwLock<Arc<Catalog>>> = Lazy::new(|| RwLock::new(Arc::new(Catalog::builtin())));

/// The process-wide catalog.
pub fn current() -> Arc<Catalog> {
    match CATALOG.read() {
        Ok(guard) => Arc::clone(&guard),
        Err(poisoned) => Arc::clone(&poisoned.into_inner()),
    }
}

/// Replace the process-wide catalog.
pub fn reload(catalog: Catalog) {
    info!(
        trusses = catalog.trusses.len(),
        pipes = catalog.pipes.len(),
        base_plates = catalog.base_plates.len(),
        friction_pairs = catalog.friction.len(),
        "Reloading catalog"
    );
    let catalog = Arc::new(catalog);
    match CATALOG.write() {
        Ok(mut guard) => *guard = catalog,
        Err(poisoned) => *poisoned.into_inner() = catalog,
    }
}

//! The construction contract consumed by the checks, and a plain assembly.

use uuid::Uuid;

use crate::elements::Element;
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadPool;

/// A construction under analysis.
///
/// Owns its elements and the load pool the checks share.
pub trait Construction {
    fn label(&self) -> &str;

    /// Ordered element list
    fn elements(&self) -> &[Box<dyn Element>];

    fn pool(&self) -> &LoadPool;

    /// Elements and the load pool, borrowed together.
    fn parts_mut(&mut self) -> (&[Box<dyn Element>], &mut LoadPool);

    /// Overall height, used to select the wind-pressure table (m).
    fn total_height(&self) -> f64 {
        self.elements()
            .iter()
            .map(|e| e.top_height())
            .fold(0.0, f64::max)
    }

    /// The checks need at least one element.
    fn validate(&self) -> CalcResult<()> {
        if self.elements().is_empty() {
            return Err(CalcError::invalid_input("elements", self.label(), "construction has no elements"));
        }
        Ok(())
    }
}

/// Construction built from a list of elements.
#[derive(Debug, Default)]
pub struct Assembly {
    label: String,
    elements: Vec<Box<dyn Element>>,
    pool: LoadPool,
}

impl Assembly {
    pub fn new(label: impl Into<String>) -> Self {
        Assembly {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Add an element and return its id. Cached loads are dropped.
    pub fn add(&mut self, element: impl Element + 'static) -> Uuid {
        let id = element.id();
        self.elements.push(Box::new(element));
        self.pool.reset();
        id
    }

    /// Builder form of [`Assembly::add`].
    pub fn with(mut self, element: impl Element + 'static) -> Self {
        self.add(element);
        self
    }

    pub fn element(&self, id: Uuid) -> Option<&dyn Element> {
        self.elements.iter().find(|e| e.id() == id).map(|e| e.as_ref())
    }
}

impl Construction for Assembly {
    fn label(&self) -> &str {
        &self.label
    }

    fn elements(&self) -> &[Box<dyn Element>] {
        &self.elements
    }

    fn pool(&self) -> &LoadPool {
        &self.pool
    }

    fn parts_mut(&mut self) -> (&[Box<dyn Element>], &mut LoadPool) {
        (&self.elements, &mut self.pool)
    }
}

//! engine::deps
//!
//! The dependency-tracker seam.
//!
//! The engine does not build the dependency graph; the compilation
//! pipeline records which objects were read while compiling each item and
//! hands the result to the checker through [`DependencyTracker`]. The
//! `DependenciesOutdated` rule is the only consumer.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::Identifier;

/// Read access to the dependency graph recorded by the pipeline.
pub trait DependencyTracker {
    /// Identifiers of the objects `identifier` depends on.
    ///
    /// Unknown identifiers have no dependencies.
    fn dependencies_of(&self, identifier: &Identifier) -> BTreeSet<Identifier>;
}

/// A dependency tracker backed by an in-memory edge map.
///
/// The pipeline records an edge each time compiling `from` reads `on`;
/// tests build graphs directly.
///
/// # Example
///
/// ```
/// use stonework::engine::deps::{DependencyTracker, InMemoryDependencyTracker};
/// use stonework::core::types::Identifier;
///
/// let mut tracker = InMemoryDependencyTracker::new();
/// let page = Identifier::new("/page.md").unwrap();
/// let style = Identifier::new("/style.css").unwrap();
/// tracker.record(page.clone(), style.clone());
///
/// assert!(tracker.dependencies_of(&page).contains(&style));
/// assert!(tracker.dependencies_of(&style).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDependencyTracker {
    edges: BTreeMap<Identifier, BTreeSet<Identifier>>,
}

impl InMemoryDependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` depends on `on`.
    pub fn record(&mut self, from: Identifier, on: Identifier) {
        self.edges.entry(from).or_default().insert(on);
    }

    /// Number of objects with recorded dependencies.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no dependencies have been recorded.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl DependencyTracker for InMemoryDependencyTracker {
    fn dependencies_of(&self, identifier: &Identifier) -> BTreeSet<Identifier> {
        self.edges.get(identifier).cloned().unwrap_or_default()
    }
}

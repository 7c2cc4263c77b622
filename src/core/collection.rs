//! core::collection
//!
//! Ordered, identifier-indexed containers of content objects.
//!
//! # Invariants
//!
//! - No two members share an identifier (enforced at construction)
//! - Insertion order is preserved by iteration, `find_all`, and `reject`
//! - Exact lookup by identifier is O(1)
//!
//! # Example
//!
//! ```
//! use stonework::core::collection::IdentifiableCollection;
//! use stonework::core::document::Document;
//! use stonework::core::pattern::Pattern;
//! use stonework::core::types::Identifier;
//!
//! let items = IdentifiableCollection::new(vec![
//!     Document::item("/about.css", "body {}").unwrap(),
//!     Document::item("/about.md", "# About").unwrap(),
//! ]).unwrap();
//!
//! let css = Pattern::from_glob("/*.css").unwrap();
//! assert_eq!(items.find_all(&css).count(), 1);
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::core::pattern::Pattern;
use crate::core::types::Identifier;

/// Errors from collection construction.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Two members carried the same identifier.
    #[error("duplicate identifier in collection: {0}")]
    DuplicateIdentifier(Identifier),
}

/// Anything that owns exactly one identifier.
///
/// Implemented by content items, layouts, and the site configuration.
pub trait Identifiable {
    /// The identifier naming this object.
    fn identifier(&self) -> &Identifier;
}

/// An ordered sequence of identifiable values with an identifier index.
///
/// Built once per compilation run from the loaded site tree and read-only
/// afterward; `reject` derives new instances sharing no mutable state with
/// the parent.
#[derive(Debug, Clone)]
pub struct IdentifiableCollection<T: Identifiable> {
    objects: Vec<T>,
    index: HashMap<Identifier, usize>,
}

// Not derived: a derived impl would demand `T: Default`.
impl<T: Identifiable> Default for IdentifiableCollection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Identifiable> IdentifiableCollection<T> {
    /// Build a collection from objects in their intended order.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateIdentifier`] if two objects share
    /// an identifier.
    pub fn new(objects: Vec<T>) -> Result<Self, CollectionError> {
        let mut index = HashMap::with_capacity(objects.len());
        for (pos, obj) in objects.iter().enumerate() {
            if index.insert(obj.identifier().clone(), pos).is_some() {
                return Err(CollectionError::DuplicateIdentifier(
                    obj.identifier().clone(),
                ));
            }
        }
        Ok(Self { objects, index })
    }

    /// An empty collection.
    pub fn empty() -> Self {
        Self {
            objects: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Objects already known to carry distinct identifiers.
    fn from_unique(objects: Vec<T>) -> Self {
        let index = objects
            .iter()
            .enumerate()
            .map(|(pos, obj)| (obj.identifier().clone(), pos))
            .collect();
        Self { objects, index }
    }

    /// Exact lookup by identifier. O(1).
    pub fn get(&self, identifier: &Identifier) -> Option<&T> {
        self.index.get(identifier).map(|&pos| &self.objects[pos])
    }

    /// Whether an object with this identifier is present.
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.index.contains_key(identifier)
    }

    /// All members whose identifier matches the pattern.
    ///
    /// Lazy and order-preserving; each call re-scans the collection.
    pub fn find_all<'a>(&'a self, pattern: &'a Pattern) -> impl Iterator<Item = &'a T> + 'a {
        self.objects
            .iter()
            .filter(move |obj| pattern.matches(obj.identifier()))
    }

    /// A new collection containing the members for which the predicate is
    /// false, preserving order.
    pub fn reject<F>(&self, predicate: F) -> Self
    where
        T: Clone,
        F: Fn(&T) -> bool,
    {
        let kept: Vec<T> = self
            .objects
            .iter()
            .filter(|obj| !predicate(obj))
            .cloned()
            .collect();
        // Members came from self, so identifiers are already unique.
        Self::from_unique(kept)
    }

    /// Iterate members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.objects.iter()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the collection has no members.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<'a, T: Identifiable> IntoIterator for &'a IdentifiableCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

//! core::site
//!
//! The in-memory aggregate of one compilation run's inputs.
//!
//! A [`Site`] bundles the configuration with the item and layout
//! collections. It is built once per run by the site-tree loader and is
//! read-only while the outdatedness engine evaluates.

use crate::core::collection::IdentifiableCollection;
use crate::core::config::Configuration;
use crate::core::document::Document;
use crate::core::types::Identifier;

/// Configuration plus item and layout collections for one run.
#[derive(Debug, Clone, Default)]
pub struct Site {
    config: Configuration,
    items: IdentifiableCollection<Document>,
    layouts: IdentifiableCollection<Document>,
}

impl Site {
    /// Assemble a site from already-loaded parts.
    pub fn new(
        config: Configuration,
        items: IdentifiableCollection<Document>,
        layouts: IdentifiableCollection<Document>,
    ) -> Self {
        Self {
            config,
            items,
            layouts,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn items(&self) -> &IdentifiableCollection<Document> {
        &self.items
    }

    pub fn layouts(&self) -> &IdentifiableCollection<Document> {
        &self.layouts
    }

    /// Look up a document by identifier, items first, then layouts.
    ///
    /// Item and layout identifier spaces are conventionally disjoint (items
    /// come from the content tree, layouts from the layout tree), so the
    /// lookup order only matters if a loader violates that convention.
    pub fn document(&self, identifier: &Identifier) -> Option<&Document> {
        self.items
            .get(identifier)
            .or_else(|| self.layouts.get(identifier))
    }

    /// Whether any document (item or layout) carries this identifier.
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.items.contains(identifier) || self.layouts.contains(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site::new(
            Configuration::default(),
            IdentifiableCollection::new(vec![Document::item("/about.md", "# About").unwrap()])
                .unwrap(),
            IdentifiableCollection::new(vec![
                Document::layout("/default.html", "<html></html>").unwrap()
            ])
            .unwrap(),
        )
    }

    #[test]
    fn document_finds_items_and_layouts() {
        let site = site();
        let item_id = Identifier::new("/about.md").unwrap();
        let layout_id = Identifier::new("/default.html").unwrap();

        assert!(site.document(&item_id).is_some());
        assert!(site.document(&layout_id).is_some());
        assert!(site.contains(&item_id));
        assert!(site.contains(&layout_id));
    }

    #[test]
    fn unknown_identifier_not_found() {
        let site = site();
        let id = Identifier::new("/missing.md").unwrap();
        assert!(site.document(&id).is_none());
        assert!(!site.contains(&id));
    }
}

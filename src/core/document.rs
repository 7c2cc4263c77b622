//! core::document
//!
//! Content documents: items and layouts.
//!
//! A [`Document`] is the unit the outdatedness engine reasons about. Its
//! checksum-relevant state is the raw content plus the attribute map; the
//! expected output path is consulted by the not-written rule only.
//!
//! Content may be held inline or left on disk (`Content::File`) for sources
//! that are too large or binary to keep in memory. File-backed content is
//! read at checksum time and can fail if the source vanished mid-run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::collection::Identifiable;
use crate::core::types::{Identifier, TypeError};

/// An attribute value attached to a document or the configuration.
pub type AttributeValue = toml::Value;

/// The raw content of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Content held in memory.
    Inline(String),
    /// Content left on disk, read when checksummed.
    File(PathBuf),
}

/// Whether a document is a content item or a layout template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Item,
    Layout,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Item => write!(f, "item"),
            DocumentKind::Layout => write!(f, "layout"),
        }
    }
}

/// A content item or layout.
///
/// # Example
///
/// ```
/// use stonework::core::document::Document;
/// use stonework::core::collection::Identifiable;
///
/// let doc = Document::item("/about.md", "# About")
///     .unwrap()
///     .with_attribute("title", "About us");
/// assert_eq!(doc.identifier().as_str(), "/about.md");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    identifier: Identifier,
    kind: DocumentKind,
    content: Content,
    attributes: BTreeMap<String, AttributeValue>,
    output_path: Option<PathBuf>,
}

impl Document {
    /// Create a content item with inline content.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError`] if the identifier is invalid.
    pub fn item(identifier: impl Into<String>, content: impl Into<String>) -> Result<Self, TypeError> {
        Ok(Self {
            identifier: Identifier::new(identifier)?,
            kind: DocumentKind::Item,
            content: Content::Inline(content.into()),
            attributes: BTreeMap::new(),
            output_path: None,
        })
    }

    /// Create a layout with inline content.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError`] if the identifier is invalid.
    pub fn layout(
        identifier: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, TypeError> {
        Ok(Self {
            identifier: Identifier::new(identifier)?,
            kind: DocumentKind::Layout,
            content: Content::Inline(content.into()),
            attributes: BTreeMap::new(),
            output_path: None,
        })
    }

    /// Create an item whose content stays on disk until checksummed.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError`] if the identifier is invalid.
    pub fn file_backed_item(
        identifier: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, TypeError> {
        Ok(Self {
            identifier: Identifier::new(identifier)?,
            kind: DocumentKind::Item,
            content: Content::File(path.into()),
            attributes: BTreeMap::new(),
            output_path: None,
        })
    }

    /// Attach an attribute, replacing any previous value for the key.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the expected output artifact path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Replace the document's content.
    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The attribute map, ordered by key.
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// A single attribute value, if set.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Where the compiled artifact is expected on disk, if anywhere.
    ///
    /// `None` means the document produces no output artifact (e.g. a
    /// layout, or an item routed nowhere).
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output_path.as_ref()
    }
}

impl Identifiable for Document {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Identifier`] - Validated path-like name of a content object
//! - [`Checksum`] - Opaque content fingerprint
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use stonework::core::types::Identifier;
//!
//! // Valid constructions
//! let id = Identifier::new("/about.md").unwrap();
//! assert_eq!(id.as_str(), "/about.md");
//!
//! // Invalid constructions fail at creation time
//! assert!(Identifier::new("about.md").is_err());
//! assert!(Identifier::new("/a//b").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid checksum: {0}")]
    InvalidChecksum(String),
}

/// A validated, path-like name uniquely identifying a content object.
///
/// Identifiers look like absolute paths (`/about.md`, `/css/style.css`):
/// - Cannot be empty
/// - Must start with `/`
/// - Cannot contain `//` (empty path components)
/// - Cannot contain ASCII control characters
///
/// Identifiers are compared, hashed, and ordered by their string value.
///
/// # Example
///
/// ```
/// use stonework::core::types::Identifier;
///
/// let a = Identifier::new("/about.md").unwrap();
/// let b = Identifier::new("/style.css").unwrap();
/// assert!(a < b);
///
/// assert!(Identifier::new("").is_err());
/// assert!(Identifier::new("relative.md").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Create a new validated identifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidIdentifier` if the value is not an
    /// absolute, well-formed path string.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        Self::validate(&value)?;
        Ok(Self(value))
    }

    fn validate(value: &str) -> Result<(), TypeError> {
        if value.is_empty() {
            return Err(TypeError::InvalidIdentifier(
                "identifier cannot be empty".into(),
            ));
        }

        if !value.starts_with('/') {
            return Err(TypeError::InvalidIdentifier(
                "identifier must start with '/'".into(),
            ));
        }

        if value.contains("//") {
            return Err(TypeError::InvalidIdentifier(
                "identifier cannot contain '//'".into(),
            ));
        }

        for c in value.chars() {
            if c.is_ascii_control() {
                return Err(TypeError::InvalidIdentifier(
                    "identifier cannot contain control characters".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailing path component, without the leading directory part.
    ///
    /// # Example
    ///
    /// ```
    /// use stonework::core::types::Identifier;
    ///
    /// let id = Identifier::new("/css/style.css").unwrap();
    /// assert_eq!(id.basename(), "style.css");
    /// ```
    pub fn basename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// The extension of the trailing component, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use stonework::core::types::Identifier;
    ///
    /// let id = Identifier::new("/about.md").unwrap();
    /// assert_eq!(id.ext(), Some("md"));
    ///
    /// let id = Identifier::new("/README").unwrap();
    /// assert_eq!(id.ext(), None);
    /// ```
    pub fn ext(&self) -> Option<&str> {
        let base = self.basename();
        match base.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }
}

impl TryFrom<String> for Identifier {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque, stable fingerprint of an object's compilation-relevant state.
///
/// Checksums are produced by the checksummer (see `engine::checksummer`) and
/// compared for equality only; the digest scheme is an internal detail of
/// the producing side. The store persists them as plain strings.
///
/// # Example
///
/// ```
/// use stonework::core::types::Checksum;
///
/// let ch = Checksum::new("doc=4fe9a2").unwrap();
/// assert_eq!(ch.as_str(), "doc=4fe9a2");
/// assert!(Checksum::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Checksum(String);

impl Checksum {
    /// Create a new checksum from its string form.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidChecksum` if the value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TypeError::InvalidChecksum(
                "checksum cannot be empty".into(),
            ));
        }
        Ok(Self(value))
    }

    /// Construct from a digest string already known to be non-empty.
    pub(crate) fn from_digest(value: String) -> Self {
        Self(value)
    }

    /// Get the checksum as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Checksum {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Checksum> for String {
    fn from(ch: Checksum) -> Self {
        ch.0
    }
}

impl AsRef<str> for Checksum {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

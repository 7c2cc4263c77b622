//! core::config
//!
//! The site configuration object.
//!
//! # Overview
//!
//! The configuration is a free-form attribute map loaded from `site.toml`
//! in the site root. The engine does not interpret most of it; the
//! configuration participates in outdatedness as a checksummed object
//! whose full attribute map is fingerprinted.
//!
//! # Loading
//!
//! A missing `site.toml` is not an error (defaults are used). A file that
//! exists but cannot be read or parsed is an error: a silently-defaulted
//! configuration would produce a wrong checksum and wrong rebuild
//! decisions.
//!
//! # Example
//!
//! ```no_run
//! use stonework::core::config::Configuration;
//! use std::path::Path;
//!
//! let config = Configuration::from_site_root(Path::new("/path/to/site")).unwrap();
//! println!("output dir: {}", config.output_dir());
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

use crate::core::collection::Identifiable;
use crate::core::document::AttributeValue;
use crate::core::types::Identifier;

/// File name of the site configuration, relative to the site root.
pub const CONFIG_FILENAME: &str = "site.toml";

/// The conventional singleton identifier of the configuration object.
pub const CONFIG_IDENTIFIER: &str = "/~config";

fn config_identifier() -> &'static Identifier {
    static ID: OnceLock<Identifier> = OnceLock::new();
    ID.get_or_init(|| Identifier::new(CONFIG_IDENTIFIER).expect("constant identifier is valid"))
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// The site configuration: an attribute map with a singleton identifier.
///
/// Attribute order is the key order, so serializing the map is
/// deterministic — a property the checksummer relies on.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    attributes: BTreeMap<String, AttributeValue>,
}

impl Configuration {
    /// Build a configuration directly from attributes.
    pub fn from_attributes(attributes: BTreeMap<String, AttributeValue>) -> Self {
        Self { attributes }
    }

    /// Load the configuration for a site root.
    ///
    /// Reads `<site_root>/site.toml`. A missing file yields the default
    /// (empty) configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadError`] if the file exists but cannot be read
    /// - [`ConfigError::ParseError`] if the file is not valid TOML
    pub fn from_site_root(site_root: &Path) -> Result<Self, ConfigError> {
        let path = site_root.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let attributes: BTreeMap<String, AttributeValue> =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path,
                message: e.to_string(),
            })?;

        Ok(Self { attributes })
    }

    /// Attach an attribute, replacing any previous value for the key.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The full attribute map, ordered by key.
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// A single attribute value, if set.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// A string attribute, if set and string-valued.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    /// A boolean attribute, if set and boolean-valued.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.attributes.get(key).and_then(|v| v.as_bool())
    }

    /// The output directory for compiled artifacts.
    ///
    /// Defaults to `"output"` if not configured.
    pub fn output_dir(&self) -> &str {
        self.string("output_dir").unwrap_or("output")
    }
}

impl Identifiable for Configuration {
    fn identifier(&self) -> &Identifier {
        config_identifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Configuration::from_site_root(temp.path()).unwrap();
        assert!(config.attributes().is_empty());
        assert_eq!(config.output_dir(), "output");
    }

    #[test]
    fn loads_attributes_from_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            r#"
            title = "My site"
            output_dir = "public"
            drafts = false
            "#,
        )
        .unwrap();

        let config = Configuration::from_site_root(temp.path()).unwrap();
        assert_eq!(config.string("title"), Some("My site"));
        assert_eq!(config.output_dir(), "public");
        assert_eq!(config.bool("drafts"), Some(false));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), "title = [unclosed").unwrap();

        let err = Configuration::from_site_root(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(CONFIG_FILENAME));
    }

    #[test]
    fn singleton_identifier() {
        let config = Configuration::default();
        assert_eq!(config.identifier().as_str(), CONFIG_IDENTIFIER);
    }

    #[test]
    fn with_attribute_builder() {
        let config = Configuration::default().with_attribute("title", "x");
        assert_eq!(config.string("title"), Some("x"));
        assert!(config.get("missing").is_none());
    }

    #[test]
    fn nested_tables_parse() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            r#"
            [markdown]
            smart_quotes = true
            "#,
        )
        .unwrap();

        let config = Configuration::from_site_root(temp.path()).unwrap();
        let table = config.get("markdown").and_then(|v| v.as_table()).unwrap();
        assert_eq!(table.get("smart_quotes").and_then(|v| v.as_bool()), Some(true));
    }
}

//! Stonework - incremental-rebuild decisions for static content compilation
//!
//! Stonework is the outdatedness engine of a content-compilation pipeline:
//! it decides, per item, whether the item must be recompiled, by comparing
//! checksums of everything the item's output can depend on — its own
//! content and attributes, the site configuration, the compilation rule
//! governing it, and the objects it references.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types: identifiers, checksums, patterns,
//!   collections, documents, configuration
//! - [`engine`] - Checksummer, persisted checksum store, outdatedness
//!   rules, and the memoizing checker
//! - [`ui`] - Explicit verbosity handling and file-action display
//!
//! The compilation pipeline itself, the site-tree loader, and the CLI
//! front end are external collaborators.
//!
//! # Correctness Invariants
//!
//! Stonework maintains the following invariants:
//!
//! 1. Checksums are deterministic: unchanged inputs hash identically
//!    across runs
//! 2. Objects without a committed checksum are always treated as outdated
//! 3. The checksum snapshot is replaced atomically; a crash mid-commit
//!    never corrupts the previous baseline
//! 4. Dependency cycles terminate: a revisited in-progress object is
//!    conservatively treated as up to date for that edge
//!
//! # Example
//!
//! ```
//! use stonework::core::collection::IdentifiableCollection;
//! use stonework::core::config::Configuration;
//! use stonework::core::document::Document;
//! use stonework::core::site::Site;
//! use stonework::core::types::Identifier;
//! use stonework::engine::{
//!     ChecksumStore, InMemoryDependencyTracker, OutdatednessChecker, RuleIndex,
//! };
//! use stonework::ui::output::Verbosity;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let site = Site::new(
//!     Configuration::default(),
//!     IdentifiableCollection::new(vec![
//!         Document::item("/about.md", "# About").unwrap(),
//!     ]).unwrap(),
//!     IdentifiableCollection::empty(),
//! );
//!
//! let store = ChecksumStore::load(&dir.path().join("checksums.json")).store;
//! let deps = InMemoryDependencyTracker::new();
//! let rule_index = RuleIndex::new();
//! let checker = OutdatednessChecker::new(&site, &store, &deps, &rule_index, Verbosity::Quiet);
//!
//! // Nothing committed yet: everything is outdated.
//! let id = Identifier::new("/about.md").unwrap();
//! assert!(checker.outdated(&id).unwrap());
//! ```

pub mod core;
pub mod engine;
pub mod ui;

//! engine::checker
//!
//! Orchestrates rule evaluation per object.
//!
//! # Algorithm
//!
//! For each queried object the checker walks its rule list in a fixed,
//! documented order and reports the first firing rule's reason:
//!
//! 1. configuration-modified
//! 2. not-written
//! 3. content-modified
//! 4. rules-modified
//! 5. dependencies-outdated
//!
//! The order only affects *which* reason is reported; whether an object is
//! outdated does not depend on it.
//!
//! # Memoization
//!
//! An object's outdatedness is asked repeatedly within a run — by its
//! dependents and by the pipeline — and is computed once. Results live in
//! an explicit per-instance map behind a `Mutex`, so the checker stays
//! `&self`-callable if the surrounding pipeline parallelizes. Guards are
//! never held across recursive evaluation.
//!
//! # Cycles
//!
//! Dependency recursion tracks in-flight identifiers. A re-entrant query
//! for an identifier already being evaluated is answered "not outdated by
//! that edge": the recursion is broken conservatively instead of treating
//! cycles as always-outdated, which would rebuild cyclic reference graphs
//! on every run. The broken-edge answer is never cached as the object's
//! final result.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use thiserror::Error;

use crate::core::collection::Identifiable;
use crate::core::document::Document;
use crate::core::site::Site;
use crate::core::types::Identifier;
use crate::ui::output::{self, Verbosity};

use super::checksummer::ChecksumError;
use super::deps::DependencyTracker;
use super::reasons::OutdatednessReason;
use super::rule_index::RuleIndex;
use super::rules::{
    ConfigurationModified, ContentModified, DependenciesOutdated, NotWritten, OutdatednessRule,
    RulesModified,
};
use super::store::ChecksumStore;

/// Errors from outdatedness evaluation.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The queried identifier names no item or layout in the site.
    #[error("unknown object: {0}")]
    UnknownObject(Identifier),

    /// A rule could not compute a checksum.
    #[error(transparent)]
    Checksum(#[from] ChecksumError),
}

/// Decides, per object, whether recompilation is needed and why.
pub struct OutdatednessChecker<'a> {
    site: &'a Site,
    store: &'a ChecksumStore,
    deps: &'a dyn DependencyTracker,
    rule_index: &'a RuleIndex,
    rules: Vec<Box<dyn OutdatednessRule>>,
    cache: Mutex<HashMap<Identifier, Option<OutdatednessReason>>>,
    in_flight: Mutex<HashSet<Identifier>>,
    verbosity: Verbosity,
}

impl<'a> OutdatednessChecker<'a> {
    /// Create a checker with the standard rule list.
    pub fn new(
        site: &'a Site,
        store: &'a ChecksumStore,
        deps: &'a dyn DependencyTracker,
        rule_index: &'a RuleIndex,
        verbosity: Verbosity,
    ) -> Self {
        let rules: Vec<Box<dyn OutdatednessRule>> = vec![
            Box::new(ConfigurationModified::new()),
            Box::new(NotWritten),
            Box::new(ContentModified),
            Box::new(RulesModified),
            Box::new(DependenciesOutdated),
        ];

        Self {
            site,
            store,
            deps,
            rule_index,
            rules,
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
            verbosity,
        }
    }

    pub fn site(&self) -> &Site {
        self.site
    }

    pub fn store(&self) -> &ChecksumStore {
        self.store
    }

    pub fn deps(&self) -> &dyn DependencyTracker {
        self.deps
    }

    pub fn rule_index(&self) -> &RuleIndex {
        self.rule_index
    }

    /// Whether the object must be recompiled.
    ///
    /// # Errors
    ///
    /// - [`CheckError::UnknownObject`] if the identifier names nothing
    /// - [`CheckError::Checksum`] if a rule could not compute a checksum
    pub fn outdated(&self, identifier: &Identifier) -> Result<bool, CheckError> {
        Ok(self.reason_for(identifier)?.is_some())
    }

    /// The first firing rule's reason, or `None` when up to date.
    ///
    /// Memoized per identifier for the checker's lifetime.
    ///
    /// # Errors
    ///
    /// - [`CheckError::UnknownObject`] if the identifier names nothing
    /// - [`CheckError::Checksum`] if a rule could not compute a checksum
    pub fn reason_for(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<OutdatednessReason>, CheckError> {
        {
            // Poisoning only means a rule panicked mid-run; the map itself
            // stays consistent, so recover the inner value.
            let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = cache.get(identifier) {
                return Ok(cached.clone());
            }
        }

        let document = self
            .site
            .document(identifier)
            .ok_or_else(|| CheckError::UnknownObject(identifier.clone()))?;

        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            if !in_flight.insert(identifier.clone()) {
                // Re-entrant query: a dependency walk came back around to
                // an object still being evaluated. Break the edge.
                output::debug(
                    format!("dependency cycle through {identifier}; treating edge as up to date"),
                    self.verbosity,
                );
                return Ok(None);
            }
        }

        let result = self.evaluate(document);

        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(identifier);

        let reason = result?;
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(identifier.clone(), reason.clone());
        Ok(reason)
    }

    /// Run the rule list in order; first firing reason wins.
    fn evaluate(&self, document: &Document) -> Result<Option<OutdatednessReason>, CheckError> {
        for rule in &self.rules {
            if let Some(reason) = rule.apply(document, self)? {
                output::debug(
                    format!(
                        "{} is outdated: {} ({})",
                        document.identifier(),
                        reason,
                        rule.name()
                    ),
                    self.verbosity,
                );
                return Ok(Some(reason));
            }
        }
        Ok(None)
    }
}

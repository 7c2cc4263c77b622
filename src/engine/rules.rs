//! engine::rules
//!
//! The pluggable outdatedness predicates.
//!
//! # Architecture
//!
//! Each rule decides one reason an object might be stale. The checker
//! iterates its rule list in a fixed order and reports the first firing
//! rule's reason (see `engine::checker` for the order).
//!
//! # Invariants
//!
//! - Rules are independent: no rule's verdict depends on another rule
//!   having run
//! - Rules are side-effect-free apart from internal memoization
//! - A rule that cannot compute a checksum reports the error; it never
//!   guesses

use std::sync::OnceLock;

use crate::core::collection::Identifiable;
use crate::core::document::Document;
use crate::core::types::Checksum;

use super::checker::{CheckError, OutdatednessChecker};
use super::checksummer::Checksummer;
use super::reasons::OutdatednessReason;
use super::store::ObjectKey;

/// A predicate deciding one specific reason an object might be outdated.
pub trait OutdatednessRule {
    /// Short rule name for diagnostics.
    fn name(&self) -> &'static str;

    /// Decide whether this rule applies to the document.
    ///
    /// Returns `Ok(None)` when the rule does not fire.
    fn apply(
        &self,
        document: &Document,
        checker: &OutdatednessChecker<'_>,
    ) -> Result<Option<OutdatednessReason>, CheckError>;
}

/// Fires when the site configuration's checksum differs from the stored
/// one.
///
/// The verdict cannot change mid-run, so it is computed at most once per
/// checker lifetime and cached in an explicit per-instance cell, no matter
/// how many objects trigger the query.
#[derive(Debug, Default)]
pub struct ConfigurationModified {
    modified: OnceLock<bool>,
}

impl ConfigurationModified {
    pub fn new() -> Self {
        Self::default()
    }

    fn config_modified(&self, checker: &OutdatednessChecker<'_>) -> Result<bool, CheckError> {
        if let Some(&modified) = self.modified.get() {
            return Ok(modified);
        }

        let config = checker.site().config();
        let ch_new = Checksummer::calc_config(config)?;
        let modified = checker.store().get(&ObjectKey::Config) != Some(&ch_new);
        let _ = self.modified.set(modified);
        Ok(modified)
    }

    #[cfg(test)]
    fn computed(&self) -> bool {
        self.modified.get().is_some()
    }
}

impl OutdatednessRule for ConfigurationModified {
    fn name(&self) -> &'static str {
        "configuration-modified"
    }

    fn apply(
        &self,
        _document: &Document,
        checker: &OutdatednessChecker<'_>,
    ) -> Result<Option<OutdatednessReason>, CheckError> {
        if self.config_modified(checker)? {
            Ok(Some(OutdatednessReason::ConfigurationModified))
        } else {
            Ok(None)
        }
    }
}

/// Fires when an object's own checksum differs from its stored checksum.
///
/// An absent store entry means "never seen before" and fires.
#[derive(Debug, Default)]
pub struct ContentModified;

impl OutdatednessRule for ContentModified {
    fn name(&self) -> &'static str {
        "content-modified"
    }

    fn apply(
        &self,
        document: &Document,
        checker: &OutdatednessChecker<'_>,
    ) -> Result<Option<OutdatednessReason>, CheckError> {
        let key = ObjectKey::for_document(document);
        let ch_old = match checker.store().get(&key) {
            Some(ch) => ch,
            None => return Ok(Some(OutdatednessReason::ContentModified)),
        };

        let ch_new = Checksummer::calc_document(document)?;
        if *ch_old != ch_new {
            Ok(Some(OutdatednessReason::ContentModified))
        } else {
            Ok(None)
        }
    }
}

/// Fires when the compilation rule governing an object has changed.
///
/// Fires on any asymmetry between the stored and the current rule
/// checksum: a rule that appeared, disappeared, or changed definition.
#[derive(Debug, Default)]
pub struct RulesModified;

impl OutdatednessRule for RulesModified {
    fn name(&self) -> &'static str {
        "rules-modified"
    }

    fn apply(
        &self,
        document: &Document,
        checker: &OutdatednessChecker<'_>,
    ) -> Result<Option<OutdatednessReason>, CheckError> {
        let key = ObjectKey::CompilationRule(document.identifier().clone());
        let ch_old = checker.store().get(&key);
        let ch_new: Option<Checksum> = checker
            .rule_index()
            .rule_for(document.identifier())
            .map(Checksummer::calc_rule);

        if ch_old != ch_new.as_ref() {
            Ok(Some(OutdatednessReason::RulesModified))
        } else {
            Ok(None)
        }
    }
}

/// Fires when any recorded dependency of the object is itself outdated, or
/// has disappeared from the site.
///
/// This is the recursive case: the dependency's own outdatedness is asked
/// through the checker, which memoizes results and breaks cycles
/// conservatively.
#[derive(Debug, Default)]
pub struct DependenciesOutdated;

impl OutdatednessRule for DependenciesOutdated {
    fn name(&self) -> &'static str {
        "dependencies-outdated"
    }

    fn apply(
        &self,
        document: &Document,
        checker: &OutdatednessChecker<'_>,
    ) -> Result<Option<OutdatednessReason>, CheckError> {
        for dependency in checker.deps().dependencies_of(document.identifier()) {
            // A dependency that vanished from the site must propagate:
            // content compiled against it is stale.
            if !checker.site().contains(&dependency) {
                return Ok(Some(OutdatednessReason::DependenciesOutdated));
            }
            if checker.outdated(&dependency)? {
                return Ok(Some(OutdatednessReason::DependenciesOutdated));
            }
        }
        Ok(None)
    }
}

/// Fires when the expected output artifact does not exist on disk.
///
/// Objects without an expected output path never fire.
#[derive(Debug, Default)]
pub struct NotWritten;

impl OutdatednessRule for NotWritten {
    fn name(&self) -> &'static str {
        "not-written"
    }

    fn apply(
        &self,
        document: &Document,
        _checker: &OutdatednessChecker<'_>,
    ) -> Result<Option<OutdatednessReason>, CheckError> {
        match document.output_path() {
            Some(path) if !path.exists() => Ok(Some(OutdatednessReason::NotWritten)),
            _ => Ok(None),
        }
    }
}

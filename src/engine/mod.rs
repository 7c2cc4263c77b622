//! engine
//!
//! The incremental-rebuild decision machinery.
//!
//! # Architecture
//!
//! One compilation run drives the engine through a uniform lifecycle:
//!
//! ```text
//! Load store -> Check objects -> Compile (external) -> Record -> Commit
//! ```
//!
//! 1. **Load**: read the previous run's checksum snapshot
//!    ([`ChecksumStore::load`]); missing or corrupt snapshots degrade to
//!    an empty store and a conservative full rebuild.
//! 2. **Check**: the pipeline asks [`OutdatednessChecker::outdated`] /
//!    [`OutdatednessChecker::reason_for`] per object before re-running
//!    filters and layouts for it.
//! 3. **Compile**: out of scope here; the pipeline transforms whatever
//!    the checker flagged.
//! 4. **Record**: [`record_checksums`] stages fresh fingerprints for
//!    every object of the run.
//! 5. **Commit**: [`ChecksumStore::commit`] atomically replaces the
//!    snapshot; only now do the staged fingerprints become the next
//!    run's baseline.
//!
//! # Invariants
//!
//! - The checker never mutates durable state; the store commit is the
//!   only durable mutation of a run
//! - A crash before commit leaves the previous snapshot intact, causing
//!   at worst extra rebuilds, never missed ones
//! - Rule evaluation is deterministic given the same site, store, and
//!   dependency graph

pub mod checker;
pub mod checksummer;
pub mod deps;
pub mod lock;
pub mod reasons;
pub mod rule_index;
pub mod rules;
pub mod store;

// Re-exports for convenience
pub use checker::{CheckError, OutdatednessChecker};
pub use checksummer::{ChecksumError, Checksummer};
pub use deps::{DependencyTracker, InMemoryDependencyTracker};
pub use lock::{LockError, StoreLock};
pub use reasons::{AffectedProps, OutdatednessReason};
pub use rule_index::RuleIndex;
pub use rules::{
    ConfigurationModified, ContentModified, DependenciesOutdated, NotWritten, OutdatednessRule,
    RulesModified,
};
pub use store::{ChecksumStore, ObjectKey, StoreError, StoreLoadResult, StoreWarning};

use crate::core::site::Site;

/// Stage fresh checksums for every object of a successful run.
///
/// Covers the configuration, every item and layout, and the compilation
/// rule governing each item. The caller commits the store afterwards;
/// until then nothing is visible to reads.
///
/// # Errors
///
/// Returns [`ChecksumError`] if any object's content is unreadable — the
/// run must not commit a snapshot it could not fully fingerprint.
pub fn record_checksums(
    store: &mut ChecksumStore,
    site: &Site,
    rule_index: &RuleIndex,
) -> Result<(), ChecksumError> {
    use crate::core::collection::Identifiable;

    store.set(ObjectKey::Config, Checksummer::calc_config(site.config())?);

    for item in site.items() {
        store.set(
            ObjectKey::for_document(item),
            Checksummer::calc_document(item)?,
        );
        if let Some(definition) = rule_index.rule_for(item.identifier()) {
            store.set(
                ObjectKey::CompilationRule(item.identifier().clone()),
                Checksummer::calc_rule(definition),
            );
        }
    }

    for layout in site.layouts() {
        store.set(
            ObjectKey::for_document(layout),
            Checksummer::calc_document(layout)?,
        );
    }

    Ok(())
}

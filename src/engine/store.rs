//! engine::store
//!
//! The persisted checksum store.
//!
//! # Lifecycle
//!
//! The store is read once at run start and replaced wholesale at run end:
//!
//! 1. `load` reads the previous run's snapshot (missing file → empty
//!    store; corrupt file → warning + empty store, so the run falls back
//!    to a conservative full rebuild instead of failing).
//! 2. `get` serves reads from that loaded snapshot for the whole run.
//! 3. `set` stages fresh checksums; staged writes are invisible to `get`.
//! 4. `commit` atomically persists exactly the staged state as the new
//!    snapshot.
//!
//! # Durability
//!
//! Commit writes a temp file in the store's directory, syncs it, and
//! renames it over the snapshot while holding an exclusive lock (see
//! [`StoreLock`]). A crash anywhere before the rename leaves the previous
//! snapshot intact byte-for-byte: the next run rebuilds more than strictly
//! necessary, never less.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lock::{LockError, StoreLock};
use crate::core::document::{Document, DocumentKind};
use crate::core::types::{Checksum, Identifier};

/// Snapshot format version accepted by this build.
const SNAPSHOT_VERSION: u32 = 1;

/// Errors from store persistence.
///
/// Read-side problems never surface here; they degrade to a
/// [`StoreWarning`] and an empty store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The snapshot could not be serialized.
    #[error("failed to serialize checksum store: {0}")]
    SerializeError(String),

    /// A file write failed during commit.
    #[error("failed to write checksum store '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The commit lock could not be taken or released.
    #[error("store lock error: {0}")]
    Lock(#[from] LockError),
}

/// A recoverable condition noticed while loading the store.
#[derive(Debug, Clone)]
pub struct StoreWarning {
    /// What went wrong.
    pub message: String,
    /// The store file concerned.
    pub path: PathBuf,
}

/// Result of loading the checksum store.
#[derive(Debug)]
pub struct StoreLoadResult {
    /// The loaded store (empty on first run or after a corrupt snapshot).
    pub store: ChecksumStore,
    /// Any warnings generated during loading.
    pub warnings: Vec<StoreWarning>,
}

/// Typed key of a checksummed object.
///
/// The persisted snapshot maps the stable string encodings of these keys
/// to checksums: `config`, `item:/about.md`, `layout:/default.html`,
/// `rule:/about.md`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKey {
    /// The site configuration (singleton).
    Config,
    /// A content item.
    Item(Identifier),
    /// A layout template.
    Layout(Identifier),
    /// The compilation rule governing an item.
    CompilationRule(Identifier),
}

impl ObjectKey {
    /// The key for a document, according to its kind.
    pub fn for_document(document: &Document) -> Self {
        use crate::core::collection::Identifiable;
        match document.kind() {
            DocumentKind::Item => ObjectKey::Item(document.identifier().clone()),
            DocumentKind::Layout => ObjectKey::Layout(document.identifier().clone()),
        }
    }

    /// Stable string encoding used in the persisted snapshot.
    fn encode(&self) -> String {
        match self {
            ObjectKey::Config => "config".to_string(),
            ObjectKey::Item(id) => format!("item:{}", id),
            ObjectKey::Layout(id) => format!("layout:{}", id),
            ObjectKey::CompilationRule(id) => format!("rule:{}", id),
        }
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// On-disk snapshot schema.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotV1 {
    version: u32,
    written_at: DateTime<Utc>,
    checksums: BTreeMap<String, Checksum>,
}

/// The checksum store: loaded snapshot plus staged writes.
#[derive(Debug)]
pub struct ChecksumStore {
    path: PathBuf,
    loaded: BTreeMap<String, Checksum>,
    staged: BTreeMap<String, Checksum>,
}

impl ChecksumStore {
    /// Load the store from its snapshot file.
    ///
    /// Never fails: a missing file means "first run" (empty store), and an
    /// unreadable, unparsable, or wrong-version file degrades to an empty
    /// store with a warning — at worst causing extra rebuilds, never
    /// missed ones.
    pub fn load(path: &Path) -> StoreLoadResult {
        let mut warnings = Vec::new();

        let loaded = if path.exists() {
            match Self::read_snapshot(path) {
                Ok(checksums) => checksums,
                Err(message) => {
                    warnings.push(StoreWarning {
                        message: format!(
                            "ignoring unusable checksum store ({message}); all objects will be treated as outdated"
                        ),
                        path: path.to_path_buf(),
                    });
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        StoreLoadResult {
            store: Self {
                path: path.to_path_buf(),
                loaded,
                staged: BTreeMap::new(),
            },
            warnings,
        }
    }

    fn read_snapshot(path: &Path) -> Result<BTreeMap<String, Checksum>, String> {
        let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let snapshot: SnapshotV1 = serde_json::from_str(&contents).map_err(|e| e.to_string())?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            ));
        }
        Ok(snapshot.checksums)
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The checksum recorded for a key by the previous committed run.
    ///
    /// Staged writes are not visible here until [`commit`](Self::commit)
    /// succeeds.
    pub fn get(&self, key: &ObjectKey) -> Option<&Checksum> {
        self.loaded.get(&key.encode())
    }

    /// Stage a checksum for the next snapshot.
    pub fn set(&mut self, key: ObjectKey, checksum: Checksum) {
        self.staged.insert(key.encode(), checksum);
    }

    /// Number of entries in the loaded snapshot.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether the loaded snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Atomically persist the staged state, replacing the prior snapshot.
    ///
    /// On success the staged entries become visible to [`get`](Self::get):
    /// the in-memory view matches what the next run will load.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Lock`] if another process is committing
    /// - [`StoreError::WriteError`] if the temp write or rename fails
    /// - [`StoreError::SerializeError`] if the snapshot cannot be encoded
    pub fn commit(&mut self) -> Result<(), StoreError> {
        let mut lock = StoreLock::acquire(&self.path)?;

        let snapshot = SnapshotV1 {
            version: SNAPSHOT_VERSION,
            written_at: Utc::now(),
            checksums: self.staged.clone(),
        };
        let contents = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::SerializeError(e.to_string()))?;

        // Write to a temp file in the same directory (for atomic rename)
        let temp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| StoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| StoreError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| StoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        // Atomic rename
        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        self.loaded = self.staged.clone();
        lock.release()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn checksum(s: &str) -> Checksum {
        Checksum::new(s).unwrap()
    }

    fn item_key(s: &str) -> ObjectKey {
        ObjectKey::Item(Identifier::new(s).unwrap())
    }

    mod object_key {
        use super::*;

        #[test]
        fn stable_encodings() {
            assert_eq!(ObjectKey::Config.to_string(), "config");
            assert_eq!(item_key("/about.md").to_string(), "item:/about.md");
            assert_eq!(
                ObjectKey::Layout(Identifier::new("/default.html").unwrap()).to_string(),
                "layout:/default.html"
            );
            assert_eq!(
                ObjectKey::CompilationRule(Identifier::new("/about.md").unwrap()).to_string(),
                "rule:/about.md"
            );
        }

        #[test]
        fn for_document_follows_kind() {
            let item = Document::item("/a.md", "").unwrap();
            let layout = Document::layout("/l.html", "").unwrap();
            assert_eq!(ObjectKey::for_document(&item).to_string(), "item:/a.md");
            assert_eq!(
                ObjectKey::for_document(&layout).to_string(),
                "layout:/l.html"
            );
        }
    }

    mod load {
        use super::*;

        #[test]
        fn missing_file_is_empty_store_without_warning() {
            let temp = TempDir::new().unwrap();
            let result = ChecksumStore::load(&temp.path().join("checksums.json"));
            assert!(result.store.is_empty());
            assert!(result.warnings.is_empty());
        }

        #[test]
        fn corrupt_file_warns_and_falls_back_to_empty() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("checksums.json");
            fs::write(&path, "{not json at all").unwrap();

            let result = ChecksumStore::load(&path);
            assert!(result.store.is_empty());
            assert_eq!(result.warnings.len(), 1);
            assert!(result.warnings[0].message.contains("outdated"));
            assert_eq!(result.warnings[0].path, path);
        }

        #[test]
        fn wrong_version_warns_and_falls_back_to_empty() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("checksums.json");
            fs::write(
                &path,
                r#"{"version": 99, "written_at": "2026-01-01T00:00:00Z", "checksums": {}}"#,
            )
            .unwrap();

            let result = ChecksumStore::load(&path);
            assert!(result.store.is_empty());
            assert_eq!(result.warnings.len(), 1);
            assert!(result.warnings[0].message.contains("version"));
        }
    }

    mod staging {
        use super::*;

        #[test]
        fn set_is_invisible_until_commit() {
            let temp = TempDir::new().unwrap();
            let mut store = ChecksumStore::load(&temp.path().join("checksums.json")).store;

            let key = item_key("/a.md");
            store.set(key.clone(), checksum("abc"));
            assert!(store.get(&key).is_none());
        }

        #[test]
        fn commit_makes_staged_entries_visible() {
            let temp = TempDir::new().unwrap();
            let mut store = ChecksumStore::load(&temp.path().join("checksums.json")).store;

            let key = item_key("/a.md");
            store.set(key.clone(), checksum("abc"));
            store.commit().unwrap();
            assert_eq!(store.get(&key), Some(&checksum("abc")));
        }

        #[test]
        fn commit_persists_for_the_next_load() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("checksums.json");

            let mut store = ChecksumStore::load(&path).store;
            store.set(ObjectKey::Config, checksum("cfg"));
            store.set(item_key("/a.md"), checksum("abc"));
            store.commit().unwrap();

            let reloaded = ChecksumStore::load(&path);
            assert!(reloaded.warnings.is_empty());
            assert_eq!(reloaded.store.len(), 2);
            assert_eq!(reloaded.store.get(&ObjectKey::Config), Some(&checksum("cfg")));
        }

        #[test]
        fn commit_replaces_wholesale() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("checksums.json");

            let mut store = ChecksumStore::load(&path).store;
            store.set(item_key("/old.md"), checksum("old"));
            store.commit().unwrap();

            // Next run stages only the surviving object.
            let mut store = ChecksumStore::load(&path).store;
            assert_eq!(store.len(), 1);
            store.set(item_key("/new.md"), checksum("new"));
            store.commit().unwrap();

            let reloaded = ChecksumStore::load(&path).store;
            assert!(reloaded.get(&item_key("/old.md")).is_none());
            assert!(reloaded.get(&item_key("/new.md")).is_some());
        }
    }

    mod durability {
        use super::*;

        #[test]
        fn uncommitted_state_leaves_snapshot_untouched() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("checksums.json");

            let mut store = ChecksumStore::load(&path).store;
            store.set(item_key("/a.md"), checksum("abc"));
            store.commit().unwrap();
            let before = fs::read(&path).unwrap();

            // Simulated crash: stage new state, then drop without commit.
            let mut store = ChecksumStore::load(&path).store;
            store.set(item_key("/a.md"), checksum("changed"));
            store.set(item_key("/b.md"), checksum("new"));
            drop(store);

            let after = fs::read(&path).unwrap();
            assert_eq!(before, after);
        }

        #[test]
        fn no_temp_file_left_after_commit() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("checksums.json");

            let mut store = ChecksumStore::load(&path).store;
            store.set(item_key("/a.md"), checksum("abc"));
            store.commit().unwrap();

            assert!(!path.with_extension("json.tmp").exists());
        }

        #[test]
        fn snapshot_is_versioned_json() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("checksums.json");

            let mut store = ChecksumStore::load(&path).store;
            store.set(ObjectKey::Config, checksum("cfg"));
            store.commit().unwrap();

            let contents = fs::read_to_string(&path).unwrap();
            let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
            assert_eq!(value["version"], 1);
            assert!(value["written_at"].is_string());
            assert_eq!(value["checksums"]["config"], "cfg");
        }
    }
}

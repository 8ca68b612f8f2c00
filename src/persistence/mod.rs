//! # Persistence Module
//!
//! ## Why This Module Exists
//! The mapping document is the only state JoyKey keeps between runs: a flat
//! JSON object from logical controller inputs to key-combo descriptors. This
//! module owns that document - loading it at startup, handing out lookups to
//! the poll loop, and writing it back whenever the settings dialog mutates
//! an entry.
//!
//! ## Error Handling Strategy
//! Follows a "fail-safe" approach: a missing or unparseable file silently
//! degrades to the built-in defaults so the remapper always starts with a
//! usable table. Saves overwrite in place with no atomic-rename or backup;
//! a crash mid-write is covered by the load path's fallback.
//!
//! ## Thread Safety
//! The store is shared as `Arc<MappingStore>` between the UI thread (writes
//! from the settings dialog) and the poll worker (reads on every dispatch).
//! Access goes through a bounded try-lock retry so neither side can block
//! the other indefinitely.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::mapping::{default_mappings, PadInput};

const CONFIG_DIR: &str = ".config/joykey";
const MAPPING_FILE: &str = "mappings.json";

const LOCK_MAX_ATTEMPTS: usize = 5;
const LOCK_RETRY_DELAY_MS: u64 = 10;

/// Errors surfaced by explicit store operations (saving, mutation).
///
/// Load failures never reach the caller; they fall back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not acquire mapping lock after {LOCK_MAX_ATTEMPTS} attempts")]
    LockTimeout,

    #[error("failed to write mapping file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize mapping document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Thread-safe owner of the persisted mapping document.
pub struct MappingStore {
    path: PathBuf,
    mapping: Arc<RwLock<BTreeMap<PadInput, String>>>,
}

impl MappingStore {
    /// Default location of the mapping document.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| {
            warn!("Could not determine home directory, using working directory");
            PathBuf::from(".")
        });
        path.push(CONFIG_DIR);
        path.push(MAPPING_FILE);
        path
    }

    /// Loads the document at `path`, falling back to the built-in defaults
    /// on any read or parse failure.
    pub fn load(path: PathBuf) -> Self {
        let mapping = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<PadInput, String>>(&raw) {
                Ok(map) => {
                    info!("Loaded {} mappings from {}", map.len(), path.display());
                    map
                }
                Err(e) => {
                    warn!(
                        "Mapping file {} is invalid ({}), using defaults",
                        path.display(),
                        e
                    );
                    default_mappings()
                }
            },
            Err(e) => {
                debug!(
                    "Mapping file {} not readable ({}), using defaults",
                    path.display(),
                    e
                );
                default_mappings()
            }
        };

        Self {
            path,
            mapping: Arc::new(RwLock::new(mapping)),
        }
    }

    /// Returns the combo mapped to `input`, if any.
    ///
    /// Called by the poll worker on every rising edge, so retries yield to
    /// the runtime instead of parking the worker thread. Sustained lock
    /// contention is answered with `None` (the dispatch is skipped, not
    /// delayed).
    pub async fn combo_for(&self, input: PadInput) -> Option<String> {
        let mut attempts = 0;
        loop {
            match self.mapping.try_read() {
                Ok(guard) => return guard.get(&input).cloned(),
                Err(e) => {
                    attempts += 1;
                    warn!(
                        "Mapping read lock blocked: {} (attempt {}/{})",
                        e, attempts, LOCK_MAX_ATTEMPTS
                    );
                    if attempts >= LOCK_MAX_ATTEMPTS {
                        warn!("Mapping lookup for {} timed out", input);
                        return None;
                    }
                    tokio::time::sleep(Duration::from_millis(LOCK_RETRY_DELAY_MS)).await;
                }
            }
        }
    }

    /// Clone of the full mapping table, for display in the settings dialog.
    pub fn snapshot(&self) -> BTreeMap<PadInput, String> {
        self.with_mapping(|map| map.clone()).unwrap_or_else(|e| {
            warn!("Mapping snapshot failed: {}", e);
            BTreeMap::new()
        })
    }

    /// Inserts or replaces an entry and persists the document.
    pub fn set(&self, input: PadInput, combo: String) -> Result<(), StoreError> {
        self.with_mapping_mut(|map| {
            map.insert(input, combo);
        })?;
        self.save()
    }

    /// Removes an entry (no-op if absent) and persists the document.
    pub fn remove(&self, input: PadInput) -> Result<(), StoreError> {
        self.with_mapping_mut(|map| {
            map.remove(&input);
        })?;
        self.save()
    }

    /// Writes the current mapping table as pretty-printed JSON.
    ///
    /// Overwrites in place; the parent directory is created on demand.
    pub fn save(&self) -> Result<(), StoreError> {
        let snapshot = self.with_mapping(|map| map.clone())?;
        let json = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        debug!(
            "Saved {} mappings to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }

    fn with_mapping<R>(
        &self,
        op: impl FnOnce(&BTreeMap<PadInput, String>) -> R,
    ) -> Result<R, StoreError> {
        let mut attempts = 0;
        loop {
            match self.mapping.try_read() {
                Ok(guard) => return Ok(op(&guard)),
                Err(e) => {
                    attempts += 1;
                    warn!(
                        "Mapping read lock blocked: {} (attempt {}/{})",
                        e, attempts, LOCK_MAX_ATTEMPTS
                    );
                    if attempts >= LOCK_MAX_ATTEMPTS {
                        return Err(StoreError::LockTimeout);
                    }
                    std::thread::sleep(std::time::Duration::from_millis(LOCK_RETRY_DELAY_MS));
                }
            }
        }
    }

    fn with_mapping_mut(
        &self,
        op: impl FnOnce(&mut BTreeMap<PadInput, String>),
    ) -> Result<(), StoreError> {
        let mut attempts = 0;
        loop {
            match self.mapping.try_write() {
                Ok(mut guard) => {
                    op(&mut guard);
                    return Ok(());
                }
                Err(e) => {
                    attempts += 1;
                    warn!(
                        "Mapping write lock blocked: {} (attempt {}/{})",
                        e, attempts, LOCK_MAX_ATTEMPTS
                    );
                    if attempts >= LOCK_MAX_ATTEMPTS {
                        return Err(StoreError::LockTimeout);
                    }
                    std::thread::sleep(std::time::Duration::from_millis(LOCK_RETRY_DELAY_MS));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_mapping_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("joykey-test-{}-{}", tag, std::process::id()));
        path.push(MAPPING_FILE);
        path
    }

    fn cleanup(path: &std::path::Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = temp_mapping_path("missing");
        let store = MappingStore::load(path.clone());
        assert_eq!(store.snapshot(), default_mappings());
        cleanup(&path);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let path = temp_mapping_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let store = MappingStore::load(path.clone());
        assert_eq!(store.snapshot(), default_mappings());
        cleanup(&path);
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_mapping_path("roundtrip");
        let store = MappingStore::load(path.clone());
        store.set(PadInput::A, "Ctrl+Shift+z".to_string()).unwrap();
        store.remove(PadInput::Select).unwrap();
        let expected = store.snapshot();

        let reloaded = MappingStore::load(path.clone());
        assert_eq!(reloaded.snapshot(), expected);
        cleanup(&path);
    }

    #[test]
    fn mutations_persist_synchronously() {
        let path = temp_mapping_path("sync");
        let store = MappingStore::load(path.clone());
        store.set(PadInput::LeftStick, "F5".to_string()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let on_disk: BTreeMap<PadInput, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            on_disk.get(&PadInput::LeftStick).map(String::as_str),
            Some("F5")
        );
        cleanup(&path);
    }

    #[tokio::test]
    async fn lookup_returns_mapped_combo() {
        let path = temp_mapping_path("lookup");
        let store = MappingStore::load(path.clone());
        assert_eq!(
            store.combo_for(PadInput::RightShoulder).await.as_deref(),
            Some("Ctrl+z")
        );
        assert_eq!(store.combo_for(PadInput::LeftStick).await, None);
        cleanup(&path);
    }
}

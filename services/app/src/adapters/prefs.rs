//! services/app/src/adapters/prefs.rs
//!
//! File-backed `PreferenceStore`: a single flat JSON object on disk,
//! read-modify-written on each `set`. Holds the language selection and
//! nothing else, so contention and file size are non-concerns.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use mimea_core::ports::{PortError, PortResult, PreferenceStore};

pub struct FilePreferenceStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            guard: Mutex::new(()),
        }
    }

    fn load(&self) -> PortResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| PortError::Unexpected(format!("preference file is corrupt: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(PortError::Unexpected(format!(
                "could not read preference file: {e}"
            ))),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let _held = self
            .guard
            .lock()
            .map_err(|_| PortError::Unexpected("preference lock poisoned".into()))?;
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let _held = self
            .guard
            .lock()
            .map_err(|_| PortError::Unexpected("preference lock poisoned".into()))?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        let raw = serde_json::to_string_pretty(&entries)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PortError::Unexpected(format!("could not create preference directory: {e}"))
                })?;
            }
        }
        std::fs::write(&self.path, raw)
            .map_err(|e| PortError::Unexpected(format!("could not write preference file: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        store.set("language", "sw").unwrap();
        assert_eq!(store.get("language").unwrap().as_deref(), Some("sw"));
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.get("language").unwrap(), None);
    }

    #[test]
    fn set_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        store.set("language", "en").unwrap();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("language").unwrap().as_deref(), Some("en"));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_file_surfaces_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FilePreferenceStore::new(path);
        assert!(store.get("language").is_err());
    }
}

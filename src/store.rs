use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

use crate::error::PortalError;

/// Narrow seam over the backing storage so the JSON layer can later be
/// pointed at something other than the local filesystem without touching
/// callers.
pub trait StoragePort {
    fn read(&self, path: &Path) -> io::Result<String>;
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct FsStorage;

impl StoragePort for FsStorage {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Serializes with a 4-space indent so the files on disk stay hand-editable.
pub fn pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)?;
    Ok(String::from_utf8(buf).unwrap_or_default())
}

/// Load-or-default / save over a single JSON file. Every route reloads from
/// disk and every save is a full rewrite, so the file is the single source
/// of truth.
#[derive(Debug, Clone, Default)]
pub struct JsonStore<S: StoragePort = FsStorage> {
    backend: S,
}

impl JsonStore<FsStorage> {
    pub fn new() -> Self {
        JsonStore { backend: FsStorage }
    }
}

impl<S: StoragePort> JsonStore<S> {
    pub fn with_backend(backend: S) -> Self {
        JsonStore { backend }
    }

    /// Falls back to `default` when the file is missing, unreadable or not
    /// valid JSON. Failures are logged, never propagated, so end-user pages
    /// keep rendering.
    pub fn load_or_default<T: DeserializeOwned>(&self, path: &Path, default: T) -> T {
        if !self.backend.exists(path) {
            return default;
        }
        match self.backend.read(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(err) => {
                    log::warn!("undecodable JSON in {}: {}", path.display(), err);
                    default
                }
            },
            Err(err) => {
                log::warn!("failed to read {}: {}", path.display(), err);
                default
            }
        }
    }

    /// Like `load_or_default`, but a missing file is first seeded with the
    /// default so it shows up on disk for hand editing.
    pub fn load_or_create<T>(&self, path: &Path, default: T) -> T
    where
        T: DeserializeOwned + Serialize,
    {
        if !self.backend.exists(path) {
            if let Err(err) = self.save(path, &default) {
                log::warn!("failed to seed {}: {}", path.display(), err);
            }
            return default;
        }
        self.load_or_default(path, default)
    }

    /// Full rewrite of the file, pretty-printed.
    pub fn save<T: Serialize + ?Sized>(&self, path: &Path, data: &T) -> Result<(), PortalError> {
        let text = pretty_json(data).map_err(|err| PortalError::JsonWrite {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        self.backend
            .write(path, text.as_bytes())
            .map_err(|err| PortalError::JsonWrite {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn load_or_default_survives_garbage_and_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStore::new();

        let missing = tmp.path().join("missing.json");
        let value: Vec<String> = store.load_or_default(&missing, vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback".to_string()]);
        assert!(!missing.exists());

        let garbage = tmp.path().join("garbage.json");
        fs::write(&garbage, "{not json").unwrap();
        let value: Value = store.load_or_default(&garbage, json!({"ok": true}));
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn load_or_create_seeds_the_file_once() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStore::new();
        let path = tmp.path().join("seeded.json");

        let first: Value = store.load_or_create(&path, json!({"answer": 42}));
        assert_eq!(first, json!({"answer": 42}));
        assert!(path.exists());

        // Second access reads what was written, not the default.
        let second: Value = store.load_or_create(&path, json!({"answer": 0}));
        assert_eq!(second, json!({"answer": 42}));
    }

    #[test]
    fn save_pretty_prints_with_four_space_indent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStore::new();
        let path = tmp.path().join("pretty.json");

        store.save(&path, &json!({"outer": {"inner": 1}})).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"outer\""));
        assert!(text.contains("\n        \"inner\""));
    }
}

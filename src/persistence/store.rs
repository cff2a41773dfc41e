use std::{
    collections::BTreeMap,
    path::{
        Path,
        PathBuf,
    },
    sync::Mutex,
};

use log::warn;

use super::{
    load_json_from,
    write_json_atomic,
};
use crate::core::{
    utils::lock,
    BushouError,
};

pub const STORE_FILE: &str = "store.json";

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, BushouError>;

    fn set(&self, key: &str, value: &str) -> Result<(), BushouError>;
}

/// Key-value store kept as one JSON object on disk. Every `set` rewrites the
/// whole document atomically.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_guard: Mutex::new(()) }
    }

    pub fn in_app_data_dir() -> Self {
        Self::new(super::get_data_file_path(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, BushouError> {
        load_json_from(&self.path)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, BushouError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BushouError> {
        let _guard = lock(&self.write_guard);

        // A corrupt document is replaced; read failures are not
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(BushouError::Json(e)) => {
                warn!("Replacing unreadable store {:?}: {}", self.path, e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());
        write_json_atomic(&values, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_set_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join(STORE_FILE));

        assert_eq!(store.get("missing").unwrap(), None);

        store.set("a", "[1,2]").unwrap();
        store.set("b", "true").unwrap();
        store.set("a", "[3]").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("[3]"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("a").is_err());

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_read_failure_leaves_document_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        // Not UTF-8, so reading fails as I/O before any JSON parsing
        let original = b"{\"a\": \"\xff\"}".to_vec();
        fs::write(&path, &original).unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.set("b", "2"), Err(BushouError::Io(_))));
        assert_eq!(fs::read(&path).unwrap(), original);
    }
}

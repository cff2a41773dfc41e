use std::{
    collections::BTreeSet,
    sync::{
        Arc,
        Mutex,
    },
};

use log::warn;

use super::Revision;
use crate::{
    core::{
        utils::lock,
        BushouError,
    },
    persistence::KeyValueStore,
};

pub const BOOKMARKS_KEY: &str = "difficultRadicals";

/// Radicals marked as difficult. Every toggle is written through to the store.
pub struct BookmarkSet {
    store: Arc<dyn KeyValueStore>,
    marked: Mutex<BTreeSet<u32>>,
    revision: Revision,
}

impl BookmarkSet {
    /// Loads the set, starting empty when the stored value is absent or unreadable.
    pub fn load(store: Arc<dyn KeyValueStore>, revision: Revision) -> Self {
        let marked = match store.get(BOOKMARKS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<u32>>(&json) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!("Ignoring corrupt bookmark data: {}", e);
                    BTreeSet::new()
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!("Failed to read bookmarks: {}", e);
                BTreeSet::new()
            }
        };

        Self { store, marked: Mutex::new(marked), revision }
    }

    pub fn is_marked(&self, id: u32) -> bool {
        lock(&self.marked).contains(&id)
    }

    pub fn marked(&self) -> BTreeSet<u32> {
        lock(&self.marked).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.marked).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.marked).is_empty()
    }

    /// Flips `id` and persists the whole set. When the write fails the set is
    /// left as it was. Returns whether `id` is now marked.
    pub fn toggle(&self, id: u32) -> Result<bool, BushouError> {
        let now_marked = {
            let mut marked = lock(&self.marked);
            let now_marked = if marked.remove(&id) {
                false
            } else {
                marked.insert(id);
                true
            };

            let written = serde_json::to_string(&*marked)
                .map_err(BushouError::from)
                .and_then(|json| self.store.set(BOOKMARKS_KEY, &json));
            if let Err(e) = written {
                if now_marked {
                    marked.remove(&id);
                } else {
                    marked.insert(id);
                }
                return Err(e);
            }
            now_marked
        };

        self.revision.bump();
        Ok(now_marked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{
        store::STORE_FILE,
        FileStore,
    };

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _: &str) -> Result<Option<String>, BushouError> {
            Ok(Some("[3]".to_string()))
        }

        fn set(&self, _: &str, _: &str) -> Result<(), BushouError> {
            Err(BushouError::Custom("read-only".to_string()))
        }
    }

    #[test]
    fn test_toggle_twice_restores_serialization() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path().join(STORE_FILE)));
        store.set(BOOKMARKS_KEY, "[7,42]").unwrap();

        let bookmarks = BookmarkSet::load(store.clone(), Revision::new());
        let before = store.get(BOOKMARKS_KEY).unwrap();

        assert!(bookmarks.toggle(9).unwrap());
        assert!(bookmarks.is_marked(9));
        assert_eq!(store.get(BOOKMARKS_KEY).unwrap().as_deref(), Some("[7,9,42]"));

        assert!(!bookmarks.toggle(9).unwrap());
        assert!(!bookmarks.is_marked(9));
        assert_eq!(store.get(BOOKMARKS_KEY).unwrap(), before);
    }

    #[test]
    fn test_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);

        let bookmarks = BookmarkSet::load(Arc::new(FileStore::new(&path)), Revision::new());
        bookmarks.toggle(85).unwrap();
        bookmarks.toggle(1).unwrap();

        let reloaded = BookmarkSet::load(Arc::new(FileStore::new(&path)), Revision::new());
        assert_eq!(reloaded.marked(), BTreeSet::from([1, 85]));
    }

    #[test]
    fn test_corrupt_value_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path().join(STORE_FILE)));
        store.set(BOOKMARKS_KEY, "{\"not\": \"a list\"}").unwrap();

        let bookmarks = BookmarkSet::load(store, Revision::new());
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let revision = Revision::new();
        let bookmarks = BookmarkSet::load(Arc::new(ReadOnlyStore), revision.clone());
        assert!(bookmarks.is_marked(3));

        assert!(bookmarks.toggle(3).is_err());
        assert!(bookmarks.is_marked(3));
        assert!(bookmarks.toggle(4).is_err());
        assert!(!bookmarks.is_marked(4));
        assert_eq!(revision.current(), 0);
    }
}

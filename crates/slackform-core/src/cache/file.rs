// One JSON file per key under a cache directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::ListCache;

#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `true` if `key` names a file directly inside the cache directory.
    pub fn is_valid_key(key: &str) -> bool {
        !key.is_empty() && !key.contains("..") && !key.contains(['/', '\\'])
    }

    /// `<dir>/<key>.json`, or `None` if the key would escape the directory.
    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        if !Self::is_valid_key(key) {
            warn!(key, "rejecting cache key");
            return None;
        }
        Some(self.dir.join(format!("{key}.json")))
    }

    /// Write through a temp file in the same directory and rename it into
    /// place, so readers see either the old or the new file.
    fn write_atomic(&self, path: &Path, value: &Value) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, value)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ListCache for FileCache {
    fn load(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no cache file");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable cache file");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed cache file");
                None
            }
        }
    }

    fn store(&self, key: &str, value: &Value) {
        let Some(path) = self.path_for(key) else {
            return;
        };
        match self.write_atomic(&path, value) {
            Ok(()) => debug!(path = %path.display(), "cache file written"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write cache file"),
        }
    }

    fn clear(&self, key: &str) {
        let Some(path) = self.path_for(key) else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "cache file removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove cache file"),
        }
    }

    fn clear_all(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "failed to list cache dir");
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Err(e) = fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %e, "failed to remove cache file");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::cache::USERGROUPS_CACHE_KEY;

    #[test]
    fn store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let value = json!([{ "id": "S1", "prefs": { "channels": ["C1"] } }]);

        cache.store("usergroups", &value);

        assert_eq!(cache.load("usergroups"), Some(value));
        assert!(dir.path().join("usergroups.json").exists());
    }

    #[test]
    fn never_stored_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("not-yet-created"));
        assert_eq!(cache.load("usergroups"), None);
    }

    #[test]
    fn malformed_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("usergroups.json"), b"[{\"id\":").unwrap();
        let cache = FileCache::new(dir.path());
        assert_eq!(cache.load("usergroups"), None);
    }

    #[test]
    fn store_overwrites_and_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"));

        cache.store("k", &json!([1]));
        cache.store("k", &json!([2]));

        assert_eq!(cache.load("k"), Some(json!([2])));
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .flatten()
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn unwritable_dir_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let cache = FileCache::new(&blocker);

        cache.store("k", &json!([1]));

        assert_eq!(cache.load("k"), None);
    }

    #[test]
    fn clear_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        cache.store("a", &json!([]));
        cache.store("b", &json!([]));

        cache.clear("a");
        assert_eq!(cache.load("a"), None);
        assert!(cache.load("b").is_some());

        cache.clear_all();
        assert_eq!(cache.load("b"), None);
        cache.clear("a");
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let outside = root.path().join("outside.json");
        fs::write(&outside, b"[]").unwrap();
        let cache = FileCache::new(root.path().join("cache"));

        for key in ["../outside", "a/b", "a\\b", "..", ""] {
            assert!(!FileCache::is_valid_key(key), "{key}");
            assert_eq!(cache.path_for(key), None);
        }
        cache.clear("../outside");
        cache.store("../outside", &json!([1]));

        assert_eq!(fs::read(&outside).unwrap(), b"[]");
        assert_eq!(cache.load("../outside"), None);
        assert!(FileCache::is_valid_key(USERGROUPS_CACHE_KEY));
    }
}

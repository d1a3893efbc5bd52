use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{BotError, Result};

pub const DEFAULT_STORE_PATH: &str = "./locations.json";

/// A point in the game world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}, z={}", self.x, self.y, self.z)
    }
}

/// Outcome of reading the backing file.
#[derive(Debug)]
pub enum LoadStatus {
    /// File parsed; holds the number of entries.
    Loaded(usize),
    /// No file yet; the store is empty.
    Missing,
    /// File unreadable or corrupt; the store was reset to empty.
    Recovered(BotError),
}

/// Place name to coordinate text, backed by a pretty-printed JSON object.
///
/// The in-memory map is only a working copy: callers [`reload`](Self::reload)
/// before every read or mutation so edits made by other processes or by hand
/// are picked up. Mutations are written back immediately.
#[derive(Debug)]
pub struct LocationStore {
    path: PathBuf,
    entries: IndexMap<String, String>,
}

impl LocationStore {
    pub fn open(path: impl Into<PathBuf>) -> (Self, LoadStatus) {
        let mut store = Self {
            path: path.into(),
            entries: IndexMap::new(),
        };
        let status = store.reload();
        (store, status)
    }

    /// Replace the in-memory map with the file's content. Never fails: a
    /// missing or broken file yields an empty store.
    pub fn reload(&mut self) -> LoadStatus {
        match read_entries(&self.path) {
            Ok(Some(entries)) => {
                self.entries = entries;
                tracing::debug!(path = %self.path.display(), count = self.entries.len(), "Loaded locations");
                LoadStatus::Loaded(self.entries.len())
            }
            Ok(None) => {
                self.entries.clear();
                tracing::info!(path = %self.path.display(), "No locations file yet, starting empty");
                LoadStatus::Missing
            }
            Err(e) => {
                self.entries.clear();
                tracing::error!(path = %self.path.display(), "Failed to load locations, starting empty:\n{}", e.tree());
                LoadStatus::Recovered(e)
            }
        }
    }

    /// Write the whole map. The content goes to a sibling temp file first and
    /// is renamed over the target, so a failed write keeps the old file.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.temp_path();

        fs::write(&tmp, json).map_err(|e| {
            BotError::new("store_write")
                .push_str(tmp.display().to_string())
                .push_std(e)
        })?;

        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(BotError::new("store_rename")
                .push_str(self.path.display().to_string())
                .push_std(e));
        }

        tracing::debug!(path = %self.path.display(), count = self.entries.len(), "Saved locations");
        Ok(())
    }

    pub fn get(&self, place: &str) -> Option<&str> {
        self.entries.get(place).map(String::as_str)
    }

    pub fn contains(&self, place: &str) -> bool {
        self.entries.contains_key(place)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Place names containing `fragment`, case-sensitive, at most `limit`.
    pub fn matching(&self, fragment: &str, limit: usize) -> Vec<&str> {
        self.entries
            .keys()
            .filter(|place| place.contains(fragment))
            .take(limit)
            .map(String::as_str)
            .collect()
    }

    /// Insert or overwrite `place` and persist. If the write fails the map
    /// is restored and the error returned.
    pub fn insert(&mut self, place: &str, coordinate: String) -> Result<Option<String>> {
        let previous = self.entries.insert(place.to_string(), coordinate);

        if let Err(e) = self.save() {
            match &previous {
                Some(old) => {
                    self.entries.insert(place.to_string(), old.clone());
                }
                None => {
                    self.entries.shift_remove(place);
                }
            }
            return Err(BotError::new("store_insert").push_any(e));
        }

        Ok(previous)
    }

    /// Remove `place` and persist. If the write fails the entry is put back
    /// at its old position and the error returned.
    pub fn remove(&mut self, place: &str) -> Result<Option<String>> {
        let Some((index, key, value)) = self.entries.shift_remove_full(place) else {
            return Ok(None);
        };

        if let Err(e) = self.save() {
            self.entries.shift_insert(index, key, value);
            return Err(BotError::new("store_remove").push_any(e));
        }

        Ok(Some(value))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "locations.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn read_entries(path: &Path) -> Result<Option<IndexMap<String, String>>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(BotError::new("store_read").push_std(e)),
    };

    let entries = serde_json::from_str(&data).map_err(|e| BotError::new("store_parse").push_std(e))?;
    Ok(Some(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn spawn() -> String {
        Coordinate { x: 0, y: 64, z: 0 }.to_string()
    }

    #[test]
    fn test_coordinate_format() {
        assert_eq!(spawn(), "x=0, y=64, z=0");
        assert_eq!(Coordinate { x: -12, y: 3, z: -400 }.to_string(), "x=-12, y=3, z=-400");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let (store, status) = LocationStore::open(dir.path().join("locations.json"));
        assert!(matches!(status, LoadStatus::Missing));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_recovers_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        fs::write(&path, "{ not json").unwrap();

        let (store, status) = LocationStore::open(&path);
        match status {
            LoadStatus::Recovered(e) => assert_eq!(e.key, "store_parse"),
            other => panic!("expected Recovered, got {:?}", other),
        }
        assert!(store.is_empty());
        // the broken file is left alone
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_non_string_values_are_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        fs::write(&path, r#"{"Spawn": 12}"#).unwrap();

        let (store, status) = LocationStore::open(&path);
        assert!(matches!(status, LoadStatus::Recovered(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_persists_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (mut store, _) = LocationStore::open(&path);

        assert_eq!(store.insert("Spawn", spawn()).unwrap(), None);

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n  \"Spawn\": \"x=0, y=64, z=0\"\n}");
        assert!(!dir.path().join("locations.json.tmp").exists());
    }

    #[test]
    fn test_reload_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (mut store, _) = LocationStore::open(&path);
        store.insert("Spawn", spawn()).unwrap();
        store.insert("村", "x=100, y=70, z=-20".to_string()).unwrap();
        store.insert("Nether Portal", "x=-8, y=65, z=3".to_string()).unwrap();

        let (reloaded, status) = LocationStore::open(&path);
        assert!(matches!(status, LoadStatus::Loaded(3)));
        let before: Vec<_> = store.iter().collect();
        let after: Vec<_> = reloaded.iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let dir = tempdir().unwrap();
        let (mut store, _) = LocationStore::open(dir.path().join("locations.json"));
        store.insert("A", "x=1, y=1, z=1".to_string()).unwrap();
        store.insert("B", "x=2, y=2, z=2".to_string()).unwrap();

        let previous = store.insert("A", "x=9, y=9, z=9".to_string()).unwrap();
        assert_eq!(previous.as_deref(), Some("x=1, y=1, z=1"));
        assert_eq!(store.get("A"), Some("x=9, y=9, z=9"));

        let order: Vec<&str> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_reload_picks_up_external_edit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (mut store, _) = LocationStore::open(&path);
        store.insert("Spawn", spawn()).unwrap();

        fs::write(&path, r#"{"Base": "x=5, y=6, z=7"}"#).unwrap();
        store.reload();

        assert!(!store.contains("Spawn"));
        assert_eq!(store.get("Base"), Some("x=5, y=6, z=7"));
    }

    #[test]
    fn test_remove_only_that_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (mut store, _) = LocationStore::open(&path);
        store.insert("A", "x=1, y=1, z=1".to_string()).unwrap();
        store.insert("B", "x=2, y=2, z=2".to_string()).unwrap();

        assert_eq!(store.remove("A").unwrap().as_deref(), Some("x=1, y=1, z=1"));
        assert_eq!(store.remove("A").unwrap(), None);

        let (reloaded, _) = LocationStore::open(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("B"), Some("x=2, y=2, z=2"));
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let dir = tempdir().unwrap();
        // parent directory does not exist, so every write fails
        let path = dir.path().join("missing").join("locations.json");
        let (mut store, _) = LocationStore::open(&path);

        let err = store.insert("Spawn", spawn()).unwrap_err();
        assert_eq!(err.key, "store_insert");
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_remove_restores_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        fs::write(&path, r#"{"A": "a", "B": "b", "C": "c"}"#).unwrap();
        let (mut store, _) = LocationStore::open(&path);

        // point the store at a directory that does not exist
        store.path = dir.path().join("sub").join("locations.json");
        let err = store.remove("B").unwrap_err();
        assert_eq!(err.key, "store_remove");

        let order: Vec<&str> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_matching_is_case_sensitive_substring() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        fs::write(
            &path,
            r#"{"Village": "a", "village well": "b", "Ocean Monument": "c", "Nether Village": "d"}"#,
        )
        .unwrap();
        let (store, _) = LocationStore::open(&path);

        assert_eq!(store.matching("Village", 25), vec!["Village", "Nether Village"]);
        assert_eq!(store.matching("illa", 25), vec!["Village", "village well", "Nether Village"]);
        assert_eq!(store.matching("", 2), vec!["Village", "village well"]);
        assert!(store.matching("Stronghold", 25).is_empty());
    }
}

//! Persisted browsing position
//!
//! The last viewed playlist, artist and album positions survive power loss.
//! They are loaded once at boot (missing or unreadable values become 0) and
//! all three are written back whenever the user changes a selection. Values
//! are never validated against the cache; they only pick the first page to
//! show.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::StoreError;

/// Namespace the selection keys live under
pub const SELECTION_NAMESPACE: &str = "amperfy";
pub const KEY_LAST_PLAYLIST: &str = "lastPlaylist";
pub const KEY_LAST_ARTIST: &str = "lastArtist";
pub const KEY_LAST_ALBUM: &str = "lastAlbum";

/// Durable key/value slots holding small integers
pub trait SelectionStore {
    /// `Ok(None)` when the key was never written
    fn read_u8(&self, key: &str) -> Result<Option<u8>, StoreError>;

    fn write_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError>;

    /// Make previous writes durable
    fn commit(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<S: SelectionStore + ?Sized> SelectionStore for &mut S {
    fn read_u8(&self, key: &str) -> Result<Option<u8>, StoreError> {
        (**self).read_u8(key)
    }

    fn write_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError> {
        (**self).write_u8(key, value)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        (**self).commit()
    }
}

impl<S: SelectionStore + ?Sized> SelectionStore for Box<S> {
    fn read_u8(&self, key: &str) -> Result<Option<u8>, StoreError> {
        (**self).read_u8(key)
    }

    fn write_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError> {
        (**self).write_u8(key, value)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        (**self).commit()
    }
}

/// Volatile store for tests and simulation
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, u8>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemoryStore {
    fn read_u8(&self, key: &str) -> Result<Option<u8>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn write_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

/// One JSON object per namespace, rewritten on commit
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, u8>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing or corrupt file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!("Ignoring unreadable store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        debug!("Opened store {} ({} keys)", path.display(), values.len());
        Self { path, values }
    }

    /// Open `<config dir>/<app>/<namespace>.json`
    pub fn open_namespace(app: &str, namespace: &str) -> Result<Self, StoreError> {
        let dir = config_dir(app).ok_or(StoreError::NoConfigDir)?;
        Ok(Self::open(dir.join(format!("{}.json", namespace))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionStore for JsonFileStore {
    fn read_u8(&self, key: &str) -> Result<Option<u8>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn write_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/<app>`, falling back to `~/.config/<app>`
pub fn config_dir(app: &str) -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config);
        if path.is_absolute() {
            return Some(path.join(app));
        }
    }

    dirs::home_dir().map(|h| h.join(".config").join(app))
}

/// The three remembered list positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionMemory {
    pub last_playlist: u8,
    pub last_artist: u8,
    pub last_album: u8,
}

/// Selection memory backed by a store
#[derive(Debug)]
pub struct Selections<S> {
    store: S,
    memory: SelectionMemory,
}

impl<S: SelectionStore> Selections<S> {
    /// Wrap `store`; positions start at 0 until [`load_selections`](Self::load_selections)
    pub fn new(store: S) -> Self {
        Self {
            store,
            memory: SelectionMemory::default(),
        }
    }

    /// Read all three positions, defaulting each to 0
    pub fn load_selections(&mut self) -> SelectionMemory {
        self.memory = SelectionMemory {
            last_playlist: self.read_or_default(KEY_LAST_PLAYLIST),
            last_artist: self.read_or_default(KEY_LAST_ARTIST),
            last_album: self.read_or_default(KEY_LAST_ALBUM),
        };
        info!(
            "Loaded selections: playlist={}, artist={}, album={}",
            self.memory.last_playlist, self.memory.last_artist, self.memory.last_album
        );
        self.memory
    }

    fn read_or_default(&self, key: &str) -> u8 {
        match self.store.read_u8(key) {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                0
            }
        }
    }

    /// Write all three positions and commit
    pub fn save_selections(&mut self) -> Result<(), StoreError> {
        self.store
            .write_u8(KEY_LAST_PLAYLIST, self.memory.last_playlist)?;
        self.store.write_u8(KEY_LAST_ARTIST, self.memory.last_artist)?;
        self.store.write_u8(KEY_LAST_ALBUM, self.memory.last_album)?;
        self.store.commit()?;
        debug!("Saved selections {:?}", self.memory);
        Ok(())
    }

    pub fn memory(&self) -> SelectionMemory {
        self.memory
    }

    pub fn last_playlist_index(&self) -> u8 {
        self.memory.last_playlist
    }

    pub fn last_artist_index(&self) -> u8 {
        self.memory.last_artist
    }

    pub fn last_album_index(&self) -> u8 {
        self.memory.last_album
    }

    /// Remember a playlist position and persist
    pub fn select_playlist(&mut self, index: u8) -> Result<(), StoreError> {
        self.memory.last_playlist = index;
        self.save_selections()
    }

    pub fn select_artist(&mut self, index: u8) -> Result<(), StoreError> {
        self.memory.last_artist = index;
        self.save_selections()
    }

    pub fn select_album(&mut self, index: u8) -> Result<(), StoreError> {
        self.memory.last_album = index;
        self.save_selections()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_zero() {
        let mut selections = Selections::new(MemoryStore::new());
        assert_eq!(selections.load_selections(), SelectionMemory::default());
    }

    #[test]
    fn test_round_trip_across_restart() {
        let mut selections = Selections::new(MemoryStore::new());
        selections.select_playlist(3).unwrap();
        selections.select_artist(7).unwrap();
        selections.select_album(1).unwrap();

        // New instance over the same persisted values
        let mut restarted = Selections::new(selections.into_store());
        assert_eq!(restarted.last_playlist_index(), 0);
        let memory = restarted.load_selections();
        assert_eq!(
            memory,
            SelectionMemory {
                last_playlist: 3,
                last_artist: 7,
                last_album: 1
            }
        );
    }

    #[test]
    fn test_save_writes_all_keys() {
        let mut store = MemoryStore::new();
        {
            let mut selections = Selections::new(&mut store);
            selections.select_album(2).unwrap();
        }
        assert_eq!(store.read_u8(KEY_LAST_ALBUM).unwrap(), Some(2));
        assert_eq!(store.read_u8(KEY_LAST_PLAYLIST).unwrap(), Some(0));
        assert_eq!(store.read_u8(KEY_LAST_ARTIST).unwrap(), Some(0));
    }

    #[test]
    fn test_json_file_store_persists() {
        let path = std::env::temp_dir()
            .join(format!("hu-library-test-{}", std::process::id()))
            .join("amperfy.json");

        let mut selections = Selections::new(JsonFileStore::open(&path));
        selections.select_artist(42).unwrap();

        let mut reopened = Selections::new(JsonFileStore::open(&path));
        assert_eq!(reopened.load_selections().last_artist, 42);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = std::env::temp_dir().join(format!("hu-library-corrupt-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("amperfy.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.read_u8(KEY_LAST_PLAYLIST).unwrap(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }
}

//! Save/Load functionality for persisting restaurant progress
//!
//! Two layers:
//! - six JSON records in a [`KeyValueStore`], read at start-up and written on
//!   autosave and teardown. Missing or broken records fall back to defaults.
//! - a versioned bincode snapshot of the same six slices, for export/import.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bistro_logic::achievements::AchievementState;
use bistro_logic::choices::ChoiceEventState;
use bistro_logic::constants::economy::STARTING_GOLD;
use bistro_logic::economy::SpecialGuest;
use bistro_logic::reputation::ReputationState;
use bistro_logic::upgrades::UpgradeState;

use crate::systems::RoguelikeState;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Record names, joined onto the key prefix.
pub mod keys {
    pub const GAME: &str = "game";
    pub const UPGRADES: &str = "upgrades";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const REPUTATION: &str = "reputation";
    pub const ROGUELIKE: &str = "roguelike";
    pub const CHOICES: &str = "choices";

    pub const ALL: [&str; 6] = [GAME, UPGRADES, ACHIEVEMENTS, REPUTATION, ROGUELIKE, CHOICES];
}

/// Gold and guest counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRecord {
    pub gold: u64,
    pub total_gold_earned: u64,
    pub total_customers: u64,
    pub days_played: u32,
    pub special_customers_seen: BTreeSet<SpecialGuest>,
    pub total_special_customers: u32,
}

impl Default for GameRecord {
    fn default() -> Self {
        Self {
            gold: STARTING_GOLD,
            total_gold_earned: 0,
            total_customers: 0,
            days_played: 0,
            special_customers_seen: BTreeSet::new(),
            total_special_customers: 0,
        }
    }
}

/// Byte store keyed by string. Reads never fail; a missing key is `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// One `<key>.json` file per record under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }
}

/// Read one JSON record. Corrupt data is logged and treated as missing.
pub fn load_record<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let bytes = store.get(key)?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding unreadable record {key}: {e}");
            None
        }
    }
}

/// Write one JSON record. Failures are logged, never raised.
pub fn save_record<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    let bytes = match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("could not encode record {key}: {e}");
            return;
        }
    };
    if let Err(e) = store.set(key, &bytes) {
        log::warn!("could not write record {key}: {e}");
    }
}

/// Serializable snapshot of all persistent progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub game: GameRecord,
    pub upgrades: UpgradeState,
    pub achievements: AchievementState,
    pub reputation: ReputationState,
    pub roguelike: RoguelikeState,
    pub choices: ChoiceEventState,
}

impl SaveData {
    pub fn new(
        game: GameRecord,
        upgrades: UpgradeState,
        achievements: AchievementState,
        reputation: ReputationState,
        roguelike: RoguelikeState,
        choices: ChoiceEventState,
    ) -> Self {
        Self {
            version: SAVE_VERSION,
            game,
            upgrades,
            achievements,
            reputation,
            roguelike,
            choices,
        }
    }
}

/// Write a snapshot to a writer
pub fn save_snapshot<W: Write>(writer: W, data: &SaveData) -> Result<(), SaveError> {
    bincode::serialize_into(writer, data)?;
    Ok(())
}

/// Read a snapshot from a reader
pub fn load_snapshot<R: Read>(reader: R) -> Result<SaveData, SaveError> {
    let data: SaveData = bincode::deserialize_from(reader)?;
    if data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }
    Ok(data)
}

/// Errors from a [`KeyValueStore`] write
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// Another holder of a shared store panicked mid-write
    Poisoned,
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Poisoned => write!(f, "store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors that can occur during snapshot save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(f, "Save version mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for SaveError {}

//! dice-save: on-disk storage for DiceBound progress
//!
//! One JSON document per key, each wrapped with a small versioned header,
//! under `<data_local_dir>/dicebound/`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use dice_core::store::{KeyValueStore, StoreError};

/// Current storage format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No usable data directory")]
    NoDataDir,

    #[error("Invalid key '{0}'")]
    InvalidKey(String),

    #[error("Invalid save file header")]
    InvalidHeader,

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },
}

impl From<SaveError> for StoreError {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::Serialization(e) => StoreError::Malformed(e.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveHeader {
    pub magic: String,
    pub version: u32,
    pub key: String,
    /// Seconds since the epoch at write time
    pub timestamp: u64,
}

impl SaveHeader {
    const MAGIC: &'static str = "DICE";

    pub fn new(key: &str) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            key: key.to_string(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// What is actually written to disk for a key
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub value: Value,
}

/// Default directory for progress files
pub fn default_data_dir() -> Result<PathBuf, SaveError> {
    let mut path = dirs::data_local_dir().ok_or(SaveError::NoDataDir)?;
    path.push("dicebound");
    Ok(path)
}

/// A [`KeyValueStore`] writing one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store under `dir`, created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform data directory
    pub fn open_default() -> Result<Self, SaveError> {
        Ok(Self::new(default_data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SaveError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(SaveError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    pub fn read(&self, key: &str) -> Result<Option<Value>, SaveError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&path)?);
        let file: SaveFile = serde_json::from_reader(reader)?;
        file.header.validate()?;
        if file.header.key != key {
            warn!(
                "{} holds key '{}', expected '{key}'",
                path.display(),
                file.header.key
            );
        }
        Ok(Some(file.value))
    }

    pub fn write(&self, key: &str, value: Value) -> Result<(), SaveError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let file = SaveFile {
            header: SaveHeader::new(key),
            value,
        };
        // write aside, then rename over the old file
        let tmp = path.with_extension("json.tmp");
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        let written = writer.into_inner().map_err(|e| e.into_error())?;
        written.sync_all()?;
        std::fs::rename(&tmp, &path)?;
        debug!("saved '{key}' to {}", path.display());
        Ok(())
    }

    /// Remove the file for `key`, if any
    pub fn delete(&self, key: &str) -> Result<(), SaveError> {
        let path = self.path_for(key)?;
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read(key)?)
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        Ok(self.write(key, value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_core::progression::{MetaProgress, MetaUpgrade};
    use serde_json::json;

    #[test]
    fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert!(store.read("lifetime_gold").unwrap().is_none());

        store.write("lifetime_gold", json!(120)).unwrap();
        assert_eq!(store.read("lifetime_gold").unwrap(), Some(json!(120)));
        assert!(dir.path().join("nested/lifetime_gold.json").exists());
        assert!(!dir.path().join("nested/lifetime_gold.json.tmp").exists());

        store.delete("lifetime_gold").unwrap();
        assert!(store.read("lifetime_gold").unwrap().is_none());
    }

    #[test]
    fn test_failed_write_keeps_the_old_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let big: Vec<u32> = (0..2000).collect();
        store.write("upgrades", json!(big)).unwrap();
        store.write("upgrades", json!([1, 2])).unwrap();
        let text = std::fs::read_to_string(dir.path().join("upgrades.json")).unwrap();
        let on_disk: SaveFile = serde_json::from_str(&text).unwrap();
        assert_eq!(on_disk.value, json!([1, 2]));

        // the scratch file cannot be created, so the rename never happens
        std::fs::create_dir(dir.path().join("upgrades.json.tmp")).unwrap();
        assert!(matches!(
            store.write("upgrades", json!([3])),
            Err(SaveError::Io(_))
        ));
        assert_eq!(store.read("upgrades").unwrap(), Some(json!([1, 2])));
    }

    #[test]
    fn test_rejects_bad_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.write("../escape", json!(1)),
            Err(SaveError::InvalidKey(_))
        ));
        assert!(matches!(store.read(""), Err(SaveError::InvalidKey(_))));
    }

    #[test]
    fn test_header_validation() {
        let header = SaveHeader::new("upgrades");
        assert!(header.validate().is_ok());

        let mut bad = header.clone();
        bad.magic = "XXXX".to_string();
        assert!(matches!(bad.validate(), Err(SaveError::InvalidHeader)));

        let mut old = header;
        old.version = 999;
        assert!(matches!(
            old.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run_stats.json"), "{ not json").unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.load("run_stats"),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_meta_progress_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut meta = MetaProgress::default();
        meta.lifetime_gold = 90;
        meta.buy(MetaUpgrade::Strength).unwrap();
        meta.save(&mut FileStore::new(dir.path())).unwrap();

        let loaded = MetaProgress::load(&FileStore::new(dir.path()));
        assert_eq!(loaded.lifetime_gold, 60);
        assert_eq!(loaded.level(MetaUpgrade::Strength), 1);
        assert_eq!(loaded.cost(MetaUpgrade::Strength), 40);
    }

    #[test]
    fn test_corrupt_progress_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lifetime_gold.json"), "garbage").unwrap();
        let loaded = MetaProgress::load(&FileStore::new(dir.path()));
        assert_eq!(loaded, MetaProgress::default());
    }
}

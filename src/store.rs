use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use crate::encoding::{Collection, Record};
use crate::error::StoreError;

/// Contents written to a freshly created data file
const EMPTY_DOCUMENT: &[u8] = b"[]";

/// Whole-collection persistence
///
/// `load` and `save` never fail from the caller's point of view: a failed
/// read yields an empty collection and a failed write is dropped, both after
/// logging.
pub trait Store: Send + Sync {
    /// Read every record
    fn load(&self) -> Collection;

    /// Replace every record
    fn save(&self, records: &Collection);
}

/// Collection persisted as one pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the data file, creating it (and its parent directories) holding
    /// an empty array when it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
                info!("Created data directory {}", parent.display());
            }
        }

        if !path.exists() {
            fs::write(&path, EMPTY_DOCUMENT).map_err(|e| StoreError::io(&path, e))?;
            info!("Initialized empty data file {}", path.display());
        }

        Ok(Self { path })
    }

    /// Location of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the data file, surfacing failures
    ///
    /// Array elements that are not JSON objects are skipped with a warning.
    pub fn try_load(&self) -> Result<Collection, StoreError> {
        let bytes = fs::read(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let elements: Vec<Value> =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::malformed(&self.path, e))?;

        let mut records = Collection::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            match element {
                Value::Object(fields) => records.push(Record::from(fields)),
                other => warn!(
                    "Skipping non-object element {} in {}: {}",
                    index,
                    self.path.display(),
                    other
                ),
            }
        }
        Ok(records)
    }

    /// Serialize and write the data file, surfacing failures
    ///
    /// Each save writes its own temporary file next to the data file and
    /// renames it into place, so overlapping saves never interleave bytes.
    pub fn try_save(&self, records: &Collection) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(StoreError::Encode)?;

        let dir = self.dir();
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&bytes)
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;
        Ok(())
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl Store for FileStore {
    fn load(&self) -> Collection {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                error!("Error reading data file: {}", e);
                Collection::new()
            }
        }
    }

    fn save(&self, records: &Collection) {
        if let Err(e) = self.try_save(records) {
            error!("Error writing data file: {}", e);
        }
    }
}

/// In-memory collection
pub struct MemoryStore {
    data: RwLock<Collection>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::with_records(Collection::new())
    }

    /// Create a store holding `records`
    pub fn with_records(records: Collection) -> Self {
        Self {
            data: RwLock::new(records),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Collection {
        self.data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, records: &Collection) {
        let mut data = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *data = records.clone();
    }
}

//! Trip persistence
//!
//! The whole trip is stored as one JSON document under a fixed key and
//! replaced wholesale on every save. There is no merge, versioning or
//! partial update.
//!
//! - [`TripStore`] - the load/save/clear seam the planner talks to
//! - [`JsonFileStore`] - pretty-printed JSON file with atomic replace
//! - [`MemoryStore`] - in-process store for tests and embedding

pub mod error;

pub use error::{StorageError, StorageResult};

use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::itinerary::Trip;

/// Default file name of the stored trip document
pub const DEFAULT_DOCUMENT_FILE: &str = "trip.json";

/// Load and save a complete trip document
pub trait TripStore {
    /// The stored trip, or `None` when nothing has been saved yet
    fn load(&self) -> StorageResult<Option<Trip>>;

    /// Replace the stored document with `trip`
    fn save(&mut self, trip: &Trip) -> StorageResult<()>;

    /// Remove the stored document, if any
    fn clear(&mut self) -> StorageResult<()>;
}

/// Stores the trip as `<root>/<file_name>`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    file_name: String,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    /// Store using the default document file name
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(root, DEFAULT_DOCUMENT_FILE)
    }

    /// Full path of the trip document
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(format!("{}.tmp", self.file_name))
    }
}

impl TripStore for JsonFileStore {
    fn load(&self) -> StorageResult<Option<Trip>> {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "No stored trip");
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        let trip = serde_json::from_str(&contents)
            .map_err(|source| StorageError::Corrupted {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), "Loaded trip");
        Ok(Some(trip))
    }

    fn save(&mut self, trip: &Trip) -> StorageResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| StorageError::io(&self.root, e))?;

        let temp_file = self.temp_path();
        let final_file = self.path();

        let json = serde_json::to_string_pretty(trip)?;
        fs::write(&temp_file, json).map_err(|e| StorageError::io(&temp_file, e))?;

        // Atomic rename
        fs::rename(&temp_file, &final_file).map_err(|e| StorageError::io(&final_file, e))?;

        debug!(path = %final_file.display(), "Saved trip");
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
            info!(path = %path.display(), "Cleared stored trip");
        }
        Ok(())
    }
}

/// Keeps the serialized document in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: Option<String>,
    saves: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a raw document, parseable or not
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
            ..Self::default()
        }
    }

    /// Make every subsequent save fail
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

impl TripStore for MemoryStore {
    fn load(&self) -> StorageResult<Option<Trip>> {
        self.document
            .as_deref()
            .map(|doc| {
                serde_json::from_str(doc).map_err(|source| StorageError::Corrupted {
                    path: PathBuf::from("<memory>"),
                    source,
                })
            })
            .transpose()
    }

    fn save(&mut self, trip: &Trip) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::WriteRejected(
                "memory store is refusing writes".to_string(),
            ));
        }
        self.document = Some(serde_json::to_string(trip)?);
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.document = None;
        Ok(())
    }
}

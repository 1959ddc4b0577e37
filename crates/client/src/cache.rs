//! Offline cache: a JSON file mirroring the last known place list.

use std::fs;
use std::path::PathBuf;

use crate::error::ClientError;
use crate::model::Place;

/// A JSON file holding the most recently fetched place list.
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Overwrite the cache with the given place list.
    pub fn save(&self, places: &[Place]) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(places)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Load the cached place list. A missing file is an error; callers
    /// check [`exists`](Self::exists) first when a miss is expected.
    pub fn load(&self) -> Result<Vec<Place>, ClientError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

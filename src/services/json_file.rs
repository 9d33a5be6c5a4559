use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use crate::errors::{StoreError, StoreResult};

/// A whole JSON document mirrored to one file on disk.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document, falling back to an empty one when the file is
    /// missing, blank, unreadable or not the expected shape.
    pub fn load<T: DeserializeOwned + Default>(&self) -> T {
        match self.try_load() {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::debug!("{} is missing or empty, starting empty", self.path.display());
                T::default()
            }
            Err(e) => {
                tracing::warn!("{}. Starting with an empty document.", e);
                T::default()
            }
        }
    }

    fn try_load<T: DeserializeOwned>(&self) -> StoreResult<Option<T>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let data = data.trim();
        if data.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(data)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Overwrites the file with the serialized document. Not atomic: a crash
    /// mid-write can leave a truncated file, which `load` then treats as empty.
    pub fn save<T: Serialize>(&self, document: &T) -> StoreResult<()> {
        let data = serde_json::to_string(document)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, data)?;
        Ok(())
    }
}

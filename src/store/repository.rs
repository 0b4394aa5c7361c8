//! Durable storage for the persisted container
//!
//! The store itself only speaks to the [`LoopRepository`] trait; the JSON
//! file implementation writes atomically (temp file + rename) so a crash
//! mid-save never corrupts the existing file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::{LoopData, SCHEMA_VERSION};
use crate::utils::atomic_write;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur in repository operations
#[derive(Debug)]
pub enum RepositoryError {
    /// No stored container exists yet (first run)
    NotFound,
    Io(io::Error),
    Json(serde_json::Error),
    /// The stored container was written by a newer schema
    UnsupportedSchema(u32),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::NotFound => write!(f, "no stored data found"),
            RepositoryError::Io(e) => write!(f, "IO error: {}", e),
            RepositoryError::Json(e) => write!(f, "JSON error: {}", e),
            RepositoryError::UnsupportedSchema(v) => {
                write!(f, "unsupported schema version {} (supported: {})", v, SCHEMA_VERSION)
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<io::Error> for RepositoryError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            RepositoryError::NotFound
        } else {
            RepositoryError::Io(e)
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        RepositoryError::Json(e)
    }
}

/// Read/write pair over the persisted container
pub trait LoopRepository: Send + Sync {
    fn load(&self) -> RepositoryResult<LoopData>;
    fn save(&self, data: &LoopData) -> RepositoryResult<()>;
}

/// Stores the container as pretty-printed JSON in a single file
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LoopRepository for JsonFileRepository {
    fn load(&self) -> RepositoryResult<LoopData> {
        let content = fs::read_to_string(&self.path)?;
        let data: LoopData = serde_json::from_str(&content)?;

        if data.version > SCHEMA_VERSION {
            return Err(RepositoryError::UnsupportedSchema(data.version));
        }

        Ok(data)
    }

    fn save(&self, data: &LoopData) -> RepositoryResult<()> {
        let content = serde_json::to_string_pretty(data)?;
        atomic_write(&self.path, &content)?;
        Ok(())
    }
}

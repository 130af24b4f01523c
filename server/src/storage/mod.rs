//! The byte-addressable key-path store the aggregation core reads models
//! from and writes artifacts to. The core only sees this capability, never
//! a concrete backing medium.

mod fs;

use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use async_trait::async_trait;

pub use fs::FsStorage;

/// The result type used in the entire storage module.
pub type Result<T> = std::result::Result<T, StorageErr>;

/// The storage module's error type.
#[derive(Debug)]
pub enum StorageErr {
    /// No file at the given key.
    NotFound { path: String },
    /// The key escapes the storage root or is otherwise unusable.
    InvalidPath { path: String },
    /// An underlying I/O failure, propagated, not masked.
    Io { path: String, source: io::Error },
}

impl Display for StorageErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageErr::NotFound { path } => write!(f, "no file stored at '{path}'"),
            StorageErr::InvalidPath { path } => write!(f, "invalid storage path '{path}'"),
            StorageErr::Io { path, source } => write!(f, "io error at '{path}': {source}"),
        }
    }
}

impl Error for StorageErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageErr::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A byte store addressed by relative string keys.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Reads the full contents at `path`.
    ///
    /// # Errors
    /// `StorageErr::NotFound` when nothing is stored there.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Writes `content` at `path`, creating parent directories as needed
    /// and overwriting any previous contents.
    async fn write(&self, path: &str, content: &[u8]) -> Result<()>;

    /// Deletes the file at `path`.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Resolves `path` to its full location in the backing medium.
    fn full_path(&self, path: &str) -> Result<PathBuf>;
}

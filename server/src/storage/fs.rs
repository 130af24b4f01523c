//! Filesystem-backed storage rooted at a single directory.

use std::{
    io,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;

use super::{FileStorage, Result, StorageErr};

pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Opens (and creates, if missing) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Resolves a key, rejecting absolute paths and `..` components so a
    /// key can never address anything outside the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            !matches!(c, Component::Normal(_) | Component::CurDir)
        });
        if path.is_empty() || escapes {
            return Err(StorageErr::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

fn io_err(path: &str, source: io::Error) -> StorageErr {
    if source.kind() == io::ErrorKind::NotFound {
        StorageErr::NotFound {
            path: path.to_string(),
        }
    } else {
        StorageErr::Io {
            path: path.to_string(),
            source,
        }
    }
}

#[async_trait]
impl FileStorage for FsStorage {
    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        tokio::fs::read(&full).await.map_err(|e| io_err(path, e))
    }

    async fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_err(path, e))?;
        }
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| io_err(path, e))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full = self.resolve(path)?;
        tokio::fs::remove_file(&full)
            .await
            .map_err(|e| io_err(path, e))
    }

    fn full_path(&self, path: &str) -> Result<PathBuf> {
        self.resolve(path)
    }
}

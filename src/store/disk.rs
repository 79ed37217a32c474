use async_trait::async_trait;
use log::debug;
use std::path::{ Path, PathBuf };

use super::{ FileStore, StoreError };

/// Writes each upload to `<root>/<basename>`, creating `root` when needed.
#[derive(Debug, Clone)]
pub struct DirectoryFileStore {
    root: PathBuf,
}

impl DirectoryFileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target_path(&self, filename: &str) -> Result<PathBuf, StoreError> {
        let base = Path::new(filename)
            .file_name()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| StoreError::InvalidFilename(filename.to_string()))?;
        Ok(self.root.join(base))
    }
}

#[async_trait]
impl FileStore for DirectoryFileStore {
    async fn put(&self, filename: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let path = self.target_path(filename)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, &bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

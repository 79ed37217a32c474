use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use log::debug;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{ FileStore, StoreError };

#[derive(Clone, Debug)]
pub struct StoredFile {
    pub bytes: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

/// Process-lifetime map from filename to contents. Grows without bound.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<String, StoredFile>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }

    pub async fn contains(&self, filename: &str) -> bool {
        self.files.read().await.contains_key(filename)
    }

    pub async fn stored(&self, filename: &str) -> Option<StoredFile> {
        self.files.read().await.get(filename).cloned()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn put(&self, filename: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let size = bytes.len();
        let previous = self.files.write().await.insert(filename.to_string(), StoredFile {
            bytes,
            uploaded_at: Utc::now(),
        });
        if previous.is_some() {
            debug!("Replaced stored file '{}' ({} bytes)", filename, size);
        } else {
            debug!("Stored new file '{}' ({} bytes)", filename, size);
        }
        Ok(())
    }
}

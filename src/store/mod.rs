mod disk;
mod memory;

pub use disk::DirectoryFileStore;
pub use memory::{ MemoryFileStore, StoredFile };

use async_trait::async_trait;
use log::info;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;
use crate::cli::Args;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid filename '{0}'")]
    InvalidFilename(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Write side of the upload store. Same filename overwrites, last write wins.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, filename: &str, bytes: Vec<u8>) -> Result<(), StoreError>;
}

pub fn create_file_store(args: &Args) -> Result<Arc<dyn FileStore>, Box<dyn StdError + Send + Sync>> {
    match args.upload_store.to_lowercase().as_str() {
        "memory" => {
            info!("Uploaded files will be kept in memory");
            Ok(Arc::new(MemoryFileStore::new()))
        }
        "disk" => {
            info!("Uploaded files will be written to: {}", args.upload_dir);
            Ok(Arc::new(DirectoryFileStore::new(&args.upload_dir)))
        }
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported upload store type: {}", args.upload_store)
                    )
                )
            ),
    }
}

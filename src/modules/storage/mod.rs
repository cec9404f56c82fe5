//! Storage module for report photos
//!
//! Provides the `PhotoStore` seam and a local-filesystem implementation.

mod local_storage;

use async_trait::async_trait;

pub use local_storage::LocalPhotoStore;

/// Permanent storage for accepted photos
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist `data` under `file_name` and return the storage path
    async fn store(&self, file_name: &str, data: &[u8]) -> std::io::Result<String>;

    /// Remove a previously stored photo by the path `store` returned
    async fn remove(&self, path: &str) -> std::io::Result<()>;
}

//! Local filesystem photo storage
//!
//! Photos are written into a single flat directory which is created on first
//! use (mode 0755 on unix). Files are opened with `create_new`, so an existing
//! file is never overwritten.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, DirBuilder, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::PhotoStore;

pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn ensure_root(&self) -> io::Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o755);
        builder.create(&self.root).await
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn store(&self, file_name: &str, data: &[u8]) -> io::Result<String> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid photo file name '{}'", file_name),
            ));
        }

        self.ensure_root().await?;

        let path = self.root.join(file_name);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let written = async {
            file.write_all(data).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!("Failed to remove partial photo {}: {}", path.display(), cleanup);
            }
            return Err(e);
        }

        debug!("Photo stored: {} ({} bytes)", path.display(), data.len());
        Ok(path.to_string_lossy().into_owned())
    }

    async fn remove(&self, path: &str) -> io::Result<()> {
        fs::remove_file(path).await?;
        debug!("Photo removed: {}", path);
        Ok(())
    }
}

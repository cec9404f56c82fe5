use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::config::UploadConfig;
use crate::features::reports::dtos::{PhotoUpload, UploadPayload};
use crate::modules::storage::PhotoStore;
use crate::shared::constants::PHOTO_NAME_PREFIX;
use crate::shared::validation::EXTENSION_REGEX;

/// Why a photo was left out of a report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectionReason {
    #[error("upload failed: {0}")]
    TransportError(String),

    #[error("type '{0}' is not an accepted image type")]
    UnsupportedType(String),

    #[error("{size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("could not be stored: {0}")]
    StorageFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRejection {
    /// Position of the photo in the submission (0-based)
    pub index: usize,
    pub original_name: String,
    pub reason: RejectionReason,
}

/// Result of running a submission's photos through the upload policy
#[derive(Debug, Default)]
pub struct AcceptedPhotos {
    /// Stored paths, in submission order
    pub stored: Vec<String>,
    pub rejected: Vec<PhotoRejection>,
}

/// Applies the upload policy to candidate photos and stores the ones that pass.
///
/// A rejected photo never fails the submission; it is logged and skipped.
pub struct PhotoAcceptor {
    store: Arc<dyn PhotoStore>,
    upload: Arc<UploadConfig>,
}

impl PhotoAcceptor {
    pub fn new(store: Arc<dyn PhotoStore>, upload: Arc<UploadConfig>) -> Self {
        Self { store, upload }
    }

    pub async fn accept(&self, photos: Vec<PhotoUpload>) -> AcceptedPhotos {
        let mut accepted = AcceptedPhotos::default();

        for (index, photo) in photos.into_iter().take(self.upload.max_files).enumerate() {
            match self.accept_one(&photo).await {
                Ok(path) => accepted.stored.push(path),
                Err(reason) => {
                    warn!(
                        "Skipping photo {} ('{}'): {}",
                        index, photo.original_name, reason
                    );
                    accepted.rejected.push(PhotoRejection {
                        index,
                        original_name: photo.original_name,
                        reason,
                    });
                }
            }
        }

        debug!(
            "Photos accepted: {}, rejected: {}",
            accepted.stored.len(),
            accepted.rejected.len()
        );
        accepted
    }

    async fn accept_one(&self, photo: &PhotoUpload) -> Result<String, RejectionReason> {
        let data = match &photo.payload {
            UploadPayload::Received(data) => data,
            UploadPayload::Failed(detail) => {
                return Err(RejectionReason::TransportError(detail.clone()))
            }
        };

        let content_type = mime_essence(&photo.content_type);
        if !self.upload.is_mime_type_allowed(&content_type) {
            return Err(RejectionReason::UnsupportedType(photo.content_type.clone()));
        }

        if data.len() > self.upload.max_file_size {
            return Err(RejectionReason::TooLarge {
                size: data.len(),
                max: self.upload.max_file_size,
            });
        }

        let file_name = unique_file_name(&photo.original_name, &content_type);
        self.store
            .store(&file_name, data)
            .await
            .map_err(|e| RejectionReason::StorageFailed(e.to_string()))
    }
}

/// `type/subtype` without parameters, lowercased
fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Get file extension from content type
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Generate a collision-free stored name: `report_<uuid>_<unix seconds>.<ext>`
///
/// The client's extension is kept when it is a plain alphanumeric token,
/// otherwise one is derived from the content type.
pub fn unique_file_name(original_name: &str, content_type: &str) -> String {
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| EXTENSION_REGEX.is_match(ext))
        .map(|ext| ext.to_ascii_lowercase())
        .or_else(|| extension_for_content_type(content_type).map(str::to_string))
        .unwrap_or_else(|| "bin".to_string());

    format!(
        "{}{}_{}.{}",
        PHOTO_NAME_PREFIX,
        Uuid::now_v7().simple(),
        Utc::now().timestamp(),
        extension
    )
}

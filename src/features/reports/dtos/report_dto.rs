use std::collections::HashMap;

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::services::{PhotoRejection, RejectionReason};

/// Decoded form submission, before any validation
#[derive(Debug, Default)]
pub struct ReportSubmission {
    pub fields: HashMap<String, String>,
    pub photos: Vec<PhotoUpload>,
}

impl ReportSubmission {
    /// Build from urlencoded pairs. A repeated key keeps its last value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            fields: pairs.into_iter().collect(),
            photos: Vec::new(),
        }
    }

    /// Trimmed value of a text field, `None` when the field was not sent
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|value| value.trim())
    }
}

/// One candidate photo as received from the client
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub original_name: String,
    pub content_type: String,
    pub payload: UploadPayload,
}

#[derive(Debug, Clone)]
pub enum UploadPayload {
    Received(Bytes),
    /// The slot was present but its content could not be read
    Failed(String),
}

impl PhotoUpload {
    pub fn size(&self) -> usize {
        match &self.payload {
            UploadPayload::Received(data) => data.len(),
            UploadPayload::Failed(_) => 0,
        }
    }
}

/// Submit report form for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler decodes the body through the `ReportForm` extractor.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
#[schema(rename_all = "camelCase")]
pub struct SubmitReportFormDto {
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "infrastructure")]
    pub category: String,
    #[schema(example = "Pothole")]
    pub title: String,
    #[schema(example = "Large pothole on Main St")]
    pub description: String,
    /// low, medium or high; anything else is stored as medium
    #[schema(example = "medium")]
    pub priority: Option<String>,
    #[schema(example = "100 Main St")]
    pub address: String,
    pub landmarks: Option<String>,
    /// Up to 5 images (jpeg, png, gif, webp), 5MB each
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photos: Option<Vec<String>>,
}

/// Response DTO for an accepted submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportResponseDto {
    pub success: bool,
    #[schema(example = "Report submitted successfully")]
    pub message: String,
    pub report_id: i64,
    /// Number of photos stored with the report
    pub uploaded_files: usize,
    /// Photos that were skipped; only present when rejection reporting is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_files: Option<Vec<RejectedPhotoDto>>,
}

/// A photo that was left out of the report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RejectedPhotoDto {
    /// Position of the photo in the submission (0-based)
    pub index: usize,
    pub file_name: String,
    #[schema(example = "unsupported_type")]
    pub reason: String,
    pub detail: String,
}

impl From<&PhotoRejection> for RejectedPhotoDto {
    fn from(rejection: &PhotoRejection) -> Self {
        let reason = match rejection.reason {
            RejectionReason::TransportError(_) => "transport_error",
            RejectionReason::UnsupportedType(_) => "unsupported_type",
            RejectionReason::TooLarge { .. } => "too_large",
            RejectionReason::StorageFailed(_) => "storage_failed",
        };

        Self {
            index: rejection.index,
            file_name: rejection.original_name.clone(),
            reason: reason.to_string(),
            detail: rejection.reason.to_string(),
        }
    }
}

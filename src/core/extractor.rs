use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequest, Multipart, Request},
    http::header,
    Form,
};
use tracing::debug;

use crate::core::config::UploadConfig;
use crate::core::error::AppError;
use crate::features::reports::dtos::{PhotoUpload, ReportSubmission, UploadPayload};
use crate::shared::constants::PHOTO_FIELD_NAMES;

/// Report form extractor
///
/// Decodes `multipart/form-data` and `application/x-www-form-urlencoded`
/// bodies into a [`ReportSubmission`]. Any other content type decodes to an
/// empty submission, which then fails validation with every required field
/// missing. Photo parts past the configured slot limit are skipped without
/// being buffered, but their bytes still count toward the route's
/// `DefaultBodyLimit`; a body over that limit is rejected as a whole with
/// `AppError::BadRequest`.
pub struct ReportForm(pub ReportSubmission);

impl<S> FromRequest<S> for ReportForm
where
    S: Send + Sync,
    Arc<UploadConfig>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let upload = Arc::<UploadConfig>::from_ref(state);

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            read_multipart(multipart, upload.max_files)
                .await
                .map(ReportForm)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(ReportForm(ReportSubmission::from_pairs(pairs)))
        } else {
            debug!("Unsupported form content type: '{}'", content_type);
            Ok(ReportForm(ReportSubmission::default()))
        }
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    max_photos: usize,
) -> Result<ReportSubmission, AppError> {
    let mut submission = ReportSubmission::default();
    let mut photo_slots = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(e.body_text())
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if PHOTO_FIELD_NAMES.contains(&field_name.as_str()) {
            photo_slots += 1;
            if photo_slots > max_photos {
                debug!("Ignoring photo slot {} beyond limit {}", photo_slots, max_photos);
                continue;
            }

            let original_name = field.file_name().unwrap_or("").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            match field.bytes().await {
                Ok(data) if original_name.is_empty() && data.is_empty() => {
                    submission.photos.push(PhotoUpload {
                        original_name,
                        content_type,
                        payload: UploadPayload::Failed("no file was uploaded".to_string()),
                    });
                }
                Ok(data) => {
                    submission.photos.push(PhotoUpload {
                        original_name,
                        content_type,
                        payload: UploadPayload::Received(data),
                    });
                }
                Err(e) => {
                    // The stream cannot be resumed after a broken part
                    debug!("Failed to read photo bytes: {}", e);
                    submission.photos.push(PhotoUpload {
                        original_name,
                        content_type,
                        payload: UploadPayload::Failed(e.body_text()),
                    });
                    break;
                }
            }
        } else if field.file_name().is_some() {
            debug!("Ignoring file in unknown field: {}", field_name);
        } else {
            let value = field.text().await.map_err(|e| {
                debug!("Failed to read text field {}: {}", field_name, e);
                AppError::BadRequest(e.body_text())
            })?;
            submission.fields.insert(field_name, value);
        }
    }

    Ok(submission)
}

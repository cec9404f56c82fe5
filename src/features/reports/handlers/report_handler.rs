use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};

use crate::core::config::UploadConfig;
use crate::core::error::{AppError, Result};
use crate::core::extractor::ReportForm;
use crate::features::reports::dtos::{
    RejectedPhotoDto, SubmitReportFormDto, SubmitReportResponseDto,
};
use crate::features::reports::services::ReportIntakeService;
use crate::shared::constants::REPORT_SUBMITTED_MESSAGE;
use crate::shared::types::ErrorResponse;

/// State for report handlers
#[derive(Clone, FromRef)]
pub struct ReportState {
    pub intake_service: Arc<ReportIntakeService>,
    pub upload: Arc<UploadConfig>,
}

/// Submit a problem report
///
/// Accepts `multipart/form-data` (with optional photos) or
/// `application/x-www-form-urlencoded`. Photos that fail the upload policy are
/// skipped and never fail the request.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(content = SubmitReportFormDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Report stored", body = SubmitReportResponseDto),
        (status = 400, description = "Missing fields, invalid email, invalid category or undecodable form", body = ErrorResponse),
        (status = 500, description = "Database unavailable or insert failed", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn submit_report(
    State(state): State<ReportState>,
    ReportForm(submission): ReportForm,
) -> Result<(StatusCode, Json<SubmitReportResponseDto>)> {
    let outcome = state.intake_service.submit(submission).await?;

    let rejected_files = state.upload.expose_rejections.then(|| {
        outcome
            .rejected
            .iter()
            .map(RejectedPhotoDto::from)
            .collect::<Vec<_>>()
    });

    Ok((
        StatusCode::CREATED,
        Json(SubmitReportResponseDto {
            success: true,
            message: REPORT_SUBMITTED_MESSAGE.to_string(),
            report_id: outcome.report_id,
            uploaded_files: outcome.uploaded_files,
            rejected_files,
        }),
    ))
}

/// CORS preflight
///
/// Normally answered by the CORS layer before reaching this handler.
#[utoipa::path(
    options,
    path = "/api/reports",
    responses(
        (status = 200, description = "Empty preflight response")
    ),
    tag = "reports"
)]
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::middleware::cors_layer;
    use crate::features::reports::routes::routes;
    use crate::features::reports::services::PhotoAcceptor;
    use crate::modules::notification::DisabledNotifier;
    use crate::modules::storage::{LocalPhotoStore, PhotoStore};
    use crate::shared::test_helpers::{
        jane_doe_fields, multipart_body, InMemoryReportRepository, MultipartPart,
        MULTIPART_BOUNDARY,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request},
        Router,
    };
    use serde_json::{json, Value};
    use std::path::Path;
    use tower::ServiceExt;

    const TEST_BODY_LIMIT: usize = 1024 * 1024;

    fn router_with(
        dir: &Path,
        repository: Arc<InMemoryReportRepository>,
        upload: UploadConfig,
    ) -> Router {
        let upload = Arc::new(upload);
        let store: Arc<dyn PhotoStore> = Arc::new(LocalPhotoStore::new(dir));
        let intake_service = Arc::new(ReportIntakeService::new(
            repository,
            PhotoAcceptor::new(store.clone(), upload.clone()),
            store,
            Arc::new(DisabledNotifier),
        ));

        routes(
            ReportState {
                intake_service,
                upload,
            },
            TEST_BODY_LIMIT,
        )
    }

    fn router(dir: &Path) -> Router {
        router_with(
            dir,
            Arc::new(InMemoryReportRepository::new()),
            UploadConfig::default(),
        )
    }

    fn urlencoded(fields: &[(&str, &str)]) -> Request<Body> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.replace(' ', "+").replace('@', "%40")))
            .collect::<Vec<_>>()
            .join("&");

        Request::builder()
            .method(Method::POST)
            .uri("/api/reports")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn multipart(parts: &[MultipartPart]) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/reports")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn jane_doe_parts() -> Vec<MultipartPart> {
        jane_doe_fields()
            .into_iter()
            .map(|(k, v)| MultipartPart::text(k, v))
            .collect()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_submit_jane_doe_without_photos() {
        let tmp = tempfile::tempdir().unwrap();

        let (status, body) = send(router(tmp.path()), urlencoded(&jane_doe_fields())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "Report submitted successfully",
                "report_id": 1,
                "uploaded_files": 0
            })
        );
    }

    #[tokio::test]
    async fn test_missing_fields_are_listed() {
        let tmp = tempfile::tempdir().unwrap();

        let (status, body) = send(
            router(tmp.path()),
            urlencoded(&[("fullName", "Jane Doe"), ("email", "jane@example.com")]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Missing required fields: category, title, description, address"})
        );
    }

    #[tokio::test]
    async fn test_invalid_email_and_category() {
        let tmp = tempfile::tempdir().unwrap();

        let mut fields = jane_doe_fields();
        fields[1] = ("email", "not-an-email");
        let (status, body) = send(router(tmp.path()), urlencoded(&fields)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid email format"}));

        let mut fields = jane_doe_fields();
        fields[2] = ("category", "roads");
        let (status, body) = send(router(tmp.path()), urlencoded(&fields)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid category"}));
    }

    #[tokio::test]
    async fn test_get_is_method_not_allowed() {
        let tmp = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/reports")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router(tmp.path()), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"error": "Method not allowed"}));
    }

    #[tokio::test]
    async fn test_options_is_empty_success() {
        let tmp = tempfile::tempdir().unwrap();
        let repository = Arc::new(InMemoryReportRepository::new());
        let app = router_with(tmp.path(), repository.clone(), UploadConfig::default())
            .layer(cors_layer(vec!["*".to_string()]));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/reports")
            .header(header::ORIGIN, "https://city.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
        assert_eq!(repository.ping_count(), 0);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_options_without_cors_layer() {
        let tmp = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/reports")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router(tmp.path()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_multipart_with_mixed_photos() {
        let tmp = tempfile::tempdir().unwrap();
        let mut parts = jane_doe_parts();
        parts.push(MultipartPart::file("photos[]", "hole.jpg", "image/jpeg", b"jpeg"));
        parts.push(MultipartPart::file("photos[]", "notes.txt", "text/plain", b"notes"));

        let (status, body) = send(router(tmp.path()), multipart(&parts)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["uploaded_files"], 1);
        assert!(body.get("rejected_files").is_none());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_rejections_exposed_when_enabled() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = UploadConfig {
            expose_rejections: true,
            ..UploadConfig::default()
        };
        let app = router_with(
            tmp.path(),
            Arc::new(InMemoryReportRepository::new()),
            upload,
        );
        let mut parts = jane_doe_parts();
        parts.push(MultipartPart::file("photos", "notes.txt", "text/plain", b"notes"));

        let (status, body) = send(app, multipart(&parts)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["uploaded_files"], 0);
        assert_eq!(body["rejected_files"][0]["index"], 0);
        assert_eq!(body["rejected_files"][0]["file_name"], "notes.txt");
        assert_eq!(body["rejected_files"][0]["reason"], "unsupported_type");
    }

    #[tokio::test]
    async fn test_same_payload_twice_gets_distinct_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router(tmp.path());

        let (_, first) = send(app.clone(), urlencoded(&jane_doe_fields())).await;
        let (_, second) = send(app, urlencoded(&jane_doe_fields())).await;

        assert_ne!(first["report_id"], second["report_id"]);
    }

    #[tokio::test]
    async fn test_connection_failure_is_server_error() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router_with(
            tmp.path(),
            Arc::new(InMemoryReportRepository::new().failing_connect()),
            UploadConfig::default(),
        );

        let (status, body) = send(app, urlencoded(&jane_doe_fields())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Database connection failed: connection refused"})
        );
    }

    #[tokio::test]
    async fn test_insert_failure_is_server_error() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router_with(
            tmp.path(),
            Arc::new(InMemoryReportRepository::new().failing_insert()),
            UploadConfig::default(),
        );
        let mut parts = jane_doe_parts();
        parts.push(MultipartPart::file("photos[]", "hole.png", "image/png", b"png"));

        let (status, body) = send(app, multipart(&parts)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to save report: "));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_small_photo_slots_past_limit_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let mut parts = jane_doe_parts();
        for i in 0..7 {
            parts.push(MultipartPart::file("photos[]", &format!("{}.jpg", i), "image/jpeg", b"j"));
        }

        let (status, body) = send(router(tmp.path()), multipart(&parts)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["uploaded_files"], 5);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 5);
    }

    #[tokio::test]
    async fn test_extra_slots_still_count_toward_body_limit() {
        let tmp = tempfile::tempdir().unwrap();
        let oversized = vec![0u8; TEST_BODY_LIMIT];
        let mut parts = jane_doe_parts();
        for i in 0..5 {
            parts.push(MultipartPart::file("photos[]", &format!("{}.jpg", i), "image/jpeg", b"j"));
        }
        parts.push(MultipartPart::file("photos[]", "extra.jpg", "image/jpeg", &oversized));

        let (status, body) = send(router(tmp.path()), multipart(&parts)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid form data: "));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}

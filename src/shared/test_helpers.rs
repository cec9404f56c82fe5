use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;

use crate::features::reports::dtos::{PhotoUpload, ReportSubmission, UploadPayload};
use crate::features::reports::models::{NewReport, StoredReport};
use crate::features::reports::services::{RepositoryError, ReportRepository};
use crate::modules::notification::{ReportNotification, ReportNotifier};

pub const MULTIPART_BOUNDARY: &str = "civic-report-test-boundary";

/// One part of a hand-built multipart body
pub struct MultipartPart {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl MultipartPart {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: None,
            content_type: None,
            data: value.as_bytes().to_vec(),
        }
    }

    pub fn file(name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            file_name: Some(file_name.to_string()),
            content_type: Some(content_type.to_string()),
            data: data.to_vec(),
        }
    }
}

/// Encode parts as `multipart/form-data` using [`MULTIPART_BOUNDARY`]
pub fn multipart_body(parts: &[MultipartPart]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = &part.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = &part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

/// A complete, valid submission
pub fn jane_doe_fields<'a>() -> Vec<(&'a str, &'a str)> {
    vec![
        ("fullName", "Jane Doe"),
        ("email", "jane@example.com"),
        ("category", "infrastructure"),
        ("title", "Pothole"),
        ("description", "Large pothole on Main St"),
        ("address", "100 Main St"),
    ]
}

pub fn submission_from(fields: &[(&str, &str)]) -> ReportSubmission {
    ReportSubmission::from_pairs(
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

pub fn photo(original_name: &str, content_type: &str, data: &[u8]) -> PhotoUpload {
    PhotoUpload {
        original_name: original_name.to_string(),
        content_type: content_type.to_string(),
        payload: UploadPayload::Received(Bytes::copy_from_slice(data)),
    }
}

/// Report repository backed by a vector, with switchable failures
pub struct InMemoryReportRepository {
    rows: Mutex<Vec<NewReport>>,
    next_id: AtomicI64,
    pings: AtomicUsize,
    fail_connect: bool,
    fail_insert: bool,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            pings: AtomicUsize::new(0),
            fail_connect: false,
            fail_insert: false,
        }
    }

    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub fn failing_insert(mut self) -> Self {
        self.fail_insert = true;
        self
    }

    pub fn rows(&self) -> Vec<NewReport> {
        self.rows.lock().unwrap().clone()
    }

    pub fn ping_count(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(RepositoryError::Connection(
                "connection refused".to_string(),
            ));
        }
        Ok(())
    }

    async fn insert(&self, report: &NewReport) -> Result<StoredReport, RepositoryError> {
        if self.fail_insert {
            return Err(RepositoryError::Write(
                "null value in column \"title\"".to_string(),
            ));
        }

        self.rows.lock().unwrap().push(report.clone());
        Ok(StoredReport {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            created_at: Utc::now(),
        })
    }
}

/// Notifier that remembers what it was asked to send
pub struct RecordingNotifier {
    sent: Mutex<Vec<ReportNotification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<ReportNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportNotifier for RecordingNotifier {
    async fn notify(&self, notification: &ReportNotification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            anyhow::bail!("mail relay unavailable");
        }
        Ok(())
    }
}

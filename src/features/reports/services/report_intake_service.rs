use std::sync::Arc;

use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::ReportSubmission;
use crate::features::reports::services::{
    PhotoAcceptor, PhotoRejection, ReportRepository, ReportValidator,
};
use crate::modules::notification::{ReportNotification, ReportNotifier};
use crate::modules::storage::PhotoStore;

/// What the caller learns about a committed report
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub report_id: i64,
    pub uploaded_files: usize,
    pub rejected: Vec<PhotoRejection>,
}

/// Runs a submission through validate, connect, store photos, insert.
///
/// Photos stored by a request whose insert fails are removed again before the
/// error is returned. Notification happens only after the row is committed.
pub struct ReportIntakeService {
    repository: Arc<dyn ReportRepository>,
    acceptor: PhotoAcceptor,
    store: Arc<dyn PhotoStore>,
    notifier: Arc<dyn ReportNotifier>,
}

impl ReportIntakeService {
    pub fn new(
        repository: Arc<dyn ReportRepository>,
        acceptor: PhotoAcceptor,
        store: Arc<dyn PhotoStore>,
        notifier: Arc<dyn ReportNotifier>,
    ) -> Self {
        Self {
            repository,
            acceptor,
            store,
            notifier,
        }
    }

    pub async fn submit(&self, submission: ReportSubmission) -> Result<SubmissionOutcome> {
        let validated = ReportValidator::validate(&submission)?;

        self.repository
            .ping()
            .await
            .map_err(|e| AppError::DatabaseConnection(e.to_string()))?;

        let accepted = self.acceptor.accept(submission.photos).await;
        let report = validated.into_new_report(accepted.stored);

        let stored = match self.repository.insert(&report).await {
            Ok(stored) => stored,
            Err(e) => {
                self.remove_photos(&report.photos).await;
                return Err(AppError::SaveFailed(e.to_string()));
            }
        };

        info!(
            "Report {} submitted at {} with {} photo(s), {} rejected",
            stored.id,
            stored.created_at.to_rfc3339(),
            report.photos.len(),
            accepted.rejected.len()
        );

        let notification = ReportNotification::from_report(stored.id, &report);
        if let Err(e) = self.notifier.notify(&notification).await {
            warn!("Failed to send notification for report {}: {:#}", stored.id, e);
        }

        Ok(SubmissionOutcome {
            report_id: stored.id,
            uploaded_files: report.photos.len(),
            rejected: accepted.rejected,
        })
    }

    /// Best-effort removal of photos written during a failed submission
    async fn remove_photos(&self, paths: &[String]) {
        for path in paths {
            if let Err(e) = self.store.remove(path).await {
                warn!("Failed to remove orphaned photo {}: {}", path, e);
            }
        }
    }
}

//! Outbound notification of newly submitted reports
//!
//! Notification is best-effort: it runs only after a report is committed and
//! its failure never changes the response.

mod webhook_notifier;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::config::NotificationConfig;
use crate::features::reports::models::NewReport;

pub use webhook_notifier::WebhookNotifier;

/// Admin-facing summary of a new report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportNotification {
    pub report_id: i64,
    pub subject: String,
    pub body: String,
    /// Reporter's address, so replies go straight to them
    pub reply_to: String,
}

impl ReportNotification {
    pub fn from_report(report_id: i64, report: &NewReport) -> Self {
        let body = format!(
            "A new problem report has been submitted:\n\n\
             Name: {}\n\
             Email: {}\n\
             Category: {}\n\
             Title: {}\n\
             Priority: {}\n\
             Address: {}\n\n\
             Description: {}\n",
            report.full_name,
            report.email,
            report.category,
            report.title,
            report.priority,
            report.address,
            report.description,
        );

        Self {
            report_id,
            subject: format!("New Problem Report: {}", report.title),
            body,
            reply_to: report.email.clone(),
        }
    }
}

#[async_trait]
pub trait ReportNotifier: Send + Sync {
    async fn notify(&self, notification: &ReportNotification) -> anyhow::Result<()>;
}

/// Default notifier; does nothing
pub struct DisabledNotifier;

#[async_trait]
impl ReportNotifier for DisabledNotifier {
    async fn notify(&self, notification: &ReportNotification) -> anyhow::Result<()> {
        tracing::debug!(
            "Notifications disabled, skipping report {}",
            notification.report_id
        );
        Ok(())
    }
}

/// Pick the notifier for the given configuration
pub fn create_notifier(config: &NotificationConfig) -> anyhow::Result<Arc<dyn ReportNotifier>> {
    match &config.webhook_url {
        Some(url) => {
            tracing::info!("Report notifications enabled via webhook: {}", url);
            Ok(Arc::new(WebhookNotifier::new(config)?))
        }
        None => {
            tracing::info!("Report notifications disabled (NOTIFY_WEBHOOK_URL not set)");
            Ok(Arc::new(DisabledNotifier))
        }
    }
}

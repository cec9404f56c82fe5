use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{ReportNotification, ReportNotifier};
use crate::core::config::NotificationConfig;

/// Posts each notification as JSON to a configured URL (mail relay, chat hook, ...)
pub struct WebhookNotifier {
    client: Client,
    url: String,
    recipient: Option<String>,
    sender: String,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    to: Option<&'a str>,
    from: &'a str,
    #[serde(flatten)]
    notification: &'a ReportNotification,
}

impl WebhookNotifier {
    pub fn new(config: &NotificationConfig) -> anyhow::Result<Self> {
        let url = config
            .webhook_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("NOTIFY_WEBHOOK_URL is not set"))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build notification client: {}", e))?;

        Ok(Self {
            client,
            url,
            recipient: config.recipient.clone(),
            sender: config.sender.clone(),
        })
    }
}

#[async_trait]
impl ReportNotifier for WebhookNotifier {
    async fn notify(&self, notification: &ReportNotification) -> anyhow::Result<()> {
        let payload = WebhookPayload {
            to: self.recipient.as_deref(),
            from: &self.sender,
            notification,
        };

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(
            "Notification for report {} delivered to {}",
            notification.report_id,
            self.url
        );
        Ok(())
    }
}

//! SeaTalk webhook delivery.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::contract::{DeliveryError, Notifier};

/// Posts report chunks to a SeaTalk group webhook as markdown-formatted
/// text messages.
pub struct SeaTalkWebhook {
    http: Client,
    url: String,
}

impl SeaTalkWebhook {
    pub fn new(url: String) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Notifier for SeaTalkWebhook {
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        // format 1 = markdown rendering on the receiving client.
        let payload = json!({
            "tag": "text",
            "text": { "format": 1, "content": text },
        });

        let response = self.http.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(format!("webhook returned {status}: {body}").into());
        }
        info!(length = text.len(), "webhook message accepted");
        Ok(())
    }
}

use crate::config::{PUSHOVER_API_TOKEN_ENV, PUSHOVER_USER_KEY_ENV, PushoverConfig};
use crate::plugins::traits::{Notification, NotificationResult, Notifier};
use crate::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Body returned by the Pushover messages endpoint.
#[derive(Debug, Deserialize)]
struct PushoverResponse {
    status: i64,
    request: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

pub struct PushoverNotifier {
    client: Client,
    config: PushoverConfig,
}

impl PushoverNotifier {
    pub fn new(config: PushoverConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;
        Ok(PushoverNotifier { client, config })
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        let user_key = self
            .config
            .user_key
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::NotificationConfig(format!("{} is not set", PUSHOVER_USER_KEY_ENV)))?;
        let api_token = self
            .config
            .api_token
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::NotificationConfig(format!("{} is not set", PUSHOVER_API_TOKEN_ENV)))?;
        Ok((user_key, api_token))
    }

    fn form_fields(&self, notification: &Notification, user_key: &str, api_token: &str) -> Vec<(&'static str, String)> {
        vec![
            ("token", api_token.to_string()),
            ("user", user_key.to_string()),
            ("title", notification.title.clone()),
            ("message", notification.message.clone()),
            ("priority", self.config.priority.to_string()),
            ("timestamp", chrono::Utc::now().timestamp().to_string()),
        ]
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, notification: &Notification) -> Result<NotificationResult> {
        let (user_key, api_token) = self.credentials()?;
        let fields = self.form_fields(notification, user_key, api_token);

        let response = self
            .client
            .post(&self.config.api_url)
            .form(&fields)
            .send()
            .await
            .map_err(|e| AppError::NotificationDelivery(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::NotificationDelivery(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::NotificationDelivery(format!("HTTP {}: {}", status, body.trim())));
        }

        // A 2xx is a delivery; only a readable body can still refuse the message.
        let parsed: PushoverResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Pushover returned HTTP {} with an unreadable body: {}", status, e);
                return Ok(NotificationResult::delivered(None));
            }
        };
        if parsed.status != 1 {
            let error = if parsed.errors.is_empty() {
                format!("Pushover returned status {}", parsed.status)
            } else {
                parsed.errors.join("; ")
            };
            return Ok(NotificationResult::rejected(error));
        }

        tracing::debug!("Pushover accepted message {:?}", parsed.request);
        Ok(NotificationResult::delivered(parsed.request))
    }

    async fn test_connection(&self) -> Result<bool> {
        let notification = Notification {
            title: "Restock watcher".to_string(),
            message: "🧪 Connection test".to_string(),
        };
        let result = self.notify(&notification).await?;
        Ok(result.success)
    }
}

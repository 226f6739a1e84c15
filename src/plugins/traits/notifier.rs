use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A single push message covering every product that came into stock during a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn delivered(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Trait for implementing notification methods (Pushover, etc.)
///
/// `Err` covers missing configuration and transport failures; an `Ok` result with
/// `success == false` means the service answered but refused the message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<NotificationResult>;

    /// Sends a short test message to verify credentials and connectivity.
    async fn test_connection(&self) -> Result<bool>;
}

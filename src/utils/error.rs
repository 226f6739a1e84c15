use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Notification not configured: {0}")]
    NotificationConfig(String),

    #[error("Notification delivery failed: {0}")]
    NotificationDelivery(String),
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

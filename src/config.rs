use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

use crate::models::{Product, default_products};

pub const STATE_DIR_ENV: &str = "STATE_DIR";
pub const PUSHOVER_USER_KEY_ENV: &str = "PUSHOVER_USER_KEY";
pub const PUSHOVER_API_TOKEN_ENV: &str = "PUSHOVER_API_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub state: StateConfig,
    pub pushover: PushoverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub products: Vec<Product>,
    /// Per-request fetch timeout, in seconds.
    pub request_timeout: u64,
    /// Pause between consecutive product fetches.
    pub request_delay_ms: u64,
    pub headers: Vec<RequestHeader>,
    pub single_title: String,
    /// `{count}` is replaced by the number of products in the alert.
    pub multi_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestHeader {
    pub name: String,
    pub value: String,
}

impl RequestHeader {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushoverConfig {
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    pub priority: i8,
    /// Seconds.
    pub request_timeout: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            products: default_products(),
            request_timeout: 15,
            request_delay_ms: 1000,
            headers: default_headers(),
            single_title: "Voorraad beschikbaar!".to_string(),
            multi_title: "{count} producten op voorraad!".to_string(),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_name: "last_notified.txt".to_string(),
        }
    }
}

impl Default for PushoverConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pushover.net/1/messages.json".to_string(),
            user_key: None,
            api_token: None,
            priority: 1,
            request_timeout: 10,
        }
    }
}

/// Browser-like headers; some shops serve bot pages to bare HTTP clients.
pub fn default_headers() -> Vec<RequestHeader> {
    vec![
        RequestHeader::new(
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ),
        RequestHeader::new(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
        RequestHeader::new("Accept-Language", "en-US,en;q=0.5"),
        RequestHeader::new("Accept-Encoding", "gzip, deflate, br"),
        RequestHeader::new("Connection", "keep-alive"),
        RequestHeader::new("Upgrade-Insecure-Requests", "1"),
    ]
}

impl StateConfig {
    /// `dir` if set, else the directory holding the executable.
    pub fn ledger_path(&self) -> PathBuf {
        let dir = self.dir.clone().unwrap_or_else(default_state_dir);
        dir.join(&self.file_name)
    }
}

fn default_state_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl MonitorConfig {
    pub fn title_for(&self, count: usize) -> String {
        if count == 1 {
            self.single_title.clone()
        } else {
            self.multi_title.replace("{count}", &count.to_string())
        }
    }
}

impl AppConfig {
    pub fn from_env(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Start with the built-in product list and defaults
            .add_source(Config::try_from(&AppConfig::default())?)
            // Add local config (ignored by git)
            .add_source(File::with_name("config/restock").required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with prefix "RESTOCK_"
        let s = builder
            .add_source(Environment::with_prefix("RESTOCK").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;
        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `STATE_DIR` and the Pushover credentials. Empty values count as unset.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = lookup(STATE_DIR_ENV) {
            self.state.dir = Some(PathBuf::from(dir));
        }
        if let Some(user_key) = lookup(PUSHOVER_USER_KEY_ENV) {
            self.pushover.user_key = Some(user_key);
        }
        if let Some(api_token) = lookup(PUSHOVER_API_TOKEN_ENV) {
            self.pushover.api_token = Some(api_token);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.products.is_empty() {
            return Err(ConfigError::Message("At least one product must be configured".into()));
        }

        for product in &self.monitor.products {
            if product.name.trim().is_empty() {
                return Err(ConfigError::Message(format!("Product name must not be empty ({})", product.url)));
            }
            if !is_http_url(&product.url) {
                return Err(ConfigError::Message(format!("Invalid product URL: {}", product.url)));
            }
        }

        if self.monitor.request_timeout == 0 {
            return Err(ConfigError::Message("Monitor request_timeout must be greater than 0".into()));
        }

        if self.monitor.headers.iter().any(|h| h.name.trim().is_empty()) {
            return Err(ConfigError::Message("Request header names must not be empty".into()));
        }

        if self.state.file_name.trim().is_empty() {
            return Err(ConfigError::Message("State file_name must not be empty".into()));
        }

        if !is_http_url(&self.pushover.api_url) {
            return Err(ConfigError::Message("Invalid Pushover api_url".into()));
        }

        if !(-2..=2).contains(&self.pushover.priority) {
            return Err(ConfigError::Message("Pushover priority must be between -2 and 2".into()));
        }

        if self.pushover.request_timeout == 0 {
            return Err(ConfigError::Message("Pushover request_timeout must be greater than 0".into()));
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::{Duration, Instant};

use crate::config::{MonitorConfig, RequestHeader};
use crate::{AppError, Result};

/// Retrieves the raw text of a product page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET with browser-like default headers and a fixed timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(build_header_map(&config.headers)?)
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;
        Ok(Self { client })
    }
}

fn build_header_map(headers: &[RequestHeader]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for header in headers {
        let name = HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|e| AppError::InvalidHeader(format!("{}: {}", header.name, e)))?;
        let value = HeaderValue::from_str(&header.value)
            .map_err(|e| AppError::InvalidHeader(format!("{}: {}", header.name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await?;
        tracing::debug!(
            "Fetched {} ({} bytes in {} ms)",
            url,
            body.len(),
            start_time.elapsed().as_millis()
        );
        Ok(body)
    }
}

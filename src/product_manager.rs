use std::collections::HashSet;
use std::process::ExitCode;
use std::time::Duration;

use crate::classifier;
use crate::config::MonitorConfig;
use crate::ledger::NotificationLedger;
use crate::models::{CheckReport, Product, StockStatus};
use crate::plugins::traits::{Notification, Notifier};
use crate::scraper::PageFetcher;

/// What a single monitoring pass ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No product is newly in stock. `in_stock` counts products in stock but already notified.
    NothingToNotify { in_stock: usize },
    Notified { count: usize },
    NotificationFailed { reason: String },
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::NothingToNotify { .. } | RunOutcome::Notified { .. } => 0,
            RunOutcome::NotificationFailed { .. } => 1,
        }
    }
}

impl From<&RunOutcome> for ExitCode {
    fn from(outcome: &RunOutcome) -> Self {
        ExitCode::from(outcome.exit_code())
    }
}

/// Checks every configured product in order and sends at most one combined alert.
pub struct StockMonitor {
    config: MonitorConfig,
    fetcher: Box<dyn PageFetcher>,
    notifier: Box<dyn Notifier>,
    ledger: Box<dyn NotificationLedger>,
}

impl StockMonitor {
    pub fn new(
        config: MonitorConfig,
        fetcher: Box<dyn PageFetcher>,
        notifier: Box<dyn Notifier>,
        ledger: Box<dyn NotificationLedger>,
    ) -> Self {
        Self {
            config,
            fetcher,
            notifier,
            ledger,
        }
    }

    pub fn ledger(&self) -> &dyn NotificationLedger {
        self.ledger.as_ref()
    }

    pub async fn check_product(&self, product: &Product) -> StockStatus {
        match self.fetcher.fetch(&product.url).await {
            Ok(page) => classifier::classify_url(&product.url, &page),
            Err(e) => {
                tracing::error!("Error checking {}: {}", product.name, e);
                StockStatus::Unknown
            }
        }
    }

    /// Fetches and classifies every product sequentially, pausing between requests.
    pub async fn check_all(&self) -> Vec<CheckReport> {
        let delay = Duration::from_millis(self.config.request_delay_ms);
        let mut reports = Vec::with_capacity(self.config.products.len());

        for (index, product) in self.config.products.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let status = self.check_product(product).await;
            tracing::info!("{}: {}", product.name, status);
            reports.push(CheckReport::new(product.clone(), status));
        }

        reports
    }

    pub async fn run(&mut self) -> RunOutcome {
        let notified = self.ledger.load();
        tracing::debug!("Loaded {} previously notified URL(s)", notified.len());

        let reports = self.check_all().await;
        let in_stock = reports.iter().filter(|r| r.status.is_in_stock()).count();
        let new_items = select_new_items(&reports, &notified);

        if new_items.is_empty() {
            tracing::info!("Nothing new to notify ({} in stock, already notified)", in_stock);
            return RunOutcome::NothingToNotify { in_stock };
        }

        let notification = compose_notification(&self.config, &new_items);
        let reason = match self.notifier.notify(&notification).await {
            Ok(result) if result.success => None,
            Ok(result) => Some(result.error.unwrap_or_else(|| "notification rejected".to_string())),
            Err(e) => Some(e.to_string()),
        };

        if let Some(reason) = reason {
            tracing::error!("Failed to send notification: {}", reason);
            return RunOutcome::NotificationFailed { reason };
        }

        let urls: Vec<&str> = new_items.iter().map(|p| p.url.as_str()).collect();
        if let Err(e) = self.ledger.record_all(&urls) {
            tracing::error!("Notification sent but ledger could not be saved: {}", e);
        }

        tracing::info!("Notification sent for {} product(s)", new_items.len());
        RunOutcome::Notified {
            count: new_items.len(),
        }
    }
}

/// In-stock products whose URL is not yet in `notified`, in configuration order.
pub fn select_new_items<'a>(reports: &'a [CheckReport], notified: &HashSet<String>) -> Vec<&'a Product> {
    let mut seen = HashSet::new();
    reports
        .iter()
        .filter(|r| r.status.is_in_stock())
        .map(|r| &r.product)
        .filter(|p| !notified.contains(&p.url))
        .filter(|p| seen.insert(p.url.as_str()))
        .collect()
}

pub fn compose_notification(config: &MonitorConfig, items: &[&Product]) -> Notification {
    let message = items
        .iter()
        .map(|p| format!("✅ {}\n{}", p.name, p.url))
        .collect::<Vec<_>>()
        .join("\n\n");

    Notification {
        title: config.title_for(items.len()),
        message,
    }
}

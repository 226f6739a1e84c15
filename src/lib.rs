pub mod classifier;
pub mod config;
pub mod ledger;
pub mod models;
pub mod plugins;
pub mod product_manager;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use ledger::{FileLedger, InMemoryLedger, NotificationLedger};
pub use models::{CheckReport, Product, SiteKind, StockStatus};
pub use product_manager::{RunOutcome, StockMonitor};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;

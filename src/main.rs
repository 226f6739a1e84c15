use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use restock_watcher::plugins::{Notifier, PushoverNotifier};
use restock_watcher::scraper::HttpFetcher;
use restock_watcher::{AppConfig, FileLedger, NotificationLedger, StockMonitor};

#[derive(Parser)]
#[command(name = "restock-watcher", version, about = "Checks product pages and alerts once when they come into stock")]
struct Cli {
    /// Extra configuration file merged over the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the notification ledger (overrides STATE_DIR)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check every product and notify about new stock (default)
    Run,
    /// Check every product and print its status without notifying
    Check,
    /// Send a test push notification
    TestNotification,
    /// Inspect or reset the notification ledger
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },
}

#[derive(Subcommand)]
enum LedgerAction {
    /// List URLs that were already notified
    Show,
    /// Forget every notified URL so they can alert again
    Clear,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("restock_watcher=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.state_dir {
        config.state.dir = Some(dir);
    }

    let ledger_path = config.state.ledger_path();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            info!("Checking {} product(s), ledger at {}", config.monitor.products.len(), ledger_path.display());
            let fetcher = HttpFetcher::new(&config.monitor)?;
            let notifier = PushoverNotifier::new(config.pushover.clone())?;
            let mut monitor = StockMonitor::new(
                config.monitor,
                Box::new(fetcher),
                Box::new(notifier),
                Box::new(FileLedger::new(ledger_path)),
            );

            let outcome = monitor.run().await;
            Ok(ExitCode::from(&outcome))
        }
        Command::Check => {
            let fetcher = HttpFetcher::new(&config.monitor)?;
            let notifier = PushoverNotifier::new(config.pushover.clone())?;
            let monitor = StockMonitor::new(
                config.monitor,
                Box::new(fetcher),
                Box::new(notifier),
                Box::new(FileLedger::new(ledger_path)),
            );

            let notified = monitor.ledger().load();
            for report in monitor.check_all().await {
                let marker = if notified.contains(&report.product.url) { " (notified)" } else { "" };
                let site = report.product.site_kind().map(|kind| kind.to_string()).unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<14} {:<16} {}{}",
                    report.status.to_string(),
                    site,
                    report.product.name,
                    marker
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::TestNotification => {
            let notifier = PushoverNotifier::new(config.pushover)?;
            match notifier.test_connection().await {
                Ok(true) => {
                    info!("Test notification sent");
                    Ok(ExitCode::SUCCESS)
                }
                Ok(false) => {
                    error!("Test notification was rejected");
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => {
                    error!("Test notification failed: {}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Ledger { action } => {
            let mut ledger = FileLedger::new(ledger_path);
            match action {
                LedgerAction::Show => {
                    let mut urls: Vec<String> = ledger.load().into_iter().collect();
                    urls.sort();
                    for url in urls {
                        println!("{}", url);
                    }
                }
                LedgerAction::Clear => {
                    ledger.save(&Default::default())?;
                    info!("Cleared ledger {}", ledger.path().display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

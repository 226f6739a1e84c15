use super::*;
use restock_watcher::{NotificationLedger, RunOutcome};
use std::collections::HashSet;
use tokio_test::assert_ok;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

const IN_STOCK_PC: &str = "<html><button class=\"add-to-cart\">Add to Cart</button></html>";
const SOLD_OUT_PC: &str = "<html><button disabled>Add to Cart</button><p>Sold Out</p></html>";
const IN_STOCK_MM: &str = "<html><button>In winkelwagen</button></html>";

async fn mount_pushover_ok(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(PUSHOVER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":1,"request":"req-1"}"#))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_new_products_are_notified_and_recorded() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUSHOVER_PATH))
        .and(body_string_contains("title=2+producten+op+voorraad%21"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":1,"request":"req-1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new()?;
    let pages = StaticPages::new(&[
        (PC_PERFECT_ORDER, IN_STOCK_PC),
        (PC_BUNDLE, SOLD_OUT_PC),
        (MM_ETB, IN_STOCK_MM),
    ]);
    let mut monitor = create_monitor(pages, pushover_config(&server), &dir)?;

    let outcome = monitor.run().await;
    assert_eq!(outcome, RunOutcome::Notified { count: 2 });
    assert_eq!(outcome.exit_code(), 0);

    let persisted = ledger_in(&dir).load();
    assert_eq!(
        persisted,
        HashSet::from([PC_PERFECT_ORDER.to_string(), MM_ETB.to_string()])
    );
    Ok(())
}

#[tokio::test]
async fn test_already_notified_product_sends_nothing() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_pushover_ok(&server, 0).await;

    let dir = TempDir::new()?;
    assert_ok!(ledger_in(&dir).record_sent(PC_PERFECT_ORDER));

    let pages = StaticPages::new(&[
        (PC_PERFECT_ORDER, IN_STOCK_PC),
        (PC_BUNDLE, SOLD_OUT_PC),
        (MM_ETB, "<html>Niet op voorraad</html>"),
    ]);
    let mut monitor = create_monitor(pages, pushover_config(&server), &dir)?;

    let outcome = monitor.run().await;
    assert_eq!(outcome, RunOutcome::NothingToNotify { in_stock: 1 });
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(ledger_in(&dir).load(), HashSet::from([PC_PERFECT_ORDER.to_string()]));
    Ok(())
}

#[tokio::test]
async fn test_failed_delivery_leaves_ledger_unchanged() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUSHOVER_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream error"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new()?;
    let pages = StaticPages::new(&[(PC_PERFECT_ORDER, IN_STOCK_PC), (MM_ETB, IN_STOCK_MM)]);
    let mut monitor = create_monitor(pages, pushover_config(&server), &dir)?;

    let outcome = monitor.run().await;
    assert!(matches!(outcome, RunOutcome::NotificationFailed { .. }));
    assert_eq!(outcome.exit_code(), 1);
    assert!(ledger_in(&dir).load().is_empty());
    assert!(!dir.path().join("last_notified.txt").exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_credentials_is_a_failed_send() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_pushover_ok(&server, 0).await;

    let dir = TempDir::new()?;
    let mut pushover = pushover_config(&server);
    pushover.user_key = None;

    let pages = StaticPages::new(&[(PC_PERFECT_ORDER, IN_STOCK_PC)]);
    let mut monitor = create_monitor(pages, pushover, &dir)?;

    let outcome = monitor.run().await;
    match &outcome {
        RunOutcome::NotificationFailed { reason } => assert!(reason.contains("PUSHOVER_USER_KEY")),
        other => panic!("expected failed send, got {:?}", other),
    }
    assert_eq!(outcome.exit_code(), 1);
    assert!(ledger_in(&dir).load().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_bot_block_page_is_not_treated_as_stock() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_pushover_ok(&server, 0).await;

    let dir = TempDir::new()?;
    let pages = StaticPages::new(&[(
        PC_PERFECT_ORDER,
        "<title>Pardon Our Interruption</title><button>Add to Cart</button>",
    )]);
    let mut monitor = create_monitor(pages, pushover_config(&server), &dir)?;

    let outcome = monitor.run().await;
    assert_eq!(outcome, RunOutcome::NothingToNotify { in_stock: 0 });
    Ok(())
}

#[tokio::test]
async fn test_second_run_does_not_alert_again() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_pushover_ok(&server, 1).await;

    let dir = TempDir::new()?;
    let page_set = [(PC_PERFECT_ORDER, IN_STOCK_PC)];

    let mut first = create_monitor(StaticPages::new(&page_set), pushover_config(&server), &dir)?;
    assert_eq!(first.run().await, RunOutcome::Notified { count: 1 });

    let mut second = create_monitor(StaticPages::new(&page_set), pushover_config(&server), &dir)?;
    assert_eq!(second.run().await, RunOutcome::NothingToNotify { in_stock: 1 });
    Ok(())
}

#[tokio::test]
async fn test_plain_text_success_reply_counts_as_delivered() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUSHOVER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new()?;
    let page_set = [(PC_PERFECT_ORDER, IN_STOCK_PC)];

    let mut first = create_monitor(StaticPages::new(&page_set), pushover_config(&server), &dir)?;
    let outcome = first.run().await;
    assert_eq!(outcome, RunOutcome::Notified { count: 1 });
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(ledger_in(&dir).load(), HashSet::from([PC_PERFECT_ORDER.to_string()]));

    let mut second = create_monitor(StaticPages::new(&page_set), pushover_config(&server), &dir)?;
    assert_eq!(second.run().await, RunOutcome::NothingToNotify { in_stock: 1 });
    Ok(())
}

#[tokio::test]
async fn test_unreadable_ledger_is_not_overwritten() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_pushover_ok(&server, 1).await;

    let dir = TempDir::new()?;
    let ledger_file = dir.path().join("last_notified.txt");
    let mut original = format!("{}\n", MM_ETB).into_bytes();
    original.extend_from_slice(&[0xff, 0xfe, b'\n']);
    std::fs::write(&ledger_file, &original)?;

    let pages = StaticPages::new(&[(PC_PERFECT_ORDER, IN_STOCK_PC)]);
    let mut monitor = create_monitor(pages, pushover_config(&server), &dir)?;

    assert_eq!(monitor.run().await, RunOutcome::Notified { count: 1 });
    assert_eq!(std::fs::read(&ledger_file)?, original);
    Ok(())
}

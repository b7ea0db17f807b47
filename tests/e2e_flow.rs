//! Live end-to-end flow against the real marketplace. Needs a local Chrome
//! install and network access, so it only runs when asked for explicitly:
//!
//!     cargo test --test e2e_flow -- --ignored

use cartwright::flow::run_budget_flow;
use cartwright::{BrowserSession, ChromeBrowser, Config, RandomChoice, TestRecord};

#[tokio::test]
#[ignore = "requires a local Chrome install and live network access"]
async fn budget_flow_end_to_end() {
    let record = TestRecord {
        item_name: "usb c cable".to_string(),
        max_price: 15.0,
        limit: 3,
    };

    let config = Config::default();
    let browser = ChromeBrowser::new();
    let mut session = BrowserSession::new(browser, config.clone())
        .await
        .expect("browser session");

    session
        .try_restore_state(&config.suite.storage_state_path)
        .await
        .expect("state restore");

    let report = run_budget_flow(&mut session, &record, &RandomChoice)
        .await
        .expect("flow should complete");
    session.close().await.expect("session close");

    if report.skipped() {
        eprintln!("no qualifying items under the ceiling, nothing to assert");
        return;
    }

    assert!(report.collected.len() <= record.limit);
    let subtotal = report.subtotal.expect("cart subtotal");
    assert!(
        subtotal <= report.threshold,
        "budget breach: {} > {}",
        subtotal,
        report.threshold
    );
}

use cartwright::flow::{run_budget_flow, write_report};
use cartwright::{load_test_data, BrowserSession, ChromeBrowser, Config, RandomChoice};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "cartwright", about = "Commerce search and cart budget test suite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every scenario in the test-data file
    Run {
        /// Path to the JSON scenario records
        #[arg(long, default_value = "data/test_data.json")]
        data: PathBuf,
        /// Show the browser window instead of running headless
        #[arg(long)]
        headed: bool,
    },
    /// Open a browser for manual sign-in and persist the session state
    GenerateAuth {
        /// Seconds to leave the sign-in window open
        #[arg(long, default_value_t = 60)]
        wait_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { data, headed } => run_suite(&data, headed).await,
        Commands::GenerateAuth { wait_secs } => generate_auth(wait_secs).await,
    }
}

async fn run_suite(data: &Path, headed: bool) -> anyhow::Result<()> {
    let records = load_test_data(data)?;
    info!(scenarios = records.len(), "Loaded test data");

    let mut config = Config::default();
    config.browser.headless = !headed;

    let mut failed = 0usize;

    for record in &records {
        let browser = ChromeBrowser::new();
        let mut session = BrowserSession::new(browser, config.clone()).await?;

        if session
            .try_restore_state(&config.suite.storage_state_path)
            .await?
        {
            info!(
                path = %config.suite.storage_state_path.display(),
                "Using persisted session state"
            );
        }

        let result = run_budget_flow(&mut session, record, &RandomChoice).await;
        session.close().await?;

        match result {
            Ok(report) if report.skipped() => {
                warn!(
                    query = %report.query,
                    ceiling = report.price_ceiling,
                    "No qualifying items, scenario skipped"
                );
            }
            Ok(report) => {
                let path = write_report(&report, &config.suite.reports_dir)?;
                info!(report = %path.display(), "Report written");

                let added = report.outcomes.iter().filter(|o| o.added).count();
                info!(
                    added,
                    collected = report.collected.len(),
                    "Cart accumulation finished"
                );

                match report.within_budget() {
                    Some(true) => info!(
                        subtotal = report.subtotal,
                        threshold = report.threshold,
                        "Budget check passed"
                    ),
                    Some(false) => {
                        error!(
                            subtotal = report.subtotal,
                            threshold = report.threshold,
                            "Budget exceeded"
                        );
                        failed += 1;
                    }
                    None if added > 0 => {
                        warn!("Cart subtotal unavailable, budget not evaluated");
                        failed += 1;
                    }
                    None => {
                        warn!("No items were added, budget not evaluated");
                    }
                }
            }
            Err(err) => {
                error!(query = %record.item_name, %err, "Scenario failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} scenarios failed", failed, records.len());
    }
    info!("All scenarios passed");
    Ok(())
}

async fn generate_auth(wait_secs: u64) -> anyhow::Result<()> {
    let mut config = Config::default();
    config.browser.headless = false;

    let browser = ChromeBrowser::new();
    let mut session = BrowserSession::new(browser, config.clone()).await?;

    session.navigate_and_wait(&config.suite.signin_url).await?;
    info!(
        wait_secs,
        "Complete the sign-in in the opened browser window"
    );
    tokio::time::sleep(std::time::Duration::from_secs(wait_secs)).await;

    let state = session.extract_state(&config.suite.domain()).await?;
    session
        .save_state(&state, &config.suite.storage_state_path)
        .await?;
    session.close().await?;

    info!(
        path = %config.suite.storage_state_path.display(),
        "Session state saved"
    );
    Ok(())
}

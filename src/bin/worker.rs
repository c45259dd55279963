use tokio::time::interval;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;
use tracing::Level;
use stakemarket::clients::ChainClient;
use stakemarket::config::AppConfig;
use stakemarket::db;
use stakemarket::jobs::run_funding_sync;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing (INFO level)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = AppConfig::from_env()?;

    // Command‑line flags
    let args: Vec<String> = env::args().collect();
    let run_once = args.iter().any(|a| a == "--funding-sync");

    let db_conn = db::connect(&config.database_url).await?;
    let chain = config
        .chain_rpc_url
        .as_ref()
        .map(|url| ChainClient::new(url.clone(), config.receipt_timeout));
    if chain.is_none() {
        info!("CHAIN_RPC_URL not set; only recorded funding is considered");
    }

    if run_once {
        run_funding_sync(&db_conn, chain.as_ref()).await?;
        return Ok(());
    }

    info!(
        "Worker starting; running funding sync every {} seconds",
        config.worker_interval.as_secs()
    );

    let mut ticker = interval(config.worker_interval);
    loop {
        ticker.tick().await;
        info!("Running scheduled jobs...");

        if let Err(e) = run_funding_sync(&db_conn, chain.as_ref()).await {
            error!(?e, "funding-sync job failed");
        }
        info!("Scheduled jobs finished.");
    }
}

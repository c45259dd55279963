use std::net::SocketAddr;

use stakemarket::config::AppConfig;
use stakemarket::{create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let db = db::connect(&config.database_url).await?;
    let bind_addr = config.bind_addr.clone();

    // Run our server
    let app = create_app(AppState::new(db, config));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

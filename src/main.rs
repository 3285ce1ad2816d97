use agts_fares::config::AppConfig;
use agts_fares::pricing::PricingService;
use agts_fares::{app, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let pricing = PricingService::from_source(config.rate_table_path.clone())?;
    let addr = config.socket_addr()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Fare service listening on {}", addr);

    axum::serve(listener, app(AppState { pricing })).await?;
    Ok(())
}

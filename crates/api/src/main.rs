use std::sync::Arc;

use anyhow::Context;
use roicalc_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    roicalc_observability::init();

    let config = AppConfig::from_env()?;
    let services = roicalc_api::app::services::build_services(&config).await?;
    let app = roicalc_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(addr = %listener.local_addr()?, store = ?config.store, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

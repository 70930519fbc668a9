use std::sync::Arc;

use anyhow::Context;

use userbase_api::app::{build_app, AppServices};
use userbase_infra::{db, AppConfig, PostgresUserGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    userbase_observability::init();

    let config = AppConfig::from_env().context("failed to read configuration")?;

    let services = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::connect(&config, url)
                .await
                .context("failed to connect to postgres")?;
            AppServices::new(Arc::new(PostgresUserGateway::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory user store");
            AppServices::in_memory()
        }
    };

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

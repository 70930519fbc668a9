//! Connection pool construction.

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::AppConfig;

/// Open a Postgres pool for `database_url`.
///
/// Connections are acquired per statement and returned when it completes;
/// callers only ever hold the `PgPool` handle.
pub async fn connect(config: &AppConfig, database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await?;
    info!(max_connections = config.max_connections, "connected to postgres");
    Ok(pool)
}

//! Infrastructure layer: user persistence, connection pool, configuration.

pub mod config;
pub mod db;
pub mod users;

pub use config::{AppConfig, ConfigError};
pub use users::{InMemoryUserGateway, PostgresUserGateway, StoreError, UserGateway};

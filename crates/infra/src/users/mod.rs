//! User persistence boundary.
//!
//! `UserGateway` is the only place SQL for the `users` table is built. Both
//! implementations are `Send + Sync` and shared across request tasks as
//! `Arc<dyn UserGateway>`.

pub mod gateway;
pub mod in_memory;
pub mod postgres;

pub use gateway::{StoreError, UserGateway};
pub use in_memory::InMemoryUserGateway;
pub use postgres::PostgresUserGateway;

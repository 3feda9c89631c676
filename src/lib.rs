//! Pharmacy locator: accounts, pharmacy and medicine catalogs, per-pharmacy inventory,
//! medicine search logging and SMS availability requests over a REST API.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError, FieldErrors};
pub use migration::apply_migrations;
pub use routes::app;
pub use settings::{Settings, StoreBackend};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};

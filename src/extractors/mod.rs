//! Request extractors.

pub mod auth;
mod json;
mod params;

pub use auth::{CurrentAccount, MaybeAccount};
pub use json::AppJson;
pub use params::{AppPath, AppQuery};

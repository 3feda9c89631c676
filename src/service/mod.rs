//! Business rules between handlers and the store.

mod accounts;
pub mod auth;
mod inventory;
mod validation;

pub use accounts::AccountService;
pub use inventory::InventoryService;
pub use validation::{TextRule, Validate, Validator};

//! HTTP handlers, one module per resource.

pub mod accounts;
pub mod home;
pub mod inventory;
pub mod logs;
pub mod medicines;
pub mod pharmacies;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quantity of one medicine on hand at one pharmacy. Unique per (pharmacy, medicine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Inventory {
    pub id: i64,
    pub pharmacy_id: i64,
    pub medicine_id: i64,
    pub quantity: i32,
    pub last_updated: DateTime<Utc>,
}

/// Body of add-to-inventory and inventory create. Quantity overwrites the stored value.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct AddMedicineRequest {
    pub medicine_id: i64,
    pub quantity: i32,
    /// Optional on create; must name the caller's own pharmacy when given.
    pub pharmacy_id: Option<i64>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryPatch {
    pub quantity: i32,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct InventoryFilter {
    pub pharmacy_id: Option<i64>,
    pub medicine_id: Option<i64>,
}

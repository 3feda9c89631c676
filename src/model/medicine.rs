use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    /// Brand or manufacturer.
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
    /// Ids of medicines that can stand in for this one, ascending.
    pub alternative_medicine_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMedicine {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "manufacturer")]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub alternative_medicine_ids: Vec<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MedicinePatch {
    pub name: Option<String>,
    #[serde(alias = "manufacturer")]
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    /// Replaces the whole set when present.
    pub alternative_medicine_ids: Option<Vec<i64>>,
}

/// `?search=` on the medicine list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MedicineFilter {
    pub search: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MedicineSearchQuery {
    #[serde(alias = "q")]
    pub name: Option<String>,
}

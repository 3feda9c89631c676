use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Pharmacy {
    pub id: i64,
    pub account_id: i64,
    pub store_name: String,
    pub license_number: String,
    pub address: String,
    pub location: String,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
}

/// Pharmacy fields supplied by the owner; the owning account comes from the session.
#[derive(Clone, Debug, Deserialize)]
pub struct NewPharmacy {
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contact_number: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PharmacyPatch {
    pub store_name: Option<String>,
    pub license_number: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub contact_number: Option<String>,
}

/// Staff link between an account and a pharmacy.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Pharmacist {
    pub id: i64,
    pub account_id: i64,
    pub pharmacy_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct NewPharmacist {
    pub account_id: i64,
    pub pharmacy_id: i64,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct PharmacistFilter {
    pub pharmacy_id: Option<i64>,
}

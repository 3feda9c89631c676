use super::{NewPharmacy, Pharmacy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. `is_pharmacy` is the role flag for pharmacy owners.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub location: String,
    pub is_pharmacy: bool,
    pub is_smartphone_user: bool,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account row to insert; the password is already hashed.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub username: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub location: String,
    pub is_pharmacy: bool,
    pub is_smartphone_user: bool,
    pub password_hash: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub is_smartphone_user: Option<bool>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_pharmacy: bool,
    #[serde(default = "default_true")]
    pub is_smartphone_user: bool,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
    /// Required when `is_pharmacy` is set.
    pub store_name: Option<String>,
    pub license_number: Option<String>,
}

impl RegisterRequest {
    /// Pharmacy details carried by a pharmacy-owner registration.
    pub fn pharmacy(&self) -> Option<NewPharmacy> {
        if !self.is_pharmacy {
            return None;
        }
        Some(NewPharmacy {
            store_name: self.store_name.clone().unwrap_or_default(),
            license_number: self.license_number.clone().unwrap_or_default(),
            address: self.address.clone(),
            location: self.location.clone(),
            contact_number: self.phone_number.clone(),
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Session {
    pub token: String,
    pub account_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Body returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub account: Account,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pharmacy: Option<Pharmacy>,
}

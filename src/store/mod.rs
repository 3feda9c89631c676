//! Persistence behind one trait: PostgreSQL for deployments, in-process tables for local runs and tests.
//!
//! Every method is one transaction. Lookups return `Ok(None)` (or `false` for deletes) for missing
//! rows; handlers turn that into 404.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::AppError;
use crate::model::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait Store: Send + Sync {
    /// Readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    /// Insert an account and, for pharmacy owners, its pharmacy plus inventory coverage rows, atomically.
    async fn create_account(
        &self,
        account: NewAccount,
        pharmacy: Option<NewPharmacy>,
    ) -> Result<(Account, Option<Pharmacy>), AppError>;
    async fn account(&self, id: i64) -> Result<Option<Account>, AppError>;
    async fn account_by_username(&self, username: &str) -> Result<Option<Account>, AppError>;
    async fn list_accounts(&self, page: Page) -> Result<Vec<Account>, AppError>;
    async fn update_account(&self, id: i64, patch: AccountPatch) -> Result<Option<Account>, AppError>;
    async fn delete_account(&self, id: i64) -> Result<bool, AppError>;

    async fn create_session(&self, session: Session) -> Result<(), AppError>;
    /// Account behind an unexpired session token.
    async fn session_account(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Account>, AppError>;
    async fn delete_session(&self, token: &str) -> Result<bool, AppError>;

    /// Insert a pharmacy and one zero-quantity inventory row per existing medicine.
    async fn create_pharmacy(&self, account_id: i64, pharmacy: NewPharmacy) -> Result<Pharmacy, AppError>;
    async fn pharmacy(&self, id: i64) -> Result<Option<Pharmacy>, AppError>;
    async fn pharmacy_by_account(&self, account_id: i64) -> Result<Option<Pharmacy>, AppError>;
    async fn list_pharmacies(&self, page: Page) -> Result<Vec<Pharmacy>, AppError>;
    async fn update_pharmacy(&self, id: i64, patch: PharmacyPatch) -> Result<Option<Pharmacy>, AppError>;
    async fn delete_pharmacy(&self, id: i64) -> Result<bool, AppError>;

    async fn create_pharmacist(&self, link: NewPharmacist) -> Result<Pharmacist, AppError>;
    async fn pharmacist(&self, id: i64) -> Result<Option<Pharmacist>, AppError>;
    async fn list_pharmacists(&self, filter: PharmacistFilter, page: Page) -> Result<Vec<Pharmacist>, AppError>;
    async fn delete_pharmacist(&self, id: i64) -> Result<bool, AppError>;

    /// Fails with a validation error on `alternative_medicine_ids` when any id is unknown.
    async fn create_medicine(&self, medicine: NewMedicine) -> Result<Medicine, AppError>;
    async fn medicine(&self, id: i64) -> Result<Option<Medicine>, AppError>;
    async fn list_medicines(&self, filter: MedicineFilter, page: Page) -> Result<Vec<Medicine>, AppError>;
    /// Every medicine whose name contains `needle`, case-insensitively, ordered by id.
    /// Case folding is the backend's: Unicode lowercase in memory, `ILIKE` under the database collation.
    async fn search_medicines(&self, needle: &str) -> Result<Vec<Medicine>, AppError>;
    async fn update_medicine(&self, id: i64, patch: MedicinePatch) -> Result<Option<Medicine>, AppError>;
    async fn delete_medicine(&self, id: i64) -> Result<bool, AppError>;

    async fn inventory(&self, id: i64) -> Result<Option<Inventory>, AppError>;
    async fn list_inventory(&self, filter: InventoryFilter, page: Page) -> Result<Vec<Inventory>, AppError>;
    /// Get-or-create the (pharmacy, medicine) row and set its quantity.
    async fn upsert_inventory(&self, pharmacy_id: i64, medicine_id: i64, quantity: i32) -> Result<Inventory, AppError>;
    async fn update_inventory(&self, id: i64, quantity: i32) -> Result<Option<Inventory>, AppError>;
    async fn delete_inventory(&self, id: i64) -> Result<bool, AppError>;

    async fn create_search_log(&self, log: NewSearchLog) -> Result<SearchLog, AppError>;
    async fn search_log(&self, id: i64) -> Result<Option<SearchLog>, AppError>;
    async fn list_search_logs(&self, filter: SearchLogFilter, page: Page) -> Result<Vec<SearchLog>, AppError>;

    async fn create_sms_request(&self, request: NewSmsRequest) -> Result<SmsRequest, AppError>;
    async fn sms_request(&self, id: i64) -> Result<Option<SmsRequest>, AppError>;
    async fn list_sms_requests(&self, filter: SmsRequestFilter, page: Page) -> Result<Vec<SmsRequest>, AppError>;
}

/// Validation error listing the alternative ids that do not exist.
pub(crate) fn unknown_alternatives(missing: &[i64]) -> AppError {
    let ids = missing.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
    AppError::field("alternative_medicine_ids", format!("unknown medicine id(s): {}", ids))
}

/// Sorted, deduplicated alternative ids without `self_id`.
pub(crate) fn normalize_alternatives(ids: &[i64], self_id: Option<i64>) -> Vec<i64> {
    let mut out: Vec<i64> = ids.iter().copied().filter(|id| Some(*id) != self_id).collect();
    out.sort_unstable();
    out.dedup();
    out
}

//! In-process store. All tables sit behind one lock, so every method is atomic.

use super::{normalize_alternatives, unknown_alternatives, Store};
use crate::error::AppError;
use crate::model::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn page(&self, page: Page, keep: impl Fn(&T) -> bool) -> Vec<T> {
        page.slice(self.rows.values().filter(|r| keep(*r)).cloned())
    }
}

#[derive(Default)]
struct Tables {
    accounts: Table<Account>,
    sessions: HashMap<String, Session>,
    pharmacies: Table<Pharmacy>,
    pharmacists: Table<Pharmacist>,
    medicines: Table<Medicine>,
    inventory: Table<Inventory>,
    search_logs: Table<SearchLog>,
    sms_requests: Table<SmsRequest>,
}

impl Tables {
    fn insert_pharmacy(&mut self, account_id: i64, new: NewPharmacy, now: DateTime<Utc>) -> Result<Pharmacy, AppError> {
        if self.pharmacies.rows.values().any(|p| p.account_id == account_id) {
            return Err(AppError::Conflict("account already owns a pharmacy".into()));
        }
        let pharmacy = self.pharmacies.insert_with(|id| Pharmacy {
            id,
            account_id,
            store_name: new.store_name,
            license_number: new.license_number,
            address: new.address,
            location: new.location,
            contact_number: new.contact_number,
            created_at: now,
        });
        let medicine_ids: Vec<i64> = self.medicines.rows.keys().copied().collect();
        for medicine_id in medicine_ids {
            self.inventory.insert_with(|id| Inventory {
                id,
                pharmacy_id: pharmacy.id,
                medicine_id,
                quantity: 0,
                last_updated: now,
            });
        }
        Ok(pharmacy)
    }

    fn remove_pharmacy(&mut self, id: i64) -> bool {
        if self.pharmacies.rows.remove(&id).is_none() {
            return false;
        }
        self.inventory.rows.retain(|_, r| r.pharmacy_id != id);
        self.pharmacists.rows.retain(|_, r| r.pharmacy_id != id);
        true
    }

    fn check_alternatives(&self, ids: &[i64]) -> Result<(), AppError> {
        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !self.medicines.rows.contains_key(id))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(unknown_alternatives(&missing))
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_account(
        &self,
        new: NewAccount,
        pharmacy: Option<NewPharmacy>,
    ) -> Result<(Account, Option<Pharmacy>), AppError> {
        let mut t = self.write();
        if t.accounts.rows.values().any(|a| a.username == new.username) {
            return Err(AppError::Conflict("username already taken".into()));
        }
        let now = Utc::now();
        let account = t.accounts.insert_with(|id| Account {
            id,
            username: new.username,
            name: new.name,
            phone_number: new.phone_number,
            address: new.address,
            location: new.location,
            is_pharmacy: new.is_pharmacy,
            is_smartphone_user: new.is_smartphone_user,
            password_hash: new.password_hash,
            created_at: now,
        });
        let pharmacy = match pharmacy {
            Some(p) => Some(t.insert_pharmacy(account.id, p, now)?),
            None => None,
        };
        Ok((account, pharmacy))
    }

    async fn account(&self, id: i64) -> Result<Option<Account>, AppError> {
        Ok(self.read().accounts.get(id))
    }

    async fn account_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        Ok(self.read().accounts.rows.values().find(|a| a.username == username).cloned())
    }

    async fn list_accounts(&self, page: Page) -> Result<Vec<Account>, AppError> {
        Ok(self.read().accounts.page(page, |_| true))
    }

    async fn update_account(&self, id: i64, patch: AccountPatch) -> Result<Option<Account>, AppError> {
        let mut t = self.write();
        let Some(a) = t.accounts.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = patch.name {
            a.name = v;
        }
        if let Some(v) = patch.phone_number {
            a.phone_number = v;
        }
        if let Some(v) = patch.address {
            a.address = v;
        }
        if let Some(v) = patch.location {
            a.location = v;
        }
        if let Some(v) = patch.is_smartphone_user {
            a.is_smartphone_user = v;
        }
        Ok(Some(a.clone()))
    }

    async fn delete_account(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.write();
        if t.accounts.rows.remove(&id).is_none() {
            return Ok(false);
        }
        t.sessions.retain(|_, s| s.account_id != id);
        t.pharmacists.rows.retain(|_, p| p.account_id != id);
        let owned: Vec<i64> = t
            .pharmacies
            .rows
            .values()
            .filter(|p| p.account_id == id)
            .map(|p| p.id)
            .collect();
        for pharmacy_id in owned {
            t.remove_pharmacy(pharmacy_id);
        }
        for log in t.search_logs.rows.values_mut() {
            if log.account_id == Some(id) {
                log.account_id = None;
            }
        }
        Ok(true)
    }

    async fn create_session(&self, session: Session) -> Result<(), AppError> {
        self.write().sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn session_account(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Account>, AppError> {
        let t = self.read();
        Ok(t.sessions
            .get(token)
            .filter(|s| s.expires_at > now)
            .and_then(|s| t.accounts.get(s.account_id)))
    }

    async fn delete_session(&self, token: &str) -> Result<bool, AppError> {
        Ok(self.write().sessions.remove(token).is_some())
    }

    async fn create_pharmacy(&self, account_id: i64, pharmacy: NewPharmacy) -> Result<Pharmacy, AppError> {
        let mut t = self.write();
        if !t.accounts.rows.contains_key(&account_id) {
            return Err(AppError::NotFound(format!("account {}", account_id)));
        }
        t.insert_pharmacy(account_id, pharmacy, Utc::now())
    }

    async fn pharmacy(&self, id: i64) -> Result<Option<Pharmacy>, AppError> {
        Ok(self.read().pharmacies.get(id))
    }

    async fn pharmacy_by_account(&self, account_id: i64) -> Result<Option<Pharmacy>, AppError> {
        Ok(self
            .read()
            .pharmacies
            .rows
            .values()
            .find(|p| p.account_id == account_id)
            .cloned())
    }

    async fn list_pharmacies(&self, page: Page) -> Result<Vec<Pharmacy>, AppError> {
        Ok(self.read().pharmacies.page(page, |_| true))
    }

    async fn update_pharmacy(&self, id: i64, patch: PharmacyPatch) -> Result<Option<Pharmacy>, AppError> {
        let mut t = self.write();
        let Some(p) = t.pharmacies.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = patch.store_name {
            p.store_name = v;
        }
        if let Some(v) = patch.license_number {
            p.license_number = v;
        }
        if let Some(v) = patch.address {
            p.address = v;
        }
        if let Some(v) = patch.location {
            p.location = v;
        }
        if let Some(v) = patch.contact_number {
            p.contact_number = v;
        }
        Ok(Some(p.clone()))
    }

    async fn delete_pharmacy(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.write().remove_pharmacy(id))
    }

    async fn create_pharmacist(&self, link: NewPharmacist) -> Result<Pharmacist, AppError> {
        let mut t = self.write();
        if !t.accounts.rows.contains_key(&link.account_id) {
            return Err(AppError::NotFound(format!("account {}", link.account_id)));
        }
        if !t.pharmacies.rows.contains_key(&link.pharmacy_id) {
            return Err(AppError::NotFound(format!("pharmacy {}", link.pharmacy_id)));
        }
        if t
            .pharmacists
            .rows
            .values()
            .any(|p| p.account_id == link.account_id && p.pharmacy_id == link.pharmacy_id)
        {
            return Err(AppError::Conflict("account is already a pharmacist there".into()));
        }
        Ok(t.pharmacists.insert_with(|id| Pharmacist {
            id,
            account_id: link.account_id,
            pharmacy_id: link.pharmacy_id,
            created_at: Utc::now(),
        }))
    }

    async fn pharmacist(&self, id: i64) -> Result<Option<Pharmacist>, AppError> {
        Ok(self.read().pharmacists.get(id))
    }

    async fn list_pharmacists(&self, filter: PharmacistFilter, page: Page) -> Result<Vec<Pharmacist>, AppError> {
        Ok(self
            .read()
            .pharmacists
            .page(page, |p| filter.pharmacy_id.map_or(true, |id| p.pharmacy_id == id)))
    }

    async fn delete_pharmacist(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.write().pharmacists.rows.remove(&id).is_some())
    }

    async fn create_medicine(&self, new: NewMedicine) -> Result<Medicine, AppError> {
        let mut t = self.write();
        let alternatives = normalize_alternatives(&new.alternative_medicine_ids, None);
        t.check_alternatives(&alternatives)?;
        Ok(t.medicines.insert_with(|id| Medicine {
            id,
            name: new.name,
            brand: new.brand,
            category: new.category,
            description: new.description,
            price: new.price.unwrap_or_default(),
            alternative_medicine_ids: alternatives,
            created_at: Utc::now(),
        }))
    }

    async fn medicine(&self, id: i64) -> Result<Option<Medicine>, AppError> {
        Ok(self.read().medicines.get(id))
    }

    async fn list_medicines(&self, filter: MedicineFilter, page: Page) -> Result<Vec<Medicine>, AppError> {
        let needle = filter.search.map(|s| s.to_lowercase());
        Ok(self.read().medicines.page(page, |m| {
            needle.as_deref().map_or(true, |n| m.name.to_lowercase().contains(n))
        }))
    }

    async fn search_medicines(&self, needle: &str) -> Result<Vec<Medicine>, AppError> {
        let needle = needle.to_lowercase();
        Ok(self
            .read()
            .medicines
            .rows
            .values()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn update_medicine(&self, id: i64, patch: MedicinePatch) -> Result<Option<Medicine>, AppError> {
        let mut t = self.write();
        if !t.medicines.rows.contains_key(&id) {
            return Ok(None);
        }
        let alternatives = match &patch.alternative_medicine_ids {
            Some(ids) => {
                let ids = normalize_alternatives(ids, Some(id));
                t.check_alternatives(&ids)?;
                Some(ids)
            }
            None => None,
        };
        let Some(m) = t.medicines.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = patch.name {
            m.name = v;
        }
        if let Some(v) = patch.brand {
            m.brand = v;
        }
        if let Some(v) = patch.category {
            m.category = v;
        }
        if let Some(v) = patch.description {
            m.description = v;
        }
        if let Some(v) = patch.price {
            m.price = v;
        }
        if let Some(v) = alternatives {
            m.alternative_medicine_ids = v;
        }
        Ok(Some(m.clone()))
    }

    async fn delete_medicine(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.write();
        if t.medicines.rows.remove(&id).is_none() {
            return Ok(false);
        }
        t.inventory.rows.retain(|_, r| r.medicine_id != id);
        for m in t.medicines.rows.values_mut() {
            m.alternative_medicine_ids.retain(|a| *a != id);
        }
        Ok(true)
    }

    async fn inventory(&self, id: i64) -> Result<Option<Inventory>, AppError> {
        Ok(self.read().inventory.get(id))
    }

    async fn list_inventory(&self, filter: InventoryFilter, page: Page) -> Result<Vec<Inventory>, AppError> {
        Ok(self.read().inventory.page(page, |r| {
            filter.pharmacy_id.map_or(true, |id| r.pharmacy_id == id)
                && filter.medicine_id.map_or(true, |id| r.medicine_id == id)
        }))
    }

    async fn upsert_inventory(&self, pharmacy_id: i64, medicine_id: i64, quantity: i32) -> Result<Inventory, AppError> {
        let mut t = self.write();
        if !t.pharmacies.rows.contains_key(&pharmacy_id) {
            return Err(AppError::NotFound(format!("pharmacy {}", pharmacy_id)));
        }
        if !t.medicines.rows.contains_key(&medicine_id) {
            return Err(AppError::NotFound(format!("medicine {}", medicine_id)));
        }
        let now = Utc::now();
        if let Some(row) = t
            .inventory
            .rows
            .values_mut()
            .find(|r| r.pharmacy_id == pharmacy_id && r.medicine_id == medicine_id)
        {
            row.quantity = quantity;
            row.last_updated = now;
            return Ok(row.clone());
        }
        Ok(t.inventory.insert_with(|id| Inventory {
            id,
            pharmacy_id,
            medicine_id,
            quantity,
            last_updated: now,
        }))
    }

    async fn update_inventory(&self, id: i64, quantity: i32) -> Result<Option<Inventory>, AppError> {
        let mut t = self.write();
        Ok(t.inventory.rows.get_mut(&id).map(|row| {
            row.quantity = quantity;
            row.last_updated = Utc::now();
            row.clone()
        }))
    }

    async fn delete_inventory(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.write().inventory.rows.remove(&id).is_some())
    }

    async fn create_search_log(&self, log: NewSearchLog) -> Result<SearchLog, AppError> {
        Ok(self.write().search_logs.insert_with(|id| SearchLog {
            id,
            account_id: log.account_id,
            medicine_name: log.medicine_name,
            timestamp: Utc::now(),
            result_found: log.result_found,
        }))
    }

    async fn search_log(&self, id: i64) -> Result<Option<SearchLog>, AppError> {
        Ok(self.read().search_logs.get(id))
    }

    async fn list_search_logs(&self, filter: SearchLogFilter, page: Page) -> Result<Vec<SearchLog>, AppError> {
        Ok(self
            .read()
            .search_logs
            .page(page, |l| filter.result_found.map_or(true, |f| l.result_found == f)))
    }

    async fn create_sms_request(&self, request: NewSmsRequest) -> Result<SmsRequest, AppError> {
        Ok(self.write().sms_requests.insert_with(|id| SmsRequest {
            id,
            phone_number: request.phone_number,
            medicine_name: request.medicine_name,
            location: request.location,
            response_sent: false,
            timestamp: Utc::now(),
        }))
    }

    async fn sms_request(&self, id: i64) -> Result<Option<SmsRequest>, AppError> {
        Ok(self.read().sms_requests.get(id))
    }

    async fn list_sms_requests(&self, filter: SmsRequestFilter, page: Page) -> Result<Vec<SmsRequest>, AppError> {
        Ok(self
            .read()
            .sms_requests
            .page(page, |r| filter.response_sent.map_or(true, |f| r.response_sent == f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn account(username: &str, is_pharmacy: bool) -> NewAccount {
        NewAccount {
            username: username.into(),
            name: username.into(),
            phone_number: String::new(),
            address: String::new(),
            location: String::new(),
            is_pharmacy,
            is_smartphone_user: true,
            password_hash: "x".into(),
        }
    }

    fn pharmacy(store_name: &str) -> NewPharmacy {
        NewPharmacy {
            store_name: store_name.into(),
            license_number: "L-1".into(),
            address: String::new(),
            location: String::new(),
            contact_number: String::new(),
        }
    }

    fn medicine(name: &str) -> NewMedicine {
        NewMedicine {
            name: name.into(),
            brand: "Acme".into(),
            category: String::new(),
            description: String::new(),
            price: Some(Decimal::new(250, 2)),
            alternative_medicine_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn pharmacy_gets_zero_rows_for_existing_medicines_only() {
        let store = MemoryStore::new();
        let a = store.create_medicine(medicine("Aspirin")).await.unwrap();
        let b = store.create_medicine(medicine("Ibuprofen")).await.unwrap();
        let (_, p) = store.create_account(account("a", true), Some(pharmacy("A"))).await.unwrap();
        let p = p.unwrap();

        let rows = store
            .list_inventory(InventoryFilter { pharmacy_id: Some(p.id), medicine_id: None }, Page::default())
            .await
            .unwrap();
        let mut ids: Vec<i64> = rows.iter().map(|r| r.medicine_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![a.id, b.id]);
        assert!(rows.iter().all(|r| r.quantity == 0));

        store.create_medicine(medicine("Late")).await.unwrap();
        let rows = store
            .list_inventory(InventoryFilter { pharmacy_id: Some(p.id), medicine_id: None }, Page::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn upsert_never_duplicates_a_pair() {
        let store = MemoryStore::new();
        let m = store.create_medicine(medicine("Aspirin")).await.unwrap();
        let (_, p) = store.create_account(account("a", true), Some(pharmacy("A"))).await.unwrap();
        let p = p.unwrap();

        let first = store.upsert_inventory(p.id, m.id, 5).await.unwrap();
        let second = store.upsert_inventory(p.id, m.id, 7).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 7);
        let rows = store
            .list_inventory(InventoryFilter { pharmacy_id: Some(p.id), medicine_id: Some(m.id) }, Page::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = MemoryStore::new();
        for name in ["Paracetamol", "PARAcodin", "Aspirin"] {
            store.create_medicine(medicine(name)).await.unwrap();
        }
        let names: Vec<String> = store
            .search_medicines("pArA")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Paracetamol", "PARAcodin"]);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.create_account(account("dup", false), None).await.unwrap();
        let err = store.create_account(account("dup", false), None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_medicine_drops_inventory_and_alternative_links() {
        let store = MemoryStore::new();
        let a = store.create_medicine(medicine("A")).await.unwrap();
        let mut with_alt = medicine("B");
        with_alt.alternative_medicine_ids = vec![a.id];
        let b = store.create_medicine(with_alt).await.unwrap();
        assert_eq!(b.alternative_medicine_ids, vec![a.id]);
        store.create_account(account("p", true), Some(pharmacy("P"))).await.unwrap();

        assert!(store.delete_medicine(a.id).await.unwrap());
        let b = store.medicine(b.id).await.unwrap().unwrap();
        assert!(b.alternative_medicine_ids.is_empty());
        let rows = store
            .list_inventory(InventoryFilter { pharmacy_id: None, medicine_id: Some(a.id) }, Page::default())
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn unknown_alternative_is_rejected() {
        let store = MemoryStore::new();
        let mut m = medicine("A");
        m.alternative_medicine_ids = vec![42];
        let err = store.create_medicine(m).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn expired_sessions_do_not_authenticate() {
        let store = MemoryStore::new();
        let (a, _) = store.create_account(account("s", false), None).await.unwrap();
        let now = Utc::now();
        store
            .create_session(Session {
                token: "t".into(),
                account_id: a.id,
                created_at: now,
                expires_at: now + chrono::Duration::hours(1),
            })
            .await
            .unwrap();
        assert!(store.session_account("t", now).await.unwrap().is_some());
        assert!(store
            .session_account("t", now + chrono::Duration::hours(2))
            .await
            .unwrap()
            .is_none());
    }
}

//! Pharmacy-owner authorization and add-to-inventory.

use super::validation::Validate;
use crate::error::AppError;
use crate::model::{Account, AddMedicineRequest, Inventory, Pharmacy};
use crate::store::Store;

pub struct InventoryService;

impl InventoryService {
    /// The pharmacy owned by `account`. Consumer accounts and owners without a pharmacy get 403.
    pub async fn owned_pharmacy(store: &dyn Store, account: &Account) -> Result<Pharmacy, AppError> {
        if !account.is_pharmacy {
            return Err(AppError::Forbidden("pharmacy accounts only".into()));
        }
        store
            .pharmacy_by_account(account.id)
            .await?
            .ok_or_else(|| AppError::Forbidden("account has no pharmacy".into()))
    }

    /// Load a row and make sure it belongs to `pharmacy`.
    pub async fn owned_row(store: &dyn Store, pharmacy: &Pharmacy, id: i64) -> Result<Inventory, AppError> {
        let row = store
            .inventory(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("inventory {}", id)))?;
        if row.pharmacy_id != pharmacy.id {
            return Err(AppError::Forbidden("inventory row belongs to another pharmacy".into()));
        }
        Ok(row)
    }

    /// Get-or-create the caller's row for the medicine and set its quantity to the requested value.
    pub async fn add_medicine(
        store: &dyn Store,
        pharmacy: &Pharmacy,
        req: AddMedicineRequest,
    ) -> Result<Inventory, AppError> {
        req.validate()?;
        if let Some(id) = req.pharmacy_id {
            if id != pharmacy.id {
                return Err(AppError::Forbidden("cannot stock another pharmacy".into()));
            }
        }
        if store.medicine(req.medicine_id).await?.is_none() {
            return Err(AppError::NotFound(format!("medicine {}", req.medicine_id)));
        }
        let row = store
            .upsert_inventory(pharmacy.id, req.medicine_id, req.quantity)
            .await?;
        tracing::info!(
            pharmacy_id = pharmacy.id,
            medicine_id = req.medicine_id,
            quantity = row.quantity,
            "inventory updated"
        );
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewAccount, NewMedicine, NewPharmacy};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;

    fn account(username: &str, is_pharmacy: bool) -> NewAccount {
        NewAccount {
            username: username.into(),
            name: String::new(),
            phone_number: String::new(),
            address: String::new(),
            location: String::new(),
            is_pharmacy,
            is_smartphone_user: true,
            password_hash: "x".into(),
        }
    }

    fn store_details() -> NewPharmacy {
        NewPharmacy {
            store_name: "A".into(),
            license_number: "L".into(),
            address: String::new(),
            location: String::new(),
            contact_number: String::new(),
        }
    }

    #[tokio::test]
    async fn consumers_are_forbidden() {
        let store = MemoryStore::new();
        let (consumer, _) = store.create_account(account("c", false), None).await.unwrap();
        let err = InventoryService::owned_pharmacy(&store, &consumer).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn add_medicine_overwrites_quantity() {
        let store = MemoryStore::new();
        let m = store
            .create_medicine(NewMedicine {
                name: "Aspirin".into(),
                brand: String::new(),
                category: String::new(),
                description: String::new(),
                price: Some(Decimal::ONE),
                alternative_medicine_ids: Vec::new(),
            })
            .await
            .unwrap();
        let (owner, _) = store.create_account(account("p", true), Some(store_details())).await.unwrap();
        let pharmacy = InventoryService::owned_pharmacy(&store, &owner).await.unwrap();

        let req = AddMedicineRequest { medicine_id: m.id, quantity: 5, pharmacy_id: None };
        assert_eq!(InventoryService::add_medicine(&store, &pharmacy, req).await.unwrap().quantity, 5);
        let req = AddMedicineRequest { medicine_id: m.id, quantity: 3, pharmacy_id: None };
        assert_eq!(InventoryService::add_medicine(&store, &pharmacy, req).await.unwrap().quantity, 3);

        let missing = AddMedicineRequest { medicine_id: 999, quantity: 1, pharmacy_id: None };
        assert!(matches!(
            InventoryService::add_medicine(&store, &pharmacy, missing).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}

//! Inventory rows. Reads are open; every write is scoped to the caller's own pharmacy.

use crate::error::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery, CurrentAccount};
use crate::model::{AddMedicineRequest, InventoryFilter, InventoryPatch, Page};
use crate::response;
use crate::service::{InventoryService, Validate};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<InventoryFilter>,
    AppQuery(page): AppQuery<Page>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::many(state.store.list_inventory(filter, page).await?))
}

pub async fn read(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> Result<impl IntoResponse, AppError> {
    let row = state
        .store
        .inventory(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("inventory {}", id)))?;
    Ok(response::ok(row))
}

/// POST /api/inventory/: a create for an existing (pharmacy, medicine) pair updates that row.
pub async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<AddMedicineRequest>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.as_ref();
    let pharmacy = InventoryService::owned_pharmacy(store, &current.account).await?;
    let row = InventoryService::add_medicine(store, &pharmacy, body).await?;
    Ok(response::created(row))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(id): AppPath<i64>,
    AppJson(patch): AppJson<InventoryPatch>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.as_ref();
    let pharmacy = InventoryService::owned_pharmacy(store, &current.account).await?;
    InventoryService::owned_row(store, &pharmacy, id).await?;
    patch.validate()?;
    let row = store
        .update_inventory(id, patch.quantity)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("inventory {}", id)))?;
    Ok(response::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    let store = state.store.as_ref();
    let pharmacy = InventoryService::owned_pharmacy(store, &current.account).await?;
    InventoryService::owned_row(store, &pharmacy, id).await?;
    store.delete_inventory(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /pharmacy/inventory/
pub async fn own_inventory(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppQuery(page): AppQuery<Page>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.as_ref();
    let pharmacy = InventoryService::owned_pharmacy(store, &current.account).await?;
    let filter = InventoryFilter {
        pharmacy_id: Some(pharmacy.id),
        medicine_id: None,
    };
    Ok(response::many(store.list_inventory(filter, page).await?))
}

/// POST /pharmacy/inventory/: add_medicine.
pub async fn add_medicine(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<AddMedicineRequest>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.as_ref();
    let pharmacy = InventoryService::owned_pharmacy(store, &current.account).await?;
    let row = InventoryService::add_medicine(store, &pharmacy, body).await?;
    Ok(response::ok(row))
}

//! Pharmacies and their pharmacist staff links.

use crate::error::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery, CurrentAccount};
use crate::model::{NewPharmacist, NewPharmacy, Page, Pharmacy, PharmacistFilter, PharmacyPatch};
use crate::response;
use crate::service::Validate;
use crate::state::AppState;
use crate::store::Store;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

/// The pharmacy, provided `current` owns it.
async fn owned(store: &dyn Store, current: &CurrentAccount, id: i64) -> Result<Pharmacy, AppError> {
    let pharmacy = store
        .pharmacy(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pharmacy {}", id)))?;
    if pharmacy.account_id != current.account.id {
        return Err(AppError::Forbidden("not the owner of this pharmacy".into()));
    }
    Ok(pharmacy)
}

pub async fn list(State(state): State<AppState>, AppQuery(page): AppQuery<Page>) -> Result<impl IntoResponse, AppError> {
    Ok(response::many(state.store.list_pharmacies(page).await?))
}

pub async fn read(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> Result<impl IntoResponse, AppError> {
    let pharmacy = state
        .store
        .pharmacy(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pharmacy {}", id)))?;
    Ok(response::ok(pharmacy))
}

pub async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<NewPharmacy>,
) -> Result<impl IntoResponse, AppError> {
    if !current.account.is_pharmacy {
        return Err(AppError::Forbidden("pharmacy accounts only".into()));
    }
    body.validate()?;
    let pharmacy = state.store.create_pharmacy(current.account.id, body).await?;
    tracing::info!(pharmacy_id = pharmacy.id, account_id = current.account.id, "created pharmacy");
    Ok(response::created(pharmacy))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(id): AppPath<i64>,
    AppJson(patch): AppJson<PharmacyPatch>,
) -> Result<impl IntoResponse, AppError> {
    owned(state.store.as_ref(), &current, id).await?;
    patch.validate()?;
    let pharmacy = state
        .store
        .update_pharmacy(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pharmacy {}", id)))?;
    Ok(response::ok(pharmacy))
}

pub async fn delete(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    owned(state.store.as_ref(), &current, id).await?;
    state.store.delete_pharmacy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_pharmacists(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<PharmacistFilter>,
    AppQuery(page): AppQuery<Page>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::many(state.store.list_pharmacists(filter, page).await?))
}

pub async fn read_pharmacist(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let link = state
        .store
        .pharmacist(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pharmacist {}", id)))?;
    Ok(response::ok(link))
}

pub async fn create_pharmacist(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<NewPharmacist>,
) -> Result<impl IntoResponse, AppError> {
    owned(state.store.as_ref(), &current, body.pharmacy_id).await?;
    if state.store.account(body.account_id).await?.is_none() {
        return Err(AppError::NotFound(format!("user {}", body.account_id)));
    }
    Ok(response::created(state.store.create_pharmacist(body).await?))
}

pub async fn delete_pharmacist(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    let link = state
        .store
        .pharmacist(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pharmacist {}", id)))?;
    owned(state.store.as_ref(), &current, link.pharmacy_id).await?;
    state.store.delete_pharmacist(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

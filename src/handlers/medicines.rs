//! Medicine catalog and the logged name search.

use crate::error::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery, CurrentAccount, MaybeAccount};
use crate::model::{MedicineFilter, MedicinePatch, MedicineSearchQuery, NewMedicine, NewSearchLog, Page};
use crate::response;
use crate::service::Validate;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<MedicineFilter>,
    AppQuery(page): AppQuery<Page>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::many(state.store.list_medicines(filter, page).await?))
}

pub async fn read(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> Result<impl IntoResponse, AppError> {
    let medicine = state
        .store
        .medicine(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("medicine {}", id)))?;
    Ok(response::ok(medicine))
}

pub async fn create(
    State(state): State<AppState>,
    _current: CurrentAccount,
    AppJson(body): AppJson<NewMedicine>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()?;
    Ok(response::created(state.store.create_medicine(body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    _current: CurrentAccount,
    AppPath(id): AppPath<i64>,
    AppJson(patch): AppJson<MedicinePatch>,
) -> Result<impl IntoResponse, AppError> {
    patch.validate()?;
    let medicine = state
        .store
        .update_medicine(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("medicine {}", id)))?;
    Ok(response::ok(medicine))
}

pub async fn delete(
    State(state): State<AppState>,
    _current: CurrentAccount,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_medicine(id).await? {
        return Err(AppError::NotFound(format!("medicine {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /medicine/search/?name= : every medicine whose name contains the query, case-insensitively.
/// Each call appends a search log entry.
pub async fn search(
    State(state): State<AppState>,
    MaybeAccount(account): MaybeAccount,
    AppQuery(query): AppQuery<MedicineSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Matched as given; only a blank query counts as missing.
    let needle = query
        .name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::field("name", "this field is required"))?;
    let found = state.store.search_medicines(needle).await?;
    state
        .store
        .create_search_log(NewSearchLog {
            account_id: account.map(|a| a.id),
            medicine_name: needle.chars().take(100).collect(),
            result_found: !found.is_empty(),
        })
        .await?;
    tracing::debug!(query = %needle, matches = found.len(), "medicine search");
    Ok(response::many(found))
}

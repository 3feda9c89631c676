//! Register, login, logout and the user endpoints.

use crate::error::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery, CurrentAccount};
use crate::model::{AccountPatch, LoginRequest, Page, RegisterRequest};
use crate::response;
use crate::service::{AccountService, Validate};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let out = AccountService::register(state.store.as_ref(), state.settings.session_ttl, body).await?;
    Ok(response::created(out))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let out = AccountService::login(state.store.as_ref(), state.settings.session_ttl, body).await?;
    Ok(response::ok(out))
}

pub async fn logout(State(state): State<AppState>, current: CurrentAccount) -> Result<StatusCode, AppError> {
    AccountService::logout(state.store.as_ref(), &current.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(current: CurrentAccount) -> impl IntoResponse {
    response::ok(current.account)
}

pub async fn list(
    State(state): State<AppState>,
    _current: CurrentAccount,
    AppQuery(page): AppQuery<Page>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::many(state.store.list_accounts(page).await?))
}

pub async fn read(
    State(state): State<AppState>,
    _current: CurrentAccount,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .store
        .account(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;
    Ok(response::ok(account))
}

fn ensure_self(current: &CurrentAccount, id: i64) -> Result<(), AppError> {
    if current.account.id == id {
        Ok(())
    } else {
        Err(AppError::Forbidden("accounts can only change themselves".into()))
    }
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(id): AppPath<i64>,
    AppJson(patch): AppJson<AccountPatch>,
) -> Result<impl IntoResponse, AppError> {
    ensure_self(&current, id)?;
    patch.validate()?;
    let account = state
        .store
        .update_account(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;
    Ok(response::ok(account))
}

pub async fn delete(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    ensure_self(&current, id)?;
    if !state.store.delete_account(id).await? {
        return Err(AppError::NotFound(format!("user {}", id)));
    }
    tracing::info!(account_id = id, "deleted account");
    Ok(StatusCode::NO_CONTENT)
}

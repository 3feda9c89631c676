//! Search logs and SMS requests: append and read only.

use crate::error::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery, MaybeAccount};
use crate::model::{NewSearchLog, NewSmsRequest, Page, SearchLogFilter, SmsRequestFilter};
use crate::response;
use crate::service::Validate;
use crate::state::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
};

pub async fn list_search_logs(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<SearchLogFilter>,
    AppQuery(page): AppQuery<Page>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::many(state.store.list_search_logs(filter, page).await?))
}

pub async fn read_search_log(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let log = state
        .store
        .search_log(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("search log {}", id)))?;
    Ok(response::ok(log))
}

pub async fn create_search_log(
    State(state): State<AppState>,
    MaybeAccount(account): MaybeAccount,
    AppJson(mut body): AppJson<NewSearchLog>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()?;
    body.account_id = account.map(|a| a.id);
    Ok(response::created(state.store.create_search_log(body).await?))
}

pub async fn list_sms_requests(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<SmsRequestFilter>,
    AppQuery(page): AppQuery<Page>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::many(state.store.list_sms_requests(filter, page).await?))
}

pub async fn read_sms_request(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let request = state
        .store
        .sms_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sms request {}", id)))?;
    Ok(response::ok(request))
}

/// Stores the request. No SMS reply is sent; `response_sent` stays false.
pub async fn create_sms_request(
    State(state): State<AppState>,
    AppJson(body): AppJson<NewSmsRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()?;
    let request = state.store.create_sms_request(body).await?;
    tracing::info!(
        sms_request_id = request.id,
        medicine = %request.medicine_name,
        "sms request stored; reply delivery is not implemented"
    );
    Ok(response::created(request))
}

//! Resolve the calling account from an `Authorization: Bearer <token>` header.

use crate::error::AppError;
use crate::model::Account;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;

/// Session token from the `Authorization` header, if any.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// The authenticated account. Rejects with 401 when the token is missing, unknown or expired.
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub account: Account,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?.to_string();
        let account = state
            .store
            .session_account(&token, Utc::now())
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentAccount { account, token })
    }
}

/// Like [`CurrentAccount`] but anonymous requests pass through as `None`.
/// A token that is present but invalid is still rejected.
#[derive(Clone, Debug)]
pub struct MaybeAccount(pub Option<Account>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAccount {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if bearer_token(parts).is_none() {
            return Ok(MaybeAccount(None));
        }
        let current = CurrentAccount::from_request_parts(parts, state).await?;
        Ok(MaybeAccount(Some(current.account)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(h) = header {
            builder = builder.header(AUTHORIZATION, h);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn reads_bearer_tokens_only() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc123"))), Some("abc123"));
        assert_eq!(bearer_token(&parts(Some("Basic abc123"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer   "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }
}

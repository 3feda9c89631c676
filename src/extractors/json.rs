//! JSON body extractor whose rejections use the service's error envelope.

use crate::error::AppError;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

/// `axum::Json`, but malformed or mistyped bodies come back as 400 `bad_request`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

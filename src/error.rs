use actix_web::{http::StatusCode, ResponseError};
use log::error;
use thiserror::Error;

use crate::response::response_from_error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn param_error(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn need_login() -> Self {
        Self::Unauthorized("access token required".to_string())
    }

    pub fn bad_credentials() -> Self {
        Self::Unauthorized("invalid username or password".to_string())
    }

    pub fn invalid_token() -> Self {
        Self::Forbidden("invalid token".to_string())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn system_exception() -> Self {
        Self::Internal("internal server error".to_string())
    }

    pub fn msg(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// Logs a database failure under `context` and hides it behind a 500.
pub fn db_error(context: &'static str) -> impl FnOnce(sea_orm::DbErr) -> AppError {
    move |err| {
        error!("{}: {}", context, err);
        AppError::system_exception()
    }
}

/// True when the failure came from a UNIQUE / primary key constraint.
pub fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("UNIQUE") || msg.contains("Duplicate")
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        response_from_error(self)
    }
}

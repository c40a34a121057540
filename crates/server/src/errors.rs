use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ApiResponse;
use service::auth::errors::AuthError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by the register/login handlers, rendered as `{success:false, message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("bad request body: {0}")]
    BadBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(e) => match e {
                AuthError::Validation(_) | AuthError::DuplicateIdentity => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::StoreRead(_) | AuthError::StoreWrite(_) | AuthError::Hashing(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ApiError::BadBody(_) => "Invalid request body.",
            ApiError::Auth(e) => e.public_message(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Auth(e) if e.is_internal() => error!(code = e.code(), error = %e, "request failed"),
            ApiError::Auth(e) => warn!(code = e.code(), error = %e, "request rejected"),
            ApiError::BadBody(detail) => warn!(%detail, "malformed request body"),
        }
        (status, Json(ApiResponse::failure(self.public_message()))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

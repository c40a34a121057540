use std::sync::Arc;

use axum::{extract::{rejection::JsonRejection, State}, Json};
use common::types::ApiResponse;
use service::auth::{
    domain::{LoginInput, RegisterInput},
    CredentialStore,
};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn CredentialStore>,
}

/// `POST /register` with `{name, email, password}`.
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(input) = payload?;
    let done = state.store.register(input).await?;
    Ok(Json(ApiResponse::ok(done.message())))
}

/// `POST /login` with `{email, password}`.
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(input) = payload?;
    let done = state.store.authenticate(input).await?;
    Ok(Json(ApiResponse::ok(done.message())))
}

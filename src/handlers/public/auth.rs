// handlers/public/auth.rs - account creation and token acquisition

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;

use crate::api::requests::{LoginRequest, RegisterRequest};
use crate::error::ApiResult;
use crate::handlers::json_body;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /user/general - register a new account and log it in
///
/// Body: `{ "name", "email", "password", "avatar"? }`.
/// Returns `{ "token": "..." }`.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let registration = json_body(payload)?.validate()?;
    let token = state.users.register(registration).await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /auth - exchange email and password for a token
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let credentials = json_body(payload)?.validate()?;
    let token = state.users.login(credentials).await?;
    Ok(Json(TokenResponse { token }))
}

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::auth::{validate_jwt, AuthError, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the access token
pub const TOKEN_HEADER: &str = "x-access-token";

/// Authenticated caller resolved from the access token.
///
/// Taking this as a handler argument makes the route private: requests
/// without a valid token are rejected with 401 before the handler runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user.id,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        let claims = validate_jwt(token, &state.config.security)?;
        Ok(AuthUser::from(claims))
    }
}

/// Token from `x-access-token`, falling back to `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let direct = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if direct.is_some() {
        return direct;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

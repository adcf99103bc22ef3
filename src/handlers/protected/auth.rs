use axum::{extract::State, Json};

use crate::database::models::User;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /auth - the account behind the token, password excluded
pub async fn whoami_get(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<User>> {
    Ok(Json(state.users.current_user(auth.user_id).await?))
}

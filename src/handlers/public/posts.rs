use axum::{
    extract::{Path, State},
    Json,
};

use crate::database::models::Post;
use crate::error::ApiResult;
use crate::handlers::parse_post_id;
use crate::state::AppState;

/// GET /posts - every post, newest first
pub async fn posts_get(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(state.posts.list_posts().await?))
}

/// GET /posts/:id
pub async fn post_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Post>> {
    let post_id = parse_post_id(&id)?;
    Ok(Json(state.posts.get_post(post_id).await?))
}

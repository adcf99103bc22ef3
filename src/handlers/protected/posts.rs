// handlers/protected/posts.rs - post creation, deletion and likes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::requests::CreatePostRequest;
use crate::database::models::{Like, Post};
use crate::error::ApiResult;
use crate::handlers::{json_body, parse_post_id};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// POST /posts - create a post owned by the caller
///
/// Body: `{ "category"?, "title", "description", "preferredLocation", "photo"? }`.
/// The owner's name and avatar are snapshotted onto the post.
pub async fn post_create(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<Json<Post>> {
    let input = json_body(payload)?.validate()?;
    let post = state.posts.create_post(auth.user_id, input).await?;
    Ok(Json(post))
}

/// DELETE /posts/:id - owner only
pub async fn post_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let post_id = parse_post_id(&id)?;
    state.posts.delete_post(post_id, auth.user_id).await?;
    Ok(Json(json!({ "msg": "Post deleted" })))
}

/// PUT /posts/like/:id - returns the updated likes, newest first
pub async fn post_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Like>>> {
    let post_id = parse_post_id(&id)?;
    Ok(Json(state.posts.like_post(post_id, auth.user_id).await?))
}

/// PUT /posts/unlike/:id
pub async fn post_unlike(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Like>>> {
    let post_id = parse_post_id(&id)?;
    Ok(Json(state.posts.unlike_post(post_id, auth.user_id).await?))
}

// handlers/protected/comments.rs - comments and the offer workflow
//
// Accept is reserved for the post owner, complete for the selected
// commenter. Both return the full post so clients can refresh its status.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::requests::AddCommentRequest;
use crate::database::models::{Comment, Post};
use crate::error::ApiResult;
use crate::handlers::{json_body, parse_comment_id, parse_post_id};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// POST /posts/comment/:id - body `{ "text" }`, returns all comments
pub async fn comment_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Comment>>> {
    let post_id = parse_post_id(&id)?;
    let text = json_body(payload)?.validate()?;
    Ok(Json(state.posts.add_comment(post_id, auth.user_id, text).await?))
}

/// DELETE /posts/comment/:id/:comment_id - comment author only
pub async fn comment_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Comment>>> {
    let post_id = parse_post_id(&id)?;
    let comment_id = parse_comment_id(&comment_id)?;
    Ok(Json(
        state.posts.delete_comment(post_id, comment_id, auth.user_id).await?,
    ))
}

/// PUT /posts/comment/:id/:comment_id/accept
pub async fn comment_accept(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<Post>> {
    let post_id = parse_post_id(&id)?;
    let comment_id = parse_comment_id(&comment_id)?;
    Ok(Json(
        state.posts.accept_comment(post_id, comment_id, auth.user_id).await?,
    ))
}

/// PUT /posts/comment/:id/:comment_id/complete
pub async fn comment_complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<Post>> {
    let post_id = parse_post_id(&id)?;
    let comment_id = parse_comment_id(&comment_id)?;
    Ok(Json(
        state.posts.complete_comment(post_id, comment_id, auth.user_id).await?,
    ))
}

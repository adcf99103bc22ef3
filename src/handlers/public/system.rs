use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Xchange API",
        "version": version,
        "description": "Peer-to-peer exchange marketplace backend",
        "endpoints": {
            "register": "POST /user/general (public)",
            "login": "POST /auth (public)",
            "whoami": "GET /auth (private)",
            "posts": "GET /posts, GET /posts/:id (public); POST /posts, DELETE /posts/:id (private)",
            "likes": "PUT /posts/like/:id, PUT /posts/unlike/:id (private)",
            "comments": "POST /posts/comment/:id, DELETE /posts/comment/:id/:comment_id (private)",
            "workflow": "PUT /posts/comment/:id/:comment_id/accept|complete (private)",
            "health": "GET /health (public)",
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.posts.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

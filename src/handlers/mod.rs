// handlers/mod.rs - Two-tier handler layout
//
// Public (no token) and Protected (token required). A handler is protected
// when it takes an `AuthUser` argument; the extractor rejects the request
// with 401 before the handler body runs.
pub mod protected;
pub mod public;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Malformed post ids are indistinguishable from unknown ones
pub(crate) fn parse_post_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::post_not_found())
}

pub(crate) fn parse_comment_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Comment does not exist"))
}

/// Unwrap a JSON body, turning axum's rejection into our 400 shape
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            Err(ApiError::invalid_json(rejection.body_text()))
        }
    }
}

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::middleware::auth::TOKEN_HEADER;
use crate::state::AppState;

/// Build the full application router over the given state
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(auth_routes())
        .merge(post_routes())
        .merge(comment_routes())
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route("/user/general", post(public::register_post))
        .route("/auth", get(protected::whoami_get).post(public::login_post))
}

fn post_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route("/posts", get(public::posts_get).post(protected::post_create))
        .route("/posts/:id", get(public::post_get).delete(protected::post_delete))
        .route("/posts/like/:id", put(protected::post_like))
        .route("/posts/unlike/:id", put(protected::post_unlike))
}

fn comment_routes() -> Router<AppState> {
    use axum::routing::delete;
    use handlers::protected;

    Router::new()
        .route("/posts/comment/:id", post(protected::comment_post))
        .route("/posts/comment/:id/:comment_id", delete(protected::comment_delete))
        .route("/posts/comment/:id/:comment_id/accept", put(protected::comment_accept))
        .route("/posts/comment/:id/:comment_id/complete", put(protected::comment_complete))
}

/// Permissive in development, otherwise limited to the configured origins
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(TOKEN_HEADER),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}

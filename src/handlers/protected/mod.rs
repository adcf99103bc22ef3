// handlers/protected/mod.rs - Protected handlers (token required)
//
// Every handler here takes `AuthUser`, resolved from the access token.

pub mod auth;
pub mod comments;
pub mod posts;

pub use auth::whoami_get;
pub use comments::{comment_accept, comment_complete, comment_delete, comment_post};
pub use posts::{post_create, post_delete, post_like, post_unlike};

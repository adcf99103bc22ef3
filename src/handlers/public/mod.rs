// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, read-only post access and service status.

pub mod auth;
pub mod posts;
pub mod system;

pub use auth::{login_post, register_post};
pub use posts::{post_get, posts_get};
pub use system::{health, root};

pub mod auth;

pub use auth::{extract_token, AuthUser};

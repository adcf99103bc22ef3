pub mod post;
pub mod user;

pub use post::{Comment, Like, NewPost, Post, PostError, PostStatus};
pub use user::User;

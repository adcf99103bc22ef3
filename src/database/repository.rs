use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Post, User};

/// Persistence for user identities
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::Duplicate` when the email is taken
    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
}

/// Persistence for posts, including their embedded likes and comments.
///
/// Posts are read and written as whole documents. Concurrent
/// read-modify-write sequences on the same post are not coordinated; the
/// last `save_post` wins.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, post: &Post) -> Result<(), DatabaseError>;

    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>, DatabaseError>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError>;

    /// Overwrite the stored document with `post`. Fails with
    /// `DatabaseError::RecordNotFound` when the post is gone.
    async fn save_post(&self, post: &Post) -> Result<(), DatabaseError>;

    /// Returns `false` when no post had that id
    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// Cheap connectivity check for the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;
}

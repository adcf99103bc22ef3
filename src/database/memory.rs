use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Post, User};
use crate::database::repository::{PostStore, UserStore};

/// Process-local store for development and tests
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Duplicate(format!("email {}", user.email)));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, post: &Post) -> Result<(), DatabaseError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DatabaseError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn save_post(&self, post: &Post) -> Result<(), DatabaseError> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(())
            }
            None => Err(DatabaseError::RecordNotFound(format!("post {}", post.id))),
        }
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

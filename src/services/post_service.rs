use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::models::{Comment, Like, NewPost, Post, PostError, User};
use crate::database::{DatabaseError, PostStore, UserStore};
use crate::error::{ApiError, ApiResult};

/// Operations over posts and their embedded likes and comments.
///
/// Every mutating operation is a single read-modify-write of one post
/// document. Identity checks always compare the caller against the stored
/// reference and refuse with 401 on mismatch, leaving the post untouched.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>) -> Self {
        Self { posts, users }
    }

    async fn load(&self, post_id: Uuid) -> ApiResult<Post> {
        self.posts
            .find_post(post_id)
            .await?
            .ok_or_else(ApiError::post_not_found)
    }

    /// Write back a loaded post. A post deleted since `load` is a 404, as in
    /// `delete_post`.
    async fn save(&self, post: &Post) -> ApiResult<()> {
        match self.posts.save_post(post).await {
            Ok(()) => Ok(()),
            Err(DatabaseError::RecordNotFound(_)) => Err(ApiError::post_not_found()),
            Err(e) => Err(e.into()),
        }
    }

    /// The caller's record, needed for the name/avatar snapshot
    async fn caller(&self, user_id: Uuid) -> ApiResult<User> {
        self.users.find_user_by_id(user_id).await?.ok_or_else(|| {
            warn!("Token refers to unknown user {}", user_id);
            ApiError::unauthorized("User not found")
        })
    }

    pub async fn create_post(&self, caller: Uuid, input: NewPost) -> ApiResult<Post> {
        let owner = self.caller(caller).await?;
        let post = Post::new(&owner, input);
        self.posts.insert_post(&post).await?;

        info!("Post {} created by {}", post.id, caller);
        Ok(post)
    }

    /// Store connectivity for the health endpoint
    pub async fn ping(&self) -> ApiResult<()> {
        Ok(self.posts.ping().await?)
    }

    pub async fn list_posts(&self) -> ApiResult<Vec<Post>> {
        Ok(self.posts.list_posts().await?)
    }

    pub async fn get_post(&self, post_id: Uuid) -> ApiResult<Post> {
        self.load(post_id).await
    }

    pub async fn delete_post(&self, post_id: Uuid, caller: Uuid) -> ApiResult<()> {
        let post = self.load(post_id).await?;
        if !post.is_owned_by(caller) {
            warn!("User {} tried to delete post {} owned by {}", caller, post_id, post.user);
            return Err(PostError::NotAuthorized.into());
        }

        if !self.posts.delete_post(post_id).await? {
            // Removed concurrently between the read and the delete
            return Err(ApiError::post_not_found());
        }

        info!("Post {} deleted by {}", post_id, caller);
        Ok(())
    }

    pub async fn like_post(&self, post_id: Uuid, caller: Uuid) -> ApiResult<Vec<Like>> {
        let mut post = self.load(post_id).await?;
        post.like(caller)?;
        self.save(&post).await?;

        debug!("Post {} liked by {}", post_id, caller);
        Ok(post.likes)
    }

    pub async fn unlike_post(&self, post_id: Uuid, caller: Uuid) -> ApiResult<Vec<Like>> {
        let mut post = self.load(post_id).await?;
        post.unlike(caller)?;
        self.save(&post).await?;

        debug!("Post {} unliked by {}", post_id, caller);
        Ok(post.likes)
    }

    pub async fn add_comment(&self, post_id: Uuid, caller: Uuid, text: String) -> ApiResult<Vec<Comment>> {
        let author = self.caller(caller).await?;
        let mut post = self.load(post_id).await?;
        let comment_id = post.add_comment(&author, text).id;
        self.save(&post).await?;

        debug!("Comment {} added to post {} by {}", comment_id, post_id, caller);
        Ok(post.comments)
    }

    pub async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid, caller: Uuid) -> ApiResult<Vec<Comment>> {
        let mut post = self.load(post_id).await?;
        post.remove_comment(comment_id, caller).map_err(|e| {
            if e == PostError::NotAuthorized {
                warn!("User {} tried to delete comment {} on post {}", caller, comment_id, post_id);
            }
            e
        })?;
        self.save(&post).await?;

        debug!("Comment {} removed from post {}", comment_id, post_id);
        Ok(post.comments)
    }

    /// Owner selects a comment's offer: Open -> Accepted
    pub async fn accept_comment(&self, post_id: Uuid, comment_id: Uuid, caller: Uuid) -> ApiResult<Post> {
        let mut post = self.load(post_id).await?;
        let changed = post.accept(comment_id, caller).map_err(|e| {
            warn!("Accept of comment {} on post {} by {} refused: {}", comment_id, post_id, caller, e);
            e
        })?;

        if changed {
            self.save(&post).await?;
            info!("Post {} accepted comment {}", post_id, comment_id);
        }
        Ok(post)
    }

    /// Selected commenter confirms the exchange: Accepted -> Completed
    pub async fn complete_comment(&self, post_id: Uuid, comment_id: Uuid, caller: Uuid) -> ApiResult<Post> {
        let mut post = self.load(post_id).await?;
        let changed = post.complete(comment_id, caller).map_err(|e| {
            warn!("Complete of comment {} on post {} by {} refused: {}", comment_id, post_id, caller, e);
            e
        })?;

        if changed {
            self.save(&post).await?;
            info!("Post {} completed through comment {}", post_id, comment_id);
        }
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::PostStatus;
    use crate::database::Stores;
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};

    struct Fixture {
        service: PostService,
        stores: Stores,
        alice: User,
        bob: User,
        carol: User,
    }

    async fn fixture() -> Fixture {
        let stores = Stores::memory();
        let alice = User::new("Alice".into(), "a@x.com".into(), "h".into(), None);
        let bob = User::new("Bob".into(), "b@x.com".into(), "h".into(), None);
        let carol = User::new("Carol".into(), "c@x.com".into(), "h".into(), None);
        for user in [&alice, &bob, &carol] {
            stores.users.insert_user(user).await.unwrap();
        }
        Fixture {
            service: PostService::new(stores.posts.clone(), stores.users.clone()),
            stores,
            alice,
            bob,
            carol,
        }
    }

    fn chair() -> NewPost {
        NewPost {
            category: Some("furniture".into()),
            title: "Chair".into(),
            description: "Free chair".into(),
            preferred_location: "Downtown".into(),
            photo: None,
        }
    }

    fn status(result: ApiResult<impl std::fmt::Debug>) -> StatusCode {
        result.unwrap_err().status_code()
    }

    #[tokio::test]
    async fn create_post_snapshots_owner() {
        let f = fixture().await;
        let post = f.service.create_post(f.alice.id, chair()).await.unwrap();

        assert_eq!(post.user, f.alice.id);
        assert_eq!(post.name, "Alice");
        assert_eq!(post.avatar, f.alice.avatar);
        assert_eq!(post.status(), PostStatus::Open);
        assert_eq!(f.service.get_post(post.id).await.unwrap(), post);
    }

    #[tokio::test]
    async fn create_post_for_unknown_user_is_unauthorized() {
        let f = fixture().await;
        assert_eq!(
            status(f.service.create_post(Uuid::new_v4(), chair()).await),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn list_posts_is_newest_first() {
        let f = fixture().await;
        let mut ids = Vec::new();
        for minutes_ago in [30, 20, 10] {
            let mut post = Post::new(&f.alice, chair());
            post.created_at = Utc::now() - Duration::minutes(minutes_ago);
            f.stores.posts.insert_post(&post).await.unwrap();
            ids.push(post.id);
        }

        let listed: Vec<Uuid> = f.service.list_posts().await.unwrap().iter().map(|p| p.id).collect();
        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn unknown_post_is_not_found() {
        let f = fixture().await;
        let missing = Uuid::new_v4();
        assert_eq!(status(f.service.get_post(missing).await), StatusCode::NOT_FOUND);
        assert_eq!(status(f.service.like_post(missing, f.bob.id).await), StatusCode::NOT_FOUND);
        assert_eq!(
            status(f.service.add_comment(missing, f.bob.id, "hi".into()).await),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn post_removed_before_write_back_is_not_found() {
        let f = fixture().await;
        let post = f.service.create_post(f.alice.id, chair()).await.unwrap();
        let mut stale = f.service.get_post(post.id).await.unwrap();
        f.stores.posts.delete_post(post.id).await.unwrap();

        stale.like(f.bob.id).unwrap();
        let err = f.service.save(&stale).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Post not found");
    }

    #[tokio::test]
    async fn ping_reports_store_health() {
        let f = fixture().await;
        assert!(f.service.ping().await.is_ok());
    }

    #[tokio::test]
    async fn only_owner_deletes_post() {
        let f = fixture().await;
        let post = f.service.create_post(f.alice.id, chair()).await.unwrap();

        assert_eq!(status(f.service.delete_post(post.id, f.bob.id).await), StatusCode::UNAUTHORIZED);
        assert!(f.service.get_post(post.id).await.is_ok());

        f.service.delete_post(post.id, f.alice.id).await.unwrap();
        assert_eq!(status(f.service.get_post(post.id).await), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn like_twice_is_rejected_and_unlike_is_selective() {
        let f = fixture().await;
        let post = f.service.create_post(f.alice.id, chair()).await.unwrap();

        f.service.like_post(post.id, f.bob.id).await.unwrap();
        f.service.like_post(post.id, f.carol.id).await.unwrap();
        assert_eq!(status(f.service.like_post(post.id, f.bob.id).await), StatusCode::BAD_REQUEST);

        let likes = f.service.unlike_post(post.id, f.bob.id).await.unwrap();
        assert_eq!(likes, vec![Like { user: f.carol.id }]);
        assert_eq!(status(f.service.unlike_post(post.id, f.bob.id).await), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn comment_lifecycle_through_completion() {
        let f = fixture().await;
        let post = f.service.create_post(f.alice.id, chair()).await.unwrap();

        let comments = f
            .service
            .add_comment(post.id, f.bob.id, "I'll take it".into())
            .await
            .unwrap();
        assert_eq!(comments.len(), 1);
        let comment_id = comments[0].id;
        assert_eq!(comments[0].name, "Bob");

        // Neither the commenter nor a stranger may accept
        assert_eq!(
            status(f.service.accept_comment(post.id, comment_id, f.bob.id).await),
            StatusCode::UNAUTHORIZED
        );
        // The owner may not complete on the commenter's behalf
        assert_eq!(
            status(f.service.complete_comment(post.id, comment_id, f.alice.id).await),
            StatusCode::UNAUTHORIZED
        );

        let accepted = f.service.accept_comment(post.id, comment_id, f.alice.id).await.unwrap();
        assert!(accepted.is_accepted);
        assert!(accepted.comment(comment_id).unwrap().is_selected);

        let completed = f.service.complete_comment(post.id, comment_id, f.bob.id).await.unwrap();
        assert!(completed.is_completed);
        assert_eq!(f.service.get_post(post.id).await.unwrap().status(), PostStatus::Completed);
    }

    #[tokio::test]
    async fn complete_before_accept_is_rejected() {
        let f = fixture().await;
        let post = f.service.create_post(f.alice.id, chair()).await.unwrap();
        let comment_id = f
            .service
            .add_comment(post.id, f.bob.id, "offer".into())
            .await
            .unwrap()[0]
            .id;

        assert_eq!(
            status(f.service.complete_comment(post.id, comment_id, f.bob.id).await),
            StatusCode::BAD_REQUEST
        );
        assert!(!f.service.get_post(post.id).await.unwrap().is_completed);
    }

    #[tokio::test]
    async fn only_author_deletes_comment() {
        let f = fixture().await;
        let post = f.service.create_post(f.alice.id, chair()).await.unwrap();
        let comment_id = f
            .service
            .add_comment(post.id, f.bob.id, "offer".into())
            .await
            .unwrap()[0]
            .id;

        assert_eq!(
            status(f.service.delete_comment(post.id, comment_id, f.alice.id).await),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(f.service.delete_comment(post.id, Uuid::new_v4(), f.bob.id).await),
            StatusCode::NOT_FOUND
        );

        let remaining = f.service.delete_comment(post.id, comment_id, f.bob.id).await.unwrap();
        assert!(remaining.is_empty());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::user::User;

/// A user's endorsement of a post. At most one per user per post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
}

/// A reply to a post offering an exchange. Embedded in the post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set when the post owner accepts this comment's offer
    pub is_selected: bool,
    /// Set when the commenter confirms the exchange took place
    #[serde(default)]
    pub is_confirmed: bool,
}

/// An exchange offer. Likes and comments live inside the post document and
/// go away with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    /// Owner; never changes after creation
    pub user: Uuid,
    /// Owner display name at creation time
    pub name: String,
    pub avatar: Option<String>,
    pub category: Option<String>,
    pub title: String,
    pub description: String,
    pub preferred_location: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_accepted: bool,
    pub is_completed: bool,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
}

/// Validated input for a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub category: Option<String>,
    pub title: String,
    pub description: String,
    pub preferred_location: String,
    pub photo: Option<String>,
}

/// Workflow position derived from the two flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    Open,
    Accepted,
    Completed,
}

/// Rule violations raised by post mutations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("Post already liked")]
    AlreadyLiked,

    #[error("Post not liked yet")]
    NotLiked,

    #[error("Comment does not exist")]
    CommentNotFound,

    #[error("User not authorized")]
    NotAuthorized,

    #[error("Exchange already completed")]
    AlreadyCompleted,

    #[error("Another offer has already been accepted")]
    AnotherOfferAccepted,

    #[error("Offer has not been accepted")]
    NotAccepted,
}

impl Post {
    pub fn new(owner: &User, input: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: owner.id,
            name: owner.name.clone(),
            avatar: owner.avatar.clone(),
            category: input.category,
            title: input.title,
            description: input.description,
            preferred_location: input.preferred_location,
            photo: input.photo,
            created_at: Utc::now(),
            is_accepted: false,
            is_completed: false,
            likes: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user == user_id
    }

    pub fn status(&self) -> PostStatus {
        if self.is_completed {
            PostStatus::Completed
        } else if self.is_accepted {
            PostStatus::Accepted
        } else {
            PostStatus::Open
        }
    }

    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user_id)
    }

    /// Newest likes go first
    pub fn like(&mut self, user_id: Uuid) -> Result<(), PostError> {
        if self.is_liked_by(user_id) {
            return Err(PostError::AlreadyLiked);
        }
        self.likes.insert(0, Like { user: user_id });
        Ok(())
    }

    pub fn unlike(&mut self, user_id: Uuid) -> Result<(), PostError> {
        let index = self
            .likes
            .iter()
            .position(|like| like.user == user_id)
            .ok_or(PostError::NotLiked)?;
        self.likes.remove(index);
        Ok(())
    }

    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    fn comment_index(&self, comment_id: Uuid) -> Result<usize, PostError> {
        self.comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(PostError::CommentNotFound)
    }

    /// Append a comment authored by `author`, snapshotting its name and avatar
    pub fn add_comment(&mut self, author: &User, text: String) -> &Comment {
        self.comments.push(Comment {
            id: Uuid::new_v4(),
            user: author.id,
            text,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            created_at: Utc::now(),
            is_selected: false,
            is_confirmed: false,
        });
        &self.comments[self.comments.len() - 1]
    }

    /// Only the comment's author may remove it
    pub fn remove_comment(&mut self, comment_id: Uuid, caller: Uuid) -> Result<Comment, PostError> {
        let index = self.comment_index(comment_id)?;
        if self.comments[index].user != caller {
            return Err(PostError::NotAuthorized);
        }
        Ok(self.comments.remove(index))
    }

    /// Owner picks a comment's offer. Returns `false` when the same comment
    /// was already accepted and nothing changed. If the selected comment was
    /// deleted, the owner may pick another one.
    pub fn accept(&mut self, comment_id: Uuid, caller: Uuid) -> Result<bool, PostError> {
        if !self.is_owned_by(caller) {
            return Err(PostError::NotAuthorized);
        }
        let index = self.comment_index(comment_id)?;

        if self.is_completed {
            return Err(PostError::AlreadyCompleted);
        }
        // The flag alone is not enough: the selected comment may since have
        // been deleted, which reopens the choice.
        if let Some(selected) = self.comments.iter().position(|c| c.is_selected) {
            return if selected == index {
                Ok(false)
            } else {
                Err(PostError::AnotherOfferAccepted)
            };
        }

        self.comments[index].is_selected = true;
        self.is_accepted = true;
        Ok(true)
    }

    /// The selected commenter confirms the exchange. Returns `false` when
    /// the post was already completed.
    pub fn complete(&mut self, comment_id: Uuid, caller: Uuid) -> Result<bool, PostError> {
        let index = self.comment_index(comment_id)?;
        if self.comments[index].user != caller {
            return Err(PostError::NotAuthorized);
        }
        if !self.is_accepted || !self.comments[index].is_selected {
            return Err(PostError::NotAccepted);
        }
        if self.is_completed {
            return Ok(false);
        }

        let comment = &mut self.comments[index];
        comment.is_selected = true;
        comment.is_confirmed = true;
        self.is_completed = true;
        Ok(true)
    }
}

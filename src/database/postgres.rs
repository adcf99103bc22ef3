use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Comment, Like, Post, User};
use crate::database::repository::{PostStore, UserStore};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        email       TEXT NOT NULL UNIQUE,
        password    TEXT NOT NULL,
        avatar      TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id                  UUID PRIMARY KEY,
        user_id             UUID NOT NULL REFERENCES users(id),
        name                TEXT NOT NULL,
        avatar              TEXT,
        category            TEXT,
        title               TEXT NOT NULL,
        description         TEXT NOT NULL,
        preferred_location  TEXT NOT NULL,
        photo               TEXT,
        created_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
        is_accepted         BOOLEAN NOT NULL DEFAULT FALSE,
        is_completed        BOOLEAN NOT NULL DEFAULT FALSE,
        likes               JSONB NOT NULL DEFAULT '[]'::jsonb,
        comments            JSONB NOT NULL DEFAULT '[]'::jsonb
    )
    "#,
    "CREATE INDEX IF NOT EXISTS posts_created_at_idx ON posts (created_at DESC)",
];

const POST_COLUMNS: &str = "id, user_id, name, avatar, category, title, description, \
     preferred_location, photo, created_at, is_accepted, is_completed, likes, comments";

/// Postgres-backed store. Likes and comments are embedded JSONB arrays on
/// the post row.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    avatar: Option<String>,
    category: Option<String>,
    title: String,
    description: String,
    preferred_location: String,
    photo: Option<String>,
    created_at: DateTime<Utc>,
    is_accepted: bool,
    is_completed: bool,
    likes: Json<Vec<Like>>,
    comments: Json<Vec<Comment>>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            user: row.user_id,
            name: row.name,
            avatar: row.avatar,
            category: row.category,
            title: row.title,
            description: row.description,
            preferred_location: row.preferred_location,
            photo: row.photo,
            created_at: row.created_at,
            is_accepted: row.is_accepted,
            is_completed: row.is_completed,
            likes: row.likes.0,
            comments: row.comments.0,
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they are missing
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn map_unique_violation(err: sqlx::Error, what: String) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DatabaseError::Duplicate(what),
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password, avatar, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.avatar)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, format!("email {}", user.email)))?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn insert_post(&self, post: &Post) -> Result<(), DatabaseError> {
        sqlx::query(&format!(
            "INSERT INTO posts ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
            POST_COLUMNS
        ))
        .bind(post.id)
        .bind(post.user)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(&post.category)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.preferred_location)
        .bind(&post.photo)
        .bind(post.created_at)
        .bind(post.is_accepted)
        .bind(post.is_completed)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DatabaseError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {} FROM posts ORDER BY created_at DESC",
            POST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {} FROM posts WHERE id = $1",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Post::from))
    }

    async fn save_post(&self, post: &Post) -> Result<(), DatabaseError> {
        // Owner, snapshot and creation time are immutable; only workflow
        // flags and embedded arrays are written back.
        let result = sqlx::query(
            "UPDATE posts
             SET is_accepted = $2, is_completed = $3, likes = $4, comments = $5
             WHERE id = $1",
        )
        .bind(post.id)
        .bind(post.is_accepted)
        .bind(post.is_completed)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::RecordNotFound(format!("post {}", post.id)));
        }
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

//! Post repository
//!
//! Database operations for posts and their tag associations. Replacing a
//! post's tag set clears the join rows and reinserts the new set in one
//! transaction.

use crate::models::{Post, Tag};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post; the creation timestamp is assigned here
    async fn create(&self, title: &str, content: Option<&str>, user_id: i64) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Most recently created posts, newest first
    async fn list_recent(&self, limit: i64) -> Result<Vec<Post>>;

    /// All posts owned by a user, newest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Post>>;

    /// Update a post's title and content in place
    async fn update(&self, post: &Post) -> Result<()>;

    /// Delete a post; its join rows go with it
    async fn delete(&self, id: i64) -> Result<()>;

    /// Replace the post's tag set with exactly the given tag ids
    async fn replace_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<()>;

    /// Tags attached to a post, ordered by name
    async fn get_tags(&self, post_id: i64) -> Result<Vec<Tag>>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: SqlitePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, title: &str, content: Option<&str>, user_id: i64) -> Result<Post> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO posts (title, content, created_at, user_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("Failed to create post")?;

        Ok(Post {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            content: content.map(ToString::to_string),
            created_at: now,
            user_id,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, content, created_at, user_id
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_post(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, created_at, user_id
            FROM posts
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list recent posts")?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row_to_post(&row)?);
        }

        Ok(posts)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, created_at, user_id
            FROM posts
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts by user")?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row_to_post(&row)?);
        }

        Ok(posts)
    }

    async fn update(&self, post: &Post) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE posts
            SET title = ?, content = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.id)
        .execute(&self.pool)
        .await
        .context("Failed to update post")?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // post_tags rows are removed by ON DELETE CASCADE
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;

        Ok(())
    }

    async fn replace_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear post tags")?;

        for tag_id in tag_ids {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO post_tags (post_id, tag_id)
                VALUES (?, ?)
                "#,
            )
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .context("Failed to attach tag to post")?;
        }

        tx.commit().await.context("Failed to commit tag replacement")?;

        Ok(())
    }

    async fn get_tags(&self, post_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name
            FROM tags t
            INNER JOIN post_tags pt ON t.id = pt.tag_id
            WHERE pt.post_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get tags for post")?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(Tag {
                id: row.get("id"),
                name: row.get("name"),
            });
        }

        Ok(tags)
    }
}

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> Result<Post> {
    Ok(Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        user_id: row.get("user_id"),
    })
}

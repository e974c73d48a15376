//! User repository
//!
//! Database operations for users. Deleting a user is an explicit
//! transaction that also removes the user's posts and their tag
//! associations, keeping the ownership invariant visible in one place.

use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, first_name: &str, last_name: &str, image_url: &str) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// List all users
    async fn list(&self) -> Result<Vec<User>>;

    /// Update a user's fields in place
    async fn update(&self, user: &User) -> Result<()>;

    /// Delete a user together with their posts and the posts' tag rows
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, first_name: &str, last_name: &str, image_url: &str) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (first_name, last_name, image_url)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(image_url)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(User {
            id: result.last_insert_rowid(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            image_url: image_url.to_string(),
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, image_url
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, image_url
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, image_url = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.image_url)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .context("Failed to update user")?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            DELETE FROM post_tags
            WHERE post_id IN (SELECT id FROM posts WHERE user_id = ?)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete tag rows of the user's posts")?;

        sqlx::query("DELETE FROM posts WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete the user's posts")?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete user")?;

        tx.commit().await.context("Failed to commit user delete")?;

        Ok(())
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        image_url: row.get("image_url"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::models::DEFAULT_IMAGE_URL;

    async fn setup_test_repo() -> (SqlitePool, SqlxUserRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxUserRepository::new(pool.clone());
        (pool, repo)
    }

    async fn create_test_post(pool: &SqlitePool, user_id: i64, title: &str) -> i64 {
        let result = sqlx::query(
            "INSERT INTO posts (title, content, created_at, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind("content")
        .bind(chrono::Utc::now())
        .bind(user_id)
        .execute(pool)
        .await
        .expect("Failed to create test post");
        result.last_insert_rowid()
    }

    #[tokio::test]
    async fn test_create_user() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create("sponge", "bob", DEFAULT_IMAGE_URL)
            .await
            .expect("Failed to create user");

        assert!(created.id > 0);
        assert_eq!(created.first_name, "sponge");
        assert_eq!(created.last_name, "bob");
        assert_eq!(created.image_url, DEFAULT_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo
            .create("tommy", "bahama", DEFAULT_IMAGE_URL)
            .await
            .expect("Failed to create user");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let (_pool, repo) = setup_test_repo().await;

        let found = repo.get_by_id(99999).await.expect("Failed to get user");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_users_in_insertion_order() {
        let (_pool, repo) = setup_test_repo().await;

        repo.create("a", "a", DEFAULT_IMAGE_URL).await.unwrap();
        repo.create("b", "b", DEFAULT_IMAGE_URL).await.unwrap();
        repo.create("c", "c", DEFAULT_IMAGE_URL).await.unwrap();

        let users = repo.list().await.expect("Failed to list users");

        assert_eq!(users.len(), 3);
        assert_eq!(users[0].first_name, "a");
        assert_eq!(users[2].first_name, "c");
    }

    #[tokio::test]
    async fn test_update_user() {
        let (_pool, repo) = setup_test_repo().await;
        let mut user = repo
            .create("old", "name", DEFAULT_IMAGE_URL)
            .await
            .expect("Failed to create user");

        user.first_name = "new".to_string();
        user.image_url = "https://example.com/new.png".to_string();
        repo.update(&user).await.expect("Failed to update user");

        let found = repo
            .get_by_id(user.id)
            .await
            .expect("Failed to get user")
            .expect("User not found");
        assert_eq!(found.first_name, "new");
        assert_eq!(found.image_url, "https://example.com/new.png");
    }

    #[tokio::test]
    async fn test_delete_user_cascades_to_posts() {
        let (pool, repo) = setup_test_repo().await;

        let victim = repo
            .create("sponge", "bob", DEFAULT_IMAGE_URL)
            .await
            .expect("Failed to create user");
        let bystander = repo
            .create("patrick", "star", DEFAULT_IMAGE_URL)
            .await
            .expect("Failed to create user");

        create_test_post(&pool, victim.id, "first post").await;
        create_test_post(&pool, victim.id, "second post").await;
        let kept_post = create_test_post(&pool, bystander.id, "kept post").await;

        repo.delete(victim.id).await.expect("Failed to delete user");

        let found = repo.get_by_id(victim.id).await.expect("Failed to get user");
        assert!(found.is_none());

        let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE user_id = ?")
            .bind(victim.id)
            .fetch_one(&pool)
            .await
            .expect("Failed to count posts");
        let count: i64 = row.get("count");
        assert_eq!(count, 0);

        // The other user's posts survive
        let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE id = ?")
            .bind(kept_post)
            .fetch_one(&pool)
            .await
            .expect("Failed to count posts");
        let count: i64 = row.get("count");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_delete_user_removes_join_rows() {
        let (pool, repo) = setup_test_repo().await;

        let user = repo
            .create("sponge", "bob", DEFAULT_IMAGE_URL)
            .await
            .expect("Failed to create user");
        let post_id = create_test_post(&pool, user.id, "tagged post").await;

        let result = sqlx::query("INSERT INTO tags (name) VALUES ('rust')")
            .execute(&pool)
            .await
            .expect("Failed to create tag");
        let tag_id = result.last_insert_rowid();
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&pool)
            .await
            .expect("Failed to attach tag");

        repo.delete(user.id).await.expect("Failed to delete user");

        let row = sqlx::query("SELECT COUNT(*) as count FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&pool)
            .await
            .expect("Failed to count join rows");
        let count: i64 = row.get("count");
        assert_eq!(count, 0);

        // The tag itself is untouched
        let row = sqlx::query("SELECT COUNT(*) as count FROM tags WHERE id = ?")
            .bind(tag_id)
            .fetch_one(&pool)
            .await
            .expect("Failed to count tags");
        let count: i64 = row.get("count");
        assert_eq!(count, 1);
    }
}

//! Tag service
//!
//! Tag CRUD. Duplicate names are not pre-validated; the UNIQUE violation
//! raised by the database is recognized and mapped to a conflict.

use crate::db::repositories::TagRepository;
use crate::models::{Post, Tag};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for tag service operations
#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    /// Tag not found
    #[error("Tag not found: {0}")]
    NotFound(i64),

    /// Tag name already taken
    #[error("Tag name already exists: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Tag service
pub struct TagService {
    repo: Arc<dyn TagRepository>,
}

impl TagService {
    /// Create a new tag service
    pub fn new(repo: Arc<dyn TagRepository>) -> Self {
        Self { repo }
    }

    /// List all tags, ordered by name
    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        self.repo
            .list()
            .await
            .context("Failed to list tags")
            .map_err(Into::into)
    }

    /// Get a tag by id, or a typed not-found error
    pub async fn get(&self, id: i64) -> Result<Tag, TagServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get tag")?
            .ok_or(TagServiceError::NotFound(id))
    }

    /// Posts carrying a tag, newest first
    pub async fn posts_of(&self, tag_id: i64) -> Result<Vec<Post>, TagServiceError> {
        self.repo
            .list_posts(tag_id)
            .await
            .context("Failed to list posts for tag")
            .map_err(Into::into)
    }

    /// Create a tag. A duplicate name is a conflict.
    pub async fn create(&self, name: &str) -> Result<Tag, TagServiceError> {
        self.repo
            .create(name)
            .await
            .map_err(|e| map_unique_violation(e, name))
    }

    /// Rename a tag. Renaming to a taken name is a conflict.
    pub async fn update(&self, id: i64, name: &str) -> Result<Tag, TagServiceError> {
        let mut tag = self.get(id).await?;
        tag.name = name.to_string();

        self.repo
            .update(&tag)
            .await
            .map_err(|e| map_unique_violation(e, name))?;

        Ok(tag)
    }

    /// Delete a tag, removing its join rows but not the posts.
    pub async fn delete(&self, id: i64) -> Result<(), TagServiceError> {
        let tag = self.get(id).await?;

        self.repo
            .delete(tag.id)
            .await
            .context("Failed to delete tag")?;

        Ok(())
    }
}

/// Turn a UNIQUE-constraint failure into a conflict; anything else stays an
/// internal error.
fn map_unique_violation(err: anyhow::Error, name: &str) -> TagServiceError {
    let is_unique = err
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.kind() == sqlx::error::ErrorKind::UniqueViolation);

    if is_unique {
        TagServiceError::Conflict(name.to_string())
    } else {
        TagServiceError::Internal(err)
    }
}

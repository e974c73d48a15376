//! User service
//!
//! Create/read/update/delete for users. A blank image URL falls back to the
//! fixed placeholder, and deleting a user takes their posts with it.

use crate::db::repositories::UserRepository;
use crate::models::{CreateUserInput, UpdateUserInput, User};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// User not found
    #[error("User not found: {0}")]
    NotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// User service
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new user service
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, UserServiceError> {
        self.repo
            .list()
            .await
            .context("Failed to list users")
            .map_err(Into::into)
    }

    /// Get a user by id, or a typed not-found error
    pub async fn get(&self, id: i64) -> Result<User, UserServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or(UserServiceError::NotFound(id))
    }

    /// Create a user from form input.
    ///
    /// A blank image URL is stored as the fixed placeholder.
    pub async fn create(&self, input: CreateUserInput) -> Result<User, UserServiceError> {
        let image_url = input.resolved_image_url();
        let created = self
            .repo
            .create(&input.first_name, &input.last_name, &image_url)
            .await
            .context("Failed to create user")?;

        Ok(created)
    }

    /// Update a user's fields in place.
    ///
    /// The placeholder fallback applies here too: clearing the image field
    /// resets the avatar rather than storing an empty URL.
    pub async fn update(&self, id: i64, input: UpdateUserInput) -> Result<User, UserServiceError> {
        let mut user = self.get(id).await?;

        user.image_url = input.resolved_image_url();
        user.first_name = input.first_name;
        user.last_name = input.last_name;

        self.repo
            .update(&user)
            .await
            .context("Failed to update user")?;

        Ok(user)
    }

    /// Delete a user by id, cascading to their posts.
    pub async fn delete(&self, id: i64) -> Result<(), UserServiceError> {
        let user = self.get(id).await?;

        self.repo
            .delete(user.id)
            .await
            .context("Failed to delete user")?;

        Ok(())
    }
}

//! User model

use serde::{Deserialize, Serialize};

/// Placeholder avatar stored when a user is created or edited without an
/// image URL.
pub const DEFAULT_IMAGE_URL: &str = "https://i.stack.imgur.com/34AD2.jpg";

/// User entity. Owns a collection of posts; deleting a user deletes its
/// posts with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Avatar URL, never empty
    pub image_url: String,
}

/// Input for creating a user.
///
/// A blank or missing image URL falls back to [`DEFAULT_IMAGE_URL`].
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub first_name: String,
    pub last_name: String,
    pub image_url: Option<String>,
}

/// Input for editing a user in place.
#[derive(Debug, Clone)]
pub struct UpdateUserInput {
    pub first_name: String,
    pub last_name: String,
    pub image_url: Option<String>,
}

impl CreateUserInput {
    /// Resolve the stored image URL, applying the placeholder fallback.
    pub fn resolved_image_url(&self) -> String {
        resolve_image_url(self.image_url.as_deref())
    }
}

impl UpdateUserInput {
    /// Resolve the stored image URL, applying the placeholder fallback.
    pub fn resolved_image_url(&self) -> String {
        resolve_image_url(self.image_url.as_deref())
    }
}

fn resolve_image_url(submitted: Option<&str>) -> String {
    match submitted {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => DEFAULT_IMAGE_URL.to_string(),
    }
}

//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity. Belongs to exactly one user and carries any number of tags
/// through the `post_tags` join table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// Body text; absent when the form submitted an empty string
    pub content: Option<String>,
    /// Creation timestamp, assigned by the server once
    pub created_at: DateTime<Utc>,
    /// Owning user
    pub user_id: i64,
}

/// Input for creating a post under a user.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub title: String,
    /// Raw form content; an empty string is coerced to absent
    pub content: Option<String>,
    /// Tag names ticked on the form; unknown names are dropped silently
    pub tag_names: Vec<String>,
}

/// Input for editing a post. The tag set is replaced wholesale.
#[derive(Debug, Clone)]
pub struct UpdatePostInput {
    pub title: String,
    pub content: Option<String>,
    pub tag_names: Vec<String>,
}

impl CreatePostInput {
    /// Content with the empty-string-means-absent coercion applied.
    pub fn normalized_content(&self) -> Option<String> {
        normalize_content(self.content.as_deref())
    }
}

impl UpdatePostInput {
    /// Content with the empty-string-means-absent coercion applied.
    pub fn normalized_content(&self) -> Option<String> {
        normalize_content(self.content.as_deref())
    }
}

fn normalize_content(content: Option<&str>) -> Option<String> {
    content
        .filter(|c| !c.trim().is_empty())
        .map(ToString::to_string)
}

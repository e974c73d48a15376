//! Tag model

use serde::{Deserialize, Serialize};

/// Tag entity. Names are unique across all tags; posts reference tags
/// through the `post_tags` join table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Tag name, globally unique
    pub name: String,
}

//! Post service
//!
//! Post creation and editing, including the tag-attachment rules: submitted
//! tag names are resolved against existing tags, unknown names are silently
//! dropped, and editing replaces the tag set wholesale.

use crate::db::repositories::{PostRepository, TagRepository};
use crate::models::{CreatePostInput, Post, Tag, UpdatePostInput};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Post service
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
}

impl PostService {
    /// Create a new post service
    pub fn new(posts: Arc<dyn PostRepository>, tags: Arc<dyn TagRepository>) -> Self {
        Self { posts, tags }
    }

    /// Get a post by id, or a typed not-found error
    pub async fn get(&self, id: i64) -> Result<Post, PostServiceError> {
        self.posts
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(PostServiceError::NotFound(id))
    }

    /// Tags attached to a post
    pub async fn tags_of(&self, post_id: i64) -> Result<Vec<Tag>, PostServiceError> {
        self.posts
            .get_tags(post_id)
            .await
            .context("Failed to get post tags")
            .map_err(Into::into)
    }

    /// Most recently created posts, newest first
    pub async fn recent(&self, limit: i64) -> Result<Vec<Post>, PostServiceError> {
        self.posts
            .list_recent(limit)
            .await
            .context("Failed to list recent posts")
            .map_err(Into::into)
    }

    /// All posts owned by a user, newest first
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Post>, PostServiceError> {
        self.posts
            .list_by_user(user_id)
            .await
            .context("Failed to list posts by user")
            .map_err(Into::into)
    }

    /// Create a post under a user and attach the resolvable tags.
    ///
    /// Empty content is stored as absent. Tag names with no matching tag
    /// row are ignored.
    pub async fn create(
        &self,
        user_id: i64,
        input: CreatePostInput,
    ) -> Result<Post, PostServiceError> {
        let content = input.normalized_content();
        let post = self
            .posts
            .create(&input.title, content.as_deref(), user_id)
            .await
            .context("Failed to create post")?;

        let tag_ids = self.resolve_tag_names(&input.tag_names).await?;
        if !tag_ids.is_empty() {
            self.posts
                .replace_tags(post.id, &tag_ids)
                .await
                .context("Failed to attach tags")?;
        }

        Ok(post)
    }

    /// Edit a post's title and content and replace its tag set with
    /// exactly the resolvable submitted names.
    pub async fn update(&self, id: i64, input: UpdatePostInput) -> Result<Post, PostServiceError> {
        let mut post = self.get(id).await?;

        post.content = input.normalized_content();
        post.title = input.title;

        self.posts
            .update(&post)
            .await
            .context("Failed to update post")?;

        let tag_ids = self.resolve_tag_names(&input.tag_names).await?;
        self.posts
            .replace_tags(post.id, &tag_ids)
            .await
            .context("Failed to replace tags")?;

        Ok(post)
    }

    /// Delete a post. Returns the former owner's id for the redirect back
    /// to their page.
    pub async fn delete(&self, id: i64) -> Result<i64, PostServiceError> {
        let post = self.get(id).await?;

        self.posts
            .delete(post.id)
            .await
            .context("Failed to delete post")?;

        Ok(post.user_id)
    }

    /// Resolve submitted tag names to ids, dropping unknown names.
    async fn resolve_tag_names(&self, names: &[String]) -> Result<Vec<i64>, PostServiceError> {
        let mut ids = Vec::new();
        for name in names {
            if let Some(tag) = self
                .tags
                .get_by_name(name)
                .await
                .context("Failed to resolve tag name")?
            {
                ids.push(tag.id);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxPostRepository, SqlxTagRepository, SqlxUserRepository};
    use crate::db::repositories::user::UserRepository;
    use crate::db::{create_test_pool, migrations};
    use sqlx::SqlitePool;

    async fn setup_test_service() -> (SqlitePool, PostService, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user = SqlxUserRepository::new(pool.clone())
            .create("sponge", "bob", "https://i.stack.imgur.com/34AD2.jpg")
            .await
            .expect("Failed to create test user");

        let service = PostService::new(
            SqlxPostRepository::boxed(pool.clone()),
            SqlxTagRepository::boxed(pool.clone()),
        );
        (pool, service, user.id)
    }

    async fn seed_tag(pool: &SqlitePool, name: &str) {
        sqlx::query("INSERT INTO tags (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await
            .expect("Failed to seed tag");
    }

    fn create_input(title: &str, content: Option<&str>, tags: &[&str]) -> CreatePostInput {
        CreatePostInput {
            title: title.to_string(),
            content: content.map(ToString::to_string),
            tag_names: tags.iter().map(ToString::to_string).collect(),
        }
    }

    fn update_input(title: &str, content: Option<&str>, tags: &[&str]) -> UpdatePostInput {
        UpdatePostInput {
            title: title.to_string(),
            content: content.map(ToString::to_string),
            tag_names: tags.iter().map(ToString::to_string).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_post_with_tags() {
        let (pool, service, user_id) = setup_test_service().await;
        seed_tag(&pool, "rust").await;
        seed_tag(&pool, "web").await;

        let post = service
            .create(
                user_id,
                create_input("first post", Some("first bit of content"), &["rust", "web"]),
            )
            .await
            .expect("Failed to create post");

        let tags = service.tags_of(post.id).await.expect("Failed to get tags");
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["rust", "web"]);
    }

    #[tokio::test]
    async fn test_create_post_empty_content_is_absent() {
        let (_pool, service, user_id) = setup_test_service().await;

        let post = service
            .create(user_id, create_input("bare", Some(""), &[]))
            .await
            .expect("Failed to create post");

        let found = service.get(post.id).await.expect("Failed to get post");
        assert_eq!(found.content, None);
    }

    #[tokio::test]
    async fn test_unknown_tag_names_are_ignored() {
        let (pool, service, user_id) = setup_test_service().await;
        seed_tag(&pool, "rust").await;

        let post = service
            .create(
                user_id,
                create_input("first post", None, &["rust", "no-such-tag"]),
            )
            .await
            .expect("Failed to create post");

        let tags = service.tags_of(post.id).await.expect("Failed to get tags");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "rust");
    }

    #[tokio::test]
    async fn test_only_unknown_tag_names_yield_no_tags() {
        let (_pool, service, user_id) = setup_test_service().await;

        let post = service
            .create(user_id, create_input("first post", None, &["ghost"]))
            .await
            .expect("Failed to create post");

        let tags = service.tags_of(post.id).await.expect("Failed to get tags");
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_tag_set() {
        let (pool, service, user_id) = setup_test_service().await;
        seed_tag(&pool, "rust").await;
        seed_tag(&pool, "web").await;
        seed_tag(&pool, "db").await;

        let post = service
            .create(user_id, create_input("post", None, &["rust", "web"]))
            .await
            .expect("Failed to create post");

        service
            .update(post.id, update_input("post", None, &["db"]))
            .await
            .expect("Failed to update post");

        let tags = service.tags_of(post.id).await.expect("Failed to get tags");
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["db"]);
    }

    #[tokio::test]
    async fn test_update_with_no_tags_clears_set() {
        let (pool, service, user_id) = setup_test_service().await;
        seed_tag(&pool, "rust").await;

        let post = service
            .create(user_id, create_input("post", None, &["rust"]))
            .await
            .expect("Failed to create post");

        service
            .update(post.id, update_input("post", None, &[]))
            .await
            .expect("Failed to update post");

        let tags = service.tags_of(post.id).await.expect("Failed to get tags");
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let (_pool, service, _user_id) = setup_test_service().await;

        let result = service
            .update(99999, update_input("post", None, &[]))
            .await;
        assert!(matches!(result, Err(PostServiceError::NotFound(99999))));
    }

    #[tokio::test]
    async fn test_delete_returns_owner_id() {
        let (_pool, service, user_id) = setup_test_service().await;
        let post = service
            .create(user_id, create_input("doomed", None, &[]))
            .await
            .expect("Failed to create post");

        let owner = service.delete(post.id).await.expect("Failed to delete post");

        assert_eq!(owner, user_id);
        assert!(matches!(
            service.get(post.id).await,
            Err(PostServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_recent_limits_and_orders() {
        let (_pool, service, user_id) = setup_test_service().await;

        for i in 1..=6 {
            service
                .create(user_id, create_input(&format!("post {}", i), None, &[]))
                .await
                .expect("Failed to create post");
        }

        let recent = service.recent(5).await.expect("Failed to list recent");

        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].title, "post 6");
        assert_eq!(recent[4].title, "post 2");
    }

    // ========================================================================
    // Property-based tests
    // ========================================================================

    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// After an edit, the post's tag set equals exactly the submitted
        /// names that match existing tags, regardless of what was attached
        /// before or how many unknown names were submitted.
        #[test]
        fn property_edit_tag_set_equals_resolvable_names(
            initial in proptest::collection::vec(0..4usize, 0..4),
            submitted in proptest::collection::vec(0..4usize, 0..4),
            unknown_count in 0..3usize,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let (pool, service, user_id) = setup_test_service().await;

                let known = ["alpha", "beta", "gamma", "delta"];
                for name in known {
                    seed_tag(&pool, name).await;
                }

                let initial_names: Vec<&str> =
                    initial.iter().map(|&i| known[i]).collect();
                let post = service
                    .create(user_id, create_input("post", None, &initial_names))
                    .await
                    .expect("create should succeed");

                let mut submitted_names: Vec<String> =
                    submitted.iter().map(|&i| known[i].to_string()).collect();
                for i in 0..unknown_count {
                    submitted_names.push(format!("unknown-{}", i));
                }

                service
                    .update(
                        post.id,
                        UpdatePostInput {
                            title: "post".to_string(),
                            content: None,
                            tag_names: submitted_names.clone(),
                        },
                    )
                    .await
                    .expect("update should succeed");

                let mut expected: Vec<String> = submitted_names
                    .iter()
                    .filter(|n| known.contains(&n.as_str()))
                    .cloned()
                    .collect();
                expected.sort();
                expected.dedup();

                let mut actual: Vec<String> = service
                    .tags_of(post.id)
                    .await
                    .expect("tags_of should succeed")
                    .into_iter()
                    .map(|t| t.name)
                    .collect();
                actual.sort();

                prop_assert_eq!(actual, expected);
                Ok(())
            });
            result?;
        }
    }
}

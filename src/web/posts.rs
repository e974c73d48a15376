//! Post pages
//!
//! Posts are created under a user. The create and edit forms carry one
//! checkbox per existing tag; the submitted names travel as repeated
//! `tags` fields, which is why these two handlers use the axum-extra form
//! extractor.

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use axum_extra::extract::Form;
use serde::Deserialize;
use tera::Context;

use crate::models::{CreatePostInput, UpdatePostInput};
use crate::web::{pages, AppState, PageError};

/// Build the posts router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}/posts/new", get(new_post_form).post(create_post))
        .route("/posts/{id}", get(show_post))
        .route("/posts/{id}/edit", get(edit_post_form).post(update_post))
        .route("/posts/{id}/delete", post(delete_post))
}

/// Submitted post form. `tags` holds the ticked checkbox values; a form
/// with nothing ticked submits no `tags` field at all.
#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<PostForm> for CreatePostInput {
    fn from(form: PostForm) -> Self {
        Self {
            title: form.title,
            content: form.content,
            tag_names: form.tags,
        }
    }
}

impl From<PostForm> for UpdatePostInput {
    fn from(form: PostForm) -> Self {
        Self {
            title: form.title,
            content: form.content,
            tag_names: form.tags,
        }
    }
}

/// GET /users/{id}/posts/new - the new-post form with tag checkboxes
async fn new_post_form(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let user = state.user_service.get(user_id).await?;
    let tags = state.tag_service.list().await?;

    let mut context = Context::new();
    context.insert("user", &user);
    context.insert("tags", &tags);
    pages::render("posts/new.html", &context)
}

/// POST /users/{id}/posts/new - create the post and return to its owner
async fn create_post(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Redirect, PageError> {
    // The owner must exist before anything is written
    let user = state.user_service.get(user_id).await?;
    state.post_service.create(user.id, form.into()).await?;

    Ok(Redirect::to(&format!("/users/{}", user.id)))
}

/// GET /posts/{id} - post detail with author and tags
async fn show_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let post = state.post_service.get(id).await?;
    let author = state.user_service.get(post.user_id).await?;
    let tags = state.post_service.tags_of(post.id).await?;

    let mut context = Context::new();
    context.insert("post", &post);
    context.insert("author", &author);
    context.insert("tags", &tags);
    pages::render("posts/detail.html", &context)
}

/// GET /posts/{id}/edit - the edit form with the current tag set ticked
async fn edit_post_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let post = state.post_service.get(id).await?;
    let tags = state.tag_service.list().await?;
    let checked: Vec<String> = state
        .post_service
        .tags_of(post.id)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();

    let mut context = Context::new();
    context.insert("post", &post);
    context.insert("tags", &tags);
    context.insert("checked", &checked);
    pages::render("posts/edit.html", &context)
}

/// POST /posts/{id}/edit - apply the edit, replacing the tag set
async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Redirect, PageError> {
    let post = state.post_service.update(id, form.into()).await?;

    Ok(Redirect::to(&format!("/posts/{}", post.id)))
}

/// POST /posts/{id}/delete - delete the post and return to its former owner
async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, PageError> {
    let owner_id = state.post_service.delete(id).await?;

    Ok(Redirect::to(&format!("/users/{}", owner_id)))
}

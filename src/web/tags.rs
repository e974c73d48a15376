//! Tag pages
//!
//! Tag CRUD plus a detail page listing the posts that carry the tag.
//! Creating or renaming to a name that is already taken renders a conflict
//! page straight from the database's uniqueness constraint.

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tera::Context;

use crate::web::{pages, AppState, PageError};

/// Build the tags router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tags", get(list_tags))
        .route("/tags/new", get(new_tag_form).post(create_tag))
        .route("/tags/{id}", get(show_tag))
        .route("/tags/{id}/edit", get(edit_tag_form).post(update_tag))
        .route("/tags/{id}/delete", post(delete_tag))
}

/// Submitted tag form
#[derive(Debug, Deserialize)]
pub struct TagForm {
    pub name: String,
}

/// GET /tags - all tags
async fn list_tags(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let tags = state.tag_service.list().await?;

    let mut context = Context::new();
    context.insert("tags", &tags);
    pages::render("tags/list.html", &context)
}

/// GET /tags/new - the new-tag form
async fn new_tag_form() -> Result<Html<String>, PageError> {
    pages::render("tags/new.html", &Context::new())
}

/// POST /tags/new - create a tag and return to the listing
async fn create_tag(
    State(state): State<AppState>,
    Form(form): Form<TagForm>,
) -> Result<Redirect, PageError> {
    state.tag_service.create(&form.name).await?;

    Ok(Redirect::to("/tags"))
}

/// GET /tags/{id} - tag detail with its posts
async fn show_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let tag = state.tag_service.get(id).await?;
    let posts = state.tag_service.posts_of(tag.id).await?;

    let mut context = Context::new();
    context.insert("tag", &tag);
    context.insert("posts", &posts);
    pages::render("tags/detail.html", &context)
}

/// GET /tags/{id}/edit - the edit form, pre-filled
async fn edit_tag_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let tag = state.tag_service.get(id).await?;

    let mut context = Context::new();
    context.insert("tag", &tag);
    pages::render("tags/edit.html", &context)
}

/// POST /tags/{id}/edit - rename the tag and return to the listing
async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<TagForm>,
) -> Result<Redirect, PageError> {
    state.tag_service.update(id, &form.name).await?;

    Ok(Redirect::to("/tags"))
}

/// POST /tags/{id}/delete - delete the tag; its posts stay
async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, PageError> {
    state.tag_service.delete(id).await?;

    Ok(Redirect::to("/tags"))
}

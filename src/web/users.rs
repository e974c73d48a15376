//! User pages
//!
//! Listing, detail, create, edit and delete. Mutations redirect back to the
//! user listing; the delete route is a plain link (GET), matching the HTML
//! surface of the app.

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tera::Context;

use crate::models::{CreateUserInput, UpdateUserInput};
use crate::web::{pages, AppState, PageError};

/// Build the users router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/new", get(new_user_form).post(create_user))
        .route("/users/{id}", get(show_user))
        .route("/users/{id}/edit", get(edit_user_form).post(update_user))
        .route("/users/{id}/delete", get(delete_user))
}

/// Submitted user form. The image field may be absent or blank; the
/// service substitutes the placeholder avatar.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub first: String,
    pub last: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<UserForm> for CreateUserInput {
    fn from(form: UserForm) -> Self {
        Self {
            first_name: form.first,
            last_name: form.last,
            image_url: form.image,
        }
    }
}

impl From<UserForm> for UpdateUserInput {
    fn from(form: UserForm) -> Self {
        Self {
            first_name: form.first,
            last_name: form.last,
            image_url: form.image,
        }
    }
}

/// GET /users - all users
async fn list_users(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let users = state.user_service.list().await?;

    let mut context = Context::new();
    context.insert("users", &users);
    pages::render("users/list.html", &context)
}

/// GET /users/new - the new-user form
async fn new_user_form() -> Result<Html<String>, PageError> {
    pages::render("users/new.html", &Context::new())
}

/// POST /users/new - create a user and return to the listing
async fn create_user(
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Result<Redirect, PageError> {
    state.user_service.create(form.into()).await?;

    Ok(Redirect::to("/users"))
}

/// GET /users/{id} - user detail with their posts
async fn show_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let user = state.user_service.get(id).await?;
    let posts = state.post_service.list_by_user(user.id).await?;

    let mut context = Context::new();
    context.insert("user", &user);
    context.insert("posts", &posts);
    pages::render("users/detail.html", &context)
}

/// GET /users/{id}/edit - the edit form, pre-filled
async fn edit_user_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let user = state.user_service.get(id).await?;

    let mut context = Context::new();
    context.insert("user", &user);
    pages::render("users/edit.html", &context)
}

/// POST /users/{id}/edit - apply the edit and return to the listing
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<UserForm>,
) -> Result<Redirect, PageError> {
    state.user_service.update(id, form.into()).await?;

    Ok(Redirect::to("/users"))
}

/// GET /users/{id}/delete - delete the user and their posts
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, PageError> {
    state.user_service.delete(id).await?;

    Ok(Redirect::to("/users"))
}

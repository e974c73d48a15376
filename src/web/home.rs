//! Home page

use axum::{extract::State, response::Html};
use tera::Context;

use crate::web::{pages, AppState, PageError};

/// How many posts the landing page shows
const RECENT_POSTS: i64 = 5;

/// GET / - the five most recent posts, newest first
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let posts = state.post_service.recent(RECENT_POSTS).await?;

    let mut context = Context::new();
    context.insert("posts", &posts);
    pages::render("home.html", &context)
}

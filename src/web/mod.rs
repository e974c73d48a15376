//! Web layer - HTTP handlers and routing
//!
//! Server-rendered pages and form handlers for the Blogly application:
//! - Home page (most recent posts)
//! - User pages (list, detail, create, edit, delete)
//! - Post pages (detail, create under a user, edit, delete)
//! - Tag pages (list, detail, create, edit, delete)
//!
//! Every mutating handler answers with a redirect to a listing or detail
//! page; every missing-resource lookup renders a 404 page.

pub mod error;
pub mod home;
pub mod pages;
pub mod posts;
pub mod tags;
pub mod users;


use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::{post::PostService, tag::TagService, user::UserService};

pub use error::PageError;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub post_service: Arc<PostService>,
    pub tag_service: Arc<TagService>,
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .merge(users::router())
        .merge(posts::router())
        .merge(tags::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

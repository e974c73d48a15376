//! Page errors
//!
//! The error surface of the web layer is small: a lookup either finds its
//! row or renders a 404 page; a duplicate tag name renders a 409; anything
//! else is a 500. Service errors convert into `PageError` so handlers can
//! use `?` throughout.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::services::{PostServiceError, TagServiceError, UserServiceError};
use crate::web::pages;

/// Error rendered as an HTML page
#[derive(Debug)]
pub enum PageError {
    /// Resource not found (404)
    NotFound(String),
    /// Uniqueness conflict (409)
    Conflict(String),
    /// Anything else (500)
    Internal(anyhow::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            PageError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            PageError::Conflict(message) => (StatusCode::CONFLICT, message),
            PageError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (status, pages::render_error(status, &message)).into_response()
    }
}

impl From<UserServiceError> for PageError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::NotFound(id) => PageError::NotFound(format!("No user with id {}", id)),
            UserServiceError::Internal(e) => PageError::Internal(e),
        }
    }
}

impl From<PostServiceError> for PageError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::NotFound(id) => PageError::NotFound(format!("No post with id {}", id)),
            PostServiceError::Internal(e) => PageError::Internal(e),
        }
    }
}

impl From<TagServiceError> for PageError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::NotFound(id) => PageError::NotFound(format!("No tag with id {}", id)),
            TagServiceError::Conflict(name) => {
                PageError::Conflict(format!("A tag named \"{}\" already exists", name))
            }
            TagServiceError::Internal(e) => PageError::Internal(e),
        }
    }
}

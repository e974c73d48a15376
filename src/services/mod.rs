//! Services
//!
//! Business logic for the Blogly application, one service per entity.
//! Services sit between the web handlers and the repositories and own the
//! rules the handlers should not care about: default values, not-found
//! mapping, tag-name resolution and cascade semantics.

pub mod post;
pub mod tag;
pub mod user;

pub use post::{PostService, PostServiceError};
pub use tag::{TagService, TagServiceError};
pub use user::{UserService, UserServiceError};

//! Data models
//!
//! Database entities (Post, User) and the input types used to create them.

mod post;
mod user;

pub use post::{slugify, CreatePostInput, Post, PostWithAuthor};
pub use user::{Author, CreateUserInput, User};

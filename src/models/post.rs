//! Post model
//!
//! This module provides:
//! - `Post` entity representing a blog entry
//! - `PostWithAuthor`, a post with its author relation loaded
//! - `CreatePostInput` for new posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Author;

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    pub body: String,
    /// Author user ID
    pub author_id: i64,
    /// Recency key for listings
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post together with its eagerly loaded author.
///
/// Serializes flat, so templates see `post.title` and `post.author.name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    /// `None` only when the author row is gone but the post survived
    pub author: Option<Author>,
}

impl PostWithAuthor {
    pub fn new(post: Post, author: Option<Author>) -> Self {
        Self { post, author }
    }

    /// Author display name, if the author was loaded
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.name.as_str())
    }
}

/// Input for creating a new post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    /// Derived from the title when absent
    pub slug: Option<String>,
    pub body: String,
    pub author_id: i64,
    /// Defaults to now; set explicitly when importing older posts
    pub created_at: Option<DateTime<Utc>>,
}

impl CreatePostInput {
    pub fn new(title: impl Into<String>, body: impl Into<String>, author_id: i64) -> Self {
        Self {
            title: title.into(),
            slug: None,
            body: body.into(),
            author_id,
            created_at: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// The explicit slug, or one derived from the title
    pub fn resolved_slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&self.title),
        }
    }
}

/// Lowercase ASCII alphanumerics; every other run of characters becomes a single `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

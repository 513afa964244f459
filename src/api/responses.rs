//! JSON response bodies

use serde::{Deserialize, Serialize};

use crate::models::PostWithAuthor;

/// Body of `GET /api/v1/posts`
#[derive(Debug, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostWithAuthor>,
    pub total: usize,
}

impl From<Vec<PostWithAuthor>> for PostListResponse {
    fn from(posts: Vec<PostWithAuthor>) -> Self {
        let total = posts.len();
        Self { posts, total }
    }
}

/// Body of `GET /api/v1/health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

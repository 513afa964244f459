//! Post service
//!
//! Business logic around posts:
//! - The cached front page listing (every post, newest first, author loaded)
//! - Validated post creation with cache invalidation

use crate::cache::{CacheLayer, MemoryCache};
use crate::db::repositories::{is_unique_violation, PostRepository, UserRepository};
use crate::models::{CreatePostInput, Post, PostWithAuthor};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Cache key for the front page listing
const CACHE_KEY_LATEST: &str = "posts:latest";

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Post slug already exists: {0}")]
    DuplicateSlug(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Post service
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    user_repo: Arc<dyn UserRepository>,
    cache: Arc<MemoryCache>,
    cache_ttl: Duration,
    /// Bumped on every invalidation. A listing read under an older
    /// generation is never written to the cache.
    listing_generation: Mutex<u64>,
}

impl PostService {
    pub fn new(
        repo: Arc<dyn PostRepository>,
        user_repo: Arc<dyn UserRepository>,
        cache: Arc<MemoryCache>,
    ) -> Self {
        let cache_ttl = cache.default_ttl();
        Self {
            repo,
            user_repo,
            cache,
            cache_ttl,
            listing_generation: Mutex::new(0),
        }
    }

    /// Override how long the listing stays cached
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// All posts, most recent first, each with its author loaded.
    ///
    /// Served from cache when possible; a cache failure falls through to
    /// the database rather than failing the request.
    pub async fn latest_with_author(&self) -> Result<Vec<PostWithAuthor>, PostServiceError> {
        match self.cache.get::<Vec<PostWithAuthor>>(CACHE_KEY_LATEST).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable cached post listing: {:#}", e),
        }

        let read_generation = *self.listing_generation.lock().await;

        let posts = self
            .repo
            .list_latest_with_author()
            .await
            .context("Failed to list posts with authors")?;

        if !self.cache_ttl.is_zero() {
            // Held across the write so an invalidation cannot slip in between
            let generation = self.listing_generation.lock().await;
            if *generation == read_generation {
                if let Err(e) = self.cache.set(CACHE_KEY_LATEST, &posts, self.cache_ttl).await {
                    tracing::warn!("Failed to cache post listing: {:#}", e);
                }
            } else {
                tracing::debug!("Post listing changed while loading, not caching it");
            }
        }

        Ok(posts)
    }

    /// Create a post after validating it, then drop the cached listing.
    pub async fn create_post(&self, input: CreatePostInput) -> Result<Post, PostServiceError> {
        if input.title.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.body.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Body cannot be empty".to_string(),
            ));
        }

        let slug = input.resolved_slug();
        if slug.is_empty() {
            return Err(PostServiceError::ValidationError(
                "Slug must contain at least one letter or digit".to_string(),
            ));
        }

        if self
            .user_repo
            .get_by_id(input.author_id)
            .await
            .context("Failed to look up author")?
            .is_none()
        {
            return Err(PostServiceError::ValidationError(format!(
                "Author {} does not exist",
                input.author_id
            )));
        }

        if self
            .repo
            .exists_by_slug(&slug)
            .await
            .context("Failed to check slug")?
        {
            return Err(PostServiceError::DuplicateSlug(slug));
        }

        // The slug check above can lose a race with a concurrent insert
        let post = match self.repo.create(&input.with_slug(slug.clone())).await {
            Ok(post) => post,
            Err(e) if is_unique_violation(&e) => {
                return Err(PostServiceError::DuplicateSlug(slug))
            }
            Err(e) => return Err(e.context("Failed to create post").into()),
        };

        self.invalidate_listing().await;
        tracing::info!("Created post {} ({})", post.id, post.slug);

        Ok(post)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Post, PostServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or_else(|| PostServiceError::NotFound(id.to_string()))
    }

    pub async fn count(&self) -> Result<i64, PostServiceError> {
        Ok(self.repo.count().await.context("Failed to count posts")?)
    }

    async fn invalidate_listing(&self) {
        let mut generation = self.listing_generation.lock().await;
        *generation += 1;
        if let Err(e) = self.cache.delete(CACHE_KEY_LATEST).await {
            tracing::warn!("Failed to invalidate post listing cache: {:#}", e);
        }
    }
}

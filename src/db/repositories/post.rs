//! Post repository
//!
//! Database operations for posts.
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite and MySQL
//!
//! The front page listing loads every post together with its author in a
//! single joined query, newest first.

use crate::config::DatabaseDriver;
use crate::db::repositories::user::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::{Author, CreatePostInput, Post, PostWithAuthor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, input: &CreatePostInput) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Check if a slug is already taken
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Count all posts
    async fn count(&self) -> Result<i64>;

    /// Every post with its author loaded, ordered by `created_at` DESC
    /// (ties broken by `id` DESC)
    async fn list_latest_with_author(&self) -> Result<Vec<PostWithAuthor>>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, input: &CreatePostInput) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_post_sqlite(sqlite(&self.pool)?, input).await,
            DatabaseDriver::Mysql => create_post_mysql(mysql(&self.pool)?, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_post_by_id_sqlite(sqlite(&self.pool)?, id).await,
            DatabaseDriver::Mysql => get_post_by_id_mysql(mysql(&self.pool)?, id).await,
        }
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(EXISTS_BY_SLUG_SQL)
                .bind(slug)
                .fetch_one(sqlite(&self.pool)?)
                .await
                .context("Failed to check slug")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(EXISTS_BY_SLUG_SQL)
                .bind(slug)
                .fetch_one(mysql(&self.pool)?)
                .await
                .context("Failed to check slug")?
                .get("count"),
        };
        Ok(count > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(COUNT_SQL)
                .fetch_one(sqlite(&self.pool)?)
                .await
                .context("Failed to count posts")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(COUNT_SQL)
                .fetch_one(mysql(&self.pool)?)
                .await
                .context("Failed to count posts")?
                .get("count"),
        };
        Ok(count)
    }

    async fn list_latest_with_author(&self) -> Result<Vec<PostWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_latest_with_author_sqlite(sqlite(&self.pool)?).await,
            DatabaseDriver::Mysql => list_latest_with_author_mysql(mysql(&self.pool)?).await,
        }
    }
}

const POST_COLUMNS: &str = "id, title, slug, body, author_id, created_at, updated_at";

const EXISTS_BY_SLUG_SQL: &str = "SELECT COUNT(*) AS count FROM posts WHERE slug = ?";

const COUNT_SQL: &str = "SELECT COUNT(*) AS count FROM posts";

// Author columns are aliased so they never collide with the post's own.
// Only the public author fields are selected.
const LATEST_WITH_AUTHOR_SQL: &str = r#"
    SELECT p.id, p.title, p.slug, p.body, p.author_id, p.created_at, p.updated_at,
           u.id AS author_ref_id, u.name AS author_name
    FROM posts p
    LEFT JOIN users u ON u.id = p.author_id
    ORDER BY p.created_at DESC, p.id DESC
"#;

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_post_sqlite(pool: &SqlitePool, input: &CreatePostInput) -> Result<Post> {
    let created_at = input.created_at.unwrap_or_else(Utc::now);
    let slug = input.resolved_slug();

    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, slug, body, author_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&slug)
    .bind(&input.body)
    .bind(input.author_id)
    .bind(created_at)
    .bind(created_at)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        id: result.last_insert_rowid(),
        title: input.title.clone(),
        slug,
        body: input.body.clone(),
        author_id: input.author_id,
        created_at,
        updated_at: created_at,
    })
}

async fn get_post_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by ID")?;

    Ok(row.map(|r| row_to_post_sqlite(&r)))
}

async fn list_latest_with_author_sqlite(pool: &SqlitePool) -> Result<Vec<PostWithAuthor>> {
    let rows = sqlx::query(LATEST_WITH_AUTHOR_SQL)
        .fetch_all(pool)
        .await
        .context("Failed to list posts with authors")?;

    Ok(rows
        .iter()
        .map(|row| {
            let author = row
                .get::<Option<i64>, _>("author_ref_id")
                .map(|id| Author {
                    id,
                    name: row.get("author_name"),
                });
            PostWithAuthor::new(row_to_post_sqlite(row), author)
        })
        .collect())
}

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        body: row.get("body"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_post_mysql(pool: &MySqlPool, input: &CreatePostInput) -> Result<Post> {
    let created_at = input.created_at.unwrap_or_else(Utc::now);
    let slug = input.resolved_slug();

    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, slug, body, author_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&slug)
    .bind(&input.body)
    .bind(input.author_id)
    .bind(created_at)
    .bind(created_at)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        id: result.last_insert_id() as i64,
        title: input.title.clone(),
        slug,
        body: input.body.clone(),
        author_id: input.author_id,
        created_at,
        updated_at: created_at,
    })
}

async fn get_post_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by ID")?;

    Ok(row.map(|r| row_to_post_mysql(&r)))
}

async fn list_latest_with_author_mysql(pool: &MySqlPool) -> Result<Vec<PostWithAuthor>> {
    let rows = sqlx::query(LATEST_WITH_AUTHOR_SQL)
        .fetch_all(pool)
        .await
        .context("Failed to list posts with authors")?;

    Ok(rows
        .iter()
        .map(|row| {
            let author = row
                .get::<Option<i64>, _>("author_ref_id")
                .map(|id| Author {
                    id,
                    name: row.get("author_name"),
                });
            PostWithAuthor::new(row_to_post_mysql(row), author)
        })
        .collect())
}

fn row_to_post_mysql(row: &sqlx::mysql::MySqlRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        body: row.get("body"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use quire::api::{build_router, AppState};
use quire::cache::create_cache;
use quire::config::{CacheConfig, SiteConfig};
use quire::db::repositories::{SqlxPostRepository, SqlxUserRepository};
use quire::db::{create_test_pool, migrations, DynDatabasePool};
use quire::models::{CreatePostInput, CreateUserInput, Post, User};
use quire::services::{PostService, UserService};
use quire::theme::ThemeEngine;

pub struct TestApp {
    pub server: TestServer,
    pub pool: DynDatabasePool,
    pub post_service: Arc<PostService>,
    pub user_service: Arc<UserService>,
    pub themes_dir: TempDir,
}

/// Build the full router over an in-memory database.
///
/// `theme_files` are written to `<themes>/default/` before the theme
/// engine loads, so they override the built-in templates.
pub async fn spawn_app(theme_files: &[(&str, &str)], hot_reload: bool) -> TestApp {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let post_service = Arc::new(PostService::new(
        SqlxPostRepository::boxed(pool.clone()),
        user_repo.clone(),
        create_cache(&CacheConfig::default()),
    ));
    let user_service = Arc::new(UserService::new(user_repo));

    let themes_dir = TempDir::new().expect("Failed to create themes dir");
    for (name, content) in theme_files {
        write_theme_file(themes_dir.path(), name, content);
    }
    let theme_engine = ThemeEngine::new(themes_dir.path(), "default").expect("Failed to load theme");

    let site = SiteConfig {
        name: "Test Blog".to_string(),
        description: "Posts for testing".to_string(),
    };

    let state = AppState {
        pool: pool.clone(),
        post_service: post_service.clone(),
        theme_engine: Arc::new(RwLock::new(theme_engine)),
        site: Arc::new(site),
        hot_reload,
    };

    let server = TestServer::new(build_router(state, "*")).expect("Failed to start test server");

    TestApp {
        server,
        pool,
        post_service,
        user_service,
        themes_dir,
    }
}

pub fn write_theme_file(themes_dir: &Path, name: &str, content: &str) {
    let path = themes_dir.join("default").join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

impl TestApp {
    pub async fn author(&self, name: &str) -> User {
        self.user_service
            .create_user(CreateUserInput::new(
                name,
                format!("{}@example.com", name.to_lowercase()),
            ))
            .await
            .expect("Failed to create author")
    }

    pub async fn post(&self, title: &str, author: &User, created_at: DateTime<Utc>) -> Post {
        self.post_service
            .create_post(
                CreatePostInput::new(title, format!("Body of {}", title), author.id)
                    .with_created_at(created_at),
            )
            .await
            .expect("Failed to create post")
    }
}

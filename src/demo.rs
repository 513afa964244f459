//! Sample content for demo builds (`--features demo`)

use anyhow::Result;
use chrono::{Duration, Utc};

use crate::models::{CreatePostInput, CreateUserInput};
use crate::services::{PostService, UserService};

const DEMO_AUTHORS: &[(&str, &str)] = &[
    ("Ada Lovelace", "ada@quire.local"),
    ("Grace Hopper", "grace@quire.local"),
];

const DEMO_POSTS: &[(&str, &str, usize)] = &[
    (
        "Notes on the Analytical Engine",
        "The engine weaves algebraic patterns just as the loom weaves flowers and leaves.",
        0,
    ),
    (
        "Finding the first bug",
        "A moth was found trapped in relay 70, panel F. First actual case of bug being found.",
        1,
    ),
    (
        "Welcome to Quire",
        "This is a demo post. Every post shows up here, newest first.",
        0,
    ),
];

/// Create the demo authors and posts unless the store already has posts.
///
/// Returns the number of posts created.
pub async fn seed_demo_content(
    post_service: &PostService,
    user_service: &UserService,
) -> Result<usize> {
    if post_service.count().await? > 0 {
        return Ok(0);
    }

    let mut authors = Vec::with_capacity(DEMO_AUTHORS.len());
    for (name, email) in DEMO_AUTHORS {
        let author = match user_service.find_by_email(email).await? {
            Some(user) => user,
            None => {
                user_service
                    .create_user(CreateUserInput::new(*name, *email))
                    .await?
            }
        };
        authors.push(author);
    }

    // Oldest first, one day apart, ending now
    let now = Utc::now();
    let count = DEMO_POSTS.len();
    for (i, (title, body, author_idx)) in DEMO_POSTS.iter().enumerate() {
        let created_at = now - Duration::days((count - 1 - i) as i64);
        post_service
            .create_post(
                CreatePostInput::new(*title, *body, authors[*author_idx].id)
                    .with_created_at(created_at),
            )
            .await?;
    }

    tracing::info!("Demo mode: seeded {} posts", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::{SqlxPostRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};

    #[tokio::test]
    async fn test_seed_demo_content_once() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let post_service = PostService::new(
            SqlxPostRepository::boxed(pool.clone()),
            user_repo.clone(),
            create_cache(&CacheConfig::default()),
        );
        let user_service = UserService::new(user_repo);

        assert_eq!(
            seed_demo_content(&post_service, &user_service).await.unwrap(),
            DEMO_POSTS.len()
        );
        assert_eq!(seed_demo_content(&post_service, &user_service).await.unwrap(), 0);

        let posts = post_service.latest_with_author().await.unwrap();
        assert_eq!(posts[0].post.title, "Welcome to Quire");
        assert!(posts.iter().all(|p| p.author.is_some()));
    }
}

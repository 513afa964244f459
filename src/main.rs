//! Quire - a small server-rendered blog

use anyhow::Result;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::{
    api::{self, AppState},
    cache::create_cache,
    config::Config,
    db::{
        self,
        repositories::{SqlxPostRepository, SqlxUserRepository},
    },
    services::PostService,
    theme::ThemeEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quire=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Quire...");

    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    let applied = db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed ({} applied)", applied);

    let cache = create_cache(&config.cache);
    tracing::info!("Cache initialized (ttl {}s)", config.cache.ttl_seconds);

    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let post_service = Arc::new(PostService::new(
        SqlxPostRepository::boxed(pool.clone()),
        user_repo.clone(),
        cache,
    ));

    #[cfg(feature = "demo")]
    {
        let user_service = quire::services::UserService::new(user_repo);
        quire::demo::seed_demo_content(&post_service, &user_service).await?;
    }

    let theme_engine = ThemeEngine::new(&config.theme.path, &config.theme.active)?;
    tracing::info!("Theme engine initialized: {}", theme_engine.get_current_theme());

    let state = AppState {
        pool: pool.clone(),
        post_service,
        theme_engine: Arc::new(RwLock::new(theme_engine)),
        site: Arc::new(config.site.clone()),
        hot_reload: config.theme.hot_reload,
    };

    let app = api::build_router(state, &config.server.cors_origin);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

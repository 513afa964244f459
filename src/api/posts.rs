//! Post listing handlers

use axum::{extract::State, http::Uri, response::Html, Json};
use tera::Context as TeraContext;

use super::error::{ApiError, PageError};
use super::responses::PostListResponse;
use super::state::AppState;
use crate::theme::POSTS_INDEX_TEMPLATE;

/// GET / - every post, newest first, with its author, rendered as HTML
pub async fn index(State(state): State<AppState>, uri: Uri) -> Result<Html<String>, PageError> {
    let posts = state.post_service.latest_with_author().await?;

    let mut context = TeraContext::new();
    context.insert("posts", &posts);
    let standard_vars = state.standard_vars(uri.path());

    if state.hot_reload {
        state
            .theme_engine
            .write()
            .map_err(|e| PageError::Lock(e.to_string()))?
            .reload_templates()?;
    }

    let theme_engine = state
        .theme_engine
        .read()
        .map_err(|e| PageError::Lock(e.to_string()))?;
    let html =
        theme_engine.render_with_standard_vars(POSTS_INDEX_TEMPLATE, &context, &standard_vars)?;

    Ok(Html(html))
}

/// GET /api/v1/posts - the same listing as JSON
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<PostListResponse>, ApiError> {
    let posts = state.post_service.latest_with_author().await?;
    Ok(Json(posts.into()))
}

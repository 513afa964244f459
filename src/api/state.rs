//! Shared application state

use chrono::{Datelike, Utc};
use std::sync::{Arc, RwLock};

use crate::config::SiteConfig;
use crate::db::DynDatabasePool;
use crate::services::PostService;
use crate::theme::{StandardTemplateVars, ThemeEngine};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub post_service: Arc<PostService>,
    pub theme_engine: Arc<RwLock<ThemeEngine>>,
    pub site: Arc<SiteConfig>,
    /// Re-read templates from disk before each page render
    pub hot_reload: bool,
}

impl AppState {
    /// Standard template variables for a page at `request_path`
    pub fn standard_vars(&self, request_path: &str) -> StandardTemplateVars {
        StandardTemplateVars {
            site_name: self.site.name.clone(),
            site_description: self.site.description.clone(),
            request_path: request_path.to_string(),
            year: Utc::now().year(),
        }
    }
}

//! Quire - a small server-rendered blog
//!
//! The front page lists every post, newest first, with its author loaded,
//! rendered through a Tera theme. The same listing is available as JSON.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
#[cfg(feature = "demo")]
pub mod demo;
pub mod models;
pub mod services;
pub mod theme;

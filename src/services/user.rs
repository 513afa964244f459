//! User service
//!
//! Creates and looks up the users posts are attributed to.

use crate::db::repositories::{is_unique_violation, UserRepository};
use crate::models::{CreateUserInput, User};
use anyhow::Context;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, UserServiceError> {
        let input = CreateUserInput::new(input.name.trim(), input.email.trim());

        if input.name.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }
        if !is_plausible_email(&input.email) {
            return Err(UserServiceError::ValidationError(format!(
                "Invalid email address: {}",
                input.email
            )));
        }

        if self
            .repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::DuplicateEmail(input.email));
        }

        // A concurrent insert can still win the race past the check above
        let user = match self.repo.create(&input).await {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(UserServiceError::DuplicateEmail(input.email))
            }
            Err(e) => return Err(e.context("Failed to create user").into()),
        };
        tracing::info!("Created user {} <{}>", user.id, user.email);

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, UserServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or_else(|| UserServiceError::NotFound(id.to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self
            .repo
            .get_by_email(email)
            .await
            .context("Failed to get user by email")?)
    }
}

/// Something before and after a single `@`, with a dot in the domain.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

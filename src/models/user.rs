//! User model
//!
//! A user is the author a post belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Display name shown next to posts
    pub name: String,
    /// Email address (unique)
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The public face of a user, as shown next to their posts.
///
/// Leaves out the email address and anything else that is not meant for
/// anonymous readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
}

impl CreateUserInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

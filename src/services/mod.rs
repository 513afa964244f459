//! Services layer - Business logic
//!
//! Services are responsible for:
//! - Implementing business rules
//! - Coordinating between repositories and cache
//! - Handling validation and error cases

pub mod post;
pub mod user;

pub use post::{PostService, PostServiceError};
pub use user::{UserService, UserServiceError};

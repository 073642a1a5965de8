//! Wire types returned by the backend.

use serde::{Deserialize, Serialize};

/// Post identifier assigned by the backend
pub type PostId = u64;

/// A post as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Username of the author
    pub creator: String,
    pub likes_count: u64,
    /// Whether the requesting user already likes this post
    pub is_user_like: bool,
}

/// Session issued by the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub email: String,
    pub token: String,
}

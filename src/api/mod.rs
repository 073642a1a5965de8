//! Access to the social-network REST API.
//!
//! The orchestrator only talks to the backend through the [`SocialApi`]
//! trait. [`HttpApi`] is the production implementation over a blocking
//! `reqwest` client; tests provide in-memory implementations.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::HttpApi;
pub use endpoints::Endpoints;
pub use types::{LoginResponse, Post, PostId};

use crate::generator::Credentials;

/// Status the backend answers a successful signup with
pub const SIGNUP_CREATED: u16 = 201;

/// Whether `status` is in the 2xx range
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Errors raised while talking to the backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Operations the bot performs against the backend.
///
/// Every call except `signup` and `login` is authenticated with the token
/// issued at login.
pub trait SocialApi {
    /// Register a new account. Returns the HTTP status; only
    /// [`SIGNUP_CREATED`] means the account exists now.
    fn signup(&self, credentials: &Credentials) -> Result<u16, ApiError>;

    /// Exchange credentials for a session token
    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// All posts, with like counts and the caller's own like flag
    fn list_posts(&self, token: &str) -> Result<Vec<Post>, ApiError>;

    /// Publish a post as the token's owner
    fn create_post(&self, token: &str, title: &str, body: &str) -> Result<(), ApiError>;

    /// Posts authored by `username`
    fn list_user_posts(&self, token: &str, username: &str) -> Result<Vec<Post>, ApiError>;

    /// Like the post, or unlike it if the caller already does. Returns the
    /// HTTP status.
    fn toggle_like(&self, token: &str, post_id: PostId) -> Result<u16, ApiError>;
}

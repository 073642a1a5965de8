//! URL construction for the backend routes.

use crate::config::RunConfig;

use super::PostId;

/// Absolute URLs of every route the bot uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    site_address: String,
    login_path: String,
    signup_path: String,
    posts_path: String,
    users_path: String,
}

impl Endpoints {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            site_address: config.site_address.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            signup_path: config.signup_path.clone(),
            posts_path: config.posts_path.clone(),
            users_path: config.users_path.clone(),
        }
    }

    pub fn signup(&self) -> String {
        format!("{}/{}", self.site_address, self.signup_path)
    }

    pub fn login(&self) -> String {
        format!("{}/{}", self.site_address, self.login_path)
    }

    pub fn posts(&self) -> String {
        format!("{}/{}", self.site_address, self.posts_path)
    }

    /// Route that toggles the caller's like on one post
    pub fn post(&self, post_id: PostId) -> String {
        format!("{}/{}{}/", self.site_address, self.posts_path, post_id)
    }

    pub fn user_posts(&self, username: &str) -> String {
        format!(
            "{}/{}{}/{}",
            self.site_address, self.users_path, username, self.posts_path
        )
    }
}

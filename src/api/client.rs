//! Blocking HTTP implementation of [`SocialApi`].

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

use crate::config::RunConfig;
use crate::generator::Credentials;

use super::{ApiError, Endpoints, LoginResponse, Post, PostId, SocialApi};

/// Client for the social-network backend
#[derive(Debug, Clone)]
pub struct HttpApi {
    endpoints: Endpoints,
    client: Client,
}

impl HttpApi {
    /// Build a client for the routes in `config`. Without a configured
    /// timeout a request waits for the server indefinitely.
    pub fn new(config: &RunConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                url: config.site_address.clone(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            endpoints: Endpoints::new(config),
            client,
        })
    }

    fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        request.send().map_err(|e| ApiError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn expect_success(url: &str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }

    fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, ApiError> {
        let response = Self::expect_success(url, response)?;
        response.json().map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

fn token_header(token: &str) -> String {
    format!("Token {}", token)
}

impl SocialApi for HttpApi {
    fn signup(&self, credentials: &Credentials) -> Result<u16, ApiError> {
        let url = self.endpoints.signup();
        debug!("POST {} for {}", url, credentials.email);
        let response = self.send(&url, self.client.post(&url).form(credentials))?;
        Ok(response.status().as_u16())
    }

    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.endpoints.login();
        debug!("POST {} for {}", url, credentials.email);
        let response = self.send(&url, self.client.post(&url).form(credentials))?;
        Self::decode(&url, response)
    }

    fn list_posts(&self, token: &str) -> Result<Vec<Post>, ApiError> {
        let url = self.endpoints.posts();
        debug!("GET {}", url);
        let request = self.client.get(&url).header(AUTHORIZATION, token_header(token));
        let response = self.send(&url, request)?;
        Self::decode(&url, response)
    }

    fn create_post(&self, token: &str, title: &str, body: &str) -> Result<(), ApiError> {
        let url = self.endpoints.posts();
        debug!("POST {} titled {}", url, title);
        let request = self
            .client
            .post(&url)
            .header(AUTHORIZATION, token_header(token))
            .form(&[("title", title), ("body", body)]);
        let response = self.send(&url, request)?;
        Self::expect_success(&url, response).map(|_| ())
    }

    fn list_user_posts(&self, token: &str, username: &str) -> Result<Vec<Post>, ApiError> {
        let url = self.endpoints.user_posts(username);
        debug!("GET {}", url);
        let request = self.client.get(&url).header(AUTHORIZATION, token_header(token));
        let response = self.send(&url, request)?;
        Self::decode(&url, response)
    }

    fn toggle_like(&self, token: &str, post_id: PostId) -> Result<u16, ApiError> {
        let url = self.endpoints.post(post_id);
        debug!("POST {}", url);
        let request = self.client.post(&url).header(AUTHORIZATION, token_header(token));
        let response = self.send(&url, request)?;
        Ok(response.status().as_u16())
    }
}

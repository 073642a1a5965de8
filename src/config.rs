//! Run configuration.
//!
//! Settings are read from a loosely typed source (a YAML mapping with
//! SCREAMING_SNAKE_CASE keys) through [`SettingsSource::get_rule`], which never
//! fails, and then frozen into a validated [`RunConfig`] once per run.

use log::warn;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::time::Duration;

use crate::generator::EMAIL_POOL;

pub const SITE_ADDRESS: &str = "SITE_ADDRESS";
pub const LOGIN_PATH: &str = "LOGIN_PATH";
pub const SIGNUP_PATH: &str = "SIGNUP_PATH";
pub const POSTS_PATH: &str = "POSTS_PATH";
pub const USERS_PATH: &str = "USERS_PATH";
pub const NUMBER_OF_USERS: &str = "NUMBER_OF_USERS";
pub const MAX_POSTS_PER_USER: &str = "MAX_POSTS_PER_USER";
pub const MAX_LIKES_PER_USER: &str = "MAX_LIKES_PER_USER";
pub const MAX_SIGNUP_ATTEMPTS: &str = "MAX_SIGNUP_ATTEMPTS";
pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";

/// Number of users to sign up when the settings do not say otherwise
pub const DEFAULT_NUMBER_OF_USERS: u32 = 3;
/// Upper bound of the per-user post draw
pub const DEFAULT_MAX_POSTS_PER_USER: u32 = 5;
/// Like budget of each user
pub const DEFAULT_MAX_LIKES_PER_USER: u32 = 3;
/// Signup attempts allowed per user before giving up
pub const DEFAULT_MAX_SIGNUP_ATTEMPTS: u32 = 3 * EMAIL_POOL.len() as u32;

/// Errors raised while turning settings into a run configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0} is not set")]
    MissingField(&'static str),
}

/// Return `value` if present, otherwise `default`.
pub fn resolve<T>(value: Option<T>, default: T) -> T {
    value.unwrap_or(default)
}

/// Key/value settings the run configuration is resolved from.
///
/// An absent source behaves like an empty one: every lookup falls back to
/// the supplied default.
#[derive(Debug, Clone, Default)]
pub struct SettingsSource {
    values: Option<Mapping>,
}

impl SettingsSource {
    /// A source with no backing settings at all
    pub fn absent() -> Self {
        Self { values: None }
    }

    /// Wrap an already-parsed mapping
    pub fn from_mapping(values: Mapping) -> Self {
        Self { values: Some(values) }
    }

    /// Whether any settings were loaded
    pub fn is_present(&self) -> bool {
        self.values.is_some()
    }

    /// Set or replace a single key, creating the backing mapping if needed.
    pub fn set(&mut self, name: &str, value: Value) {
        self.values
            .get_or_insert_with(Mapping::new)
            .insert(Value::String(name.to_string()), value);
    }

    /// Look up `name`, falling back to `default` when the source is absent,
    /// the key is undefined, or the stored value cannot be read as `T`.
    pub fn get_rule<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        let value = self
            .values
            .as_ref()
            .and_then(|values| values.get(name))
            .and_then(|raw| serde_yaml::from_value::<T>(raw.clone()).ok());
        resolve(value, default)
    }
}

/// Validated, immutable parameters of one bot run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub site_address: String,
    pub login_path: String,
    pub signup_path: String,
    pub posts_path: String,
    pub users_path: String,
    pub number_of_users: u32,
    pub max_posts_per_user: u32,
    pub max_likes_per_user: u32,
    pub max_signup_attempts: u32,
    pub request_timeout: Option<Duration>,
}

impl RunConfig {
    /// Resolve every field from `settings` and verify the required ones.
    pub fn from_settings(settings: &SettingsSource) -> Result<Self, ConfigError> {
        let required = |name: &'static str| settings.get_rule::<Option<String>>(name, None);

        let timeout: Option<humantime_serde::Serde<Duration>> =
            settings.get_rule(REQUEST_TIMEOUT, None);

        let config = Self {
            site_address: required(SITE_ADDRESS).unwrap_or_default(),
            login_path: required(LOGIN_PATH).unwrap_or_default(),
            signup_path: required(SIGNUP_PATH).unwrap_or_default(),
            posts_path: required(POSTS_PATH).unwrap_or_default(),
            users_path: required(USERS_PATH).unwrap_or_default(),
            number_of_users: settings.get_rule(NUMBER_OF_USERS, DEFAULT_NUMBER_OF_USERS),
            max_posts_per_user: at_least_one(
                MAX_POSTS_PER_USER,
                settings.get_rule(MAX_POSTS_PER_USER, DEFAULT_MAX_POSTS_PER_USER),
            ),
            max_likes_per_user: settings.get_rule(MAX_LIKES_PER_USER, DEFAULT_MAX_LIKES_PER_USER),
            max_signup_attempts: at_least_one(
                MAX_SIGNUP_ATTEMPTS,
                settings.get_rule(MAX_SIGNUP_ATTEMPTS, DEFAULT_MAX_SIGNUP_ATTEMPTS),
            ),
            request_timeout: timeout.map(|t| t.into_inner()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the address and all endpoint paths are set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            (SITE_ADDRESS, &self.site_address),
            (LOGIN_PATH, &self.login_path),
            (SIGNUP_PATH, &self.signup_path),
            (POSTS_PATH, &self.posts_path),
            (USERS_PATH, &self.users_path),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(name));
            }
        }
        Ok(())
    }
}

fn at_least_one(name: &str, value: u32) -> u32 {
    if value == 0 {
        warn!("{} is 0, using 1 instead", name);
        1
    } else {
        value
    }
}

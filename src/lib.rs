//! # Socialbot - Activity bot for a social-network REST API
//!
//! This library drives synthetic traffic against a running social-network
//! backend: it signs up users, has them publish posts and then has them like
//! each other's posts.
//!
//! ## Overview
//!
//! A run goes through four phases, strictly in order:
//!
//! 1. **Config load**: the address and endpoint paths must be set; numeric
//!    limits fall back to defaults.
//! 2. **Signup**: `NUMBER_OF_USERS` random identities are registered (retrying
//!    on collisions) and logged in.
//! 3. **Post creation**: each user publishes between 1 and
//!    `MAX_POSTS_PER_USER` posts.
//! 4. **Liking**: users, heaviest posters first, like up to
//!    `MAX_LIKES_PER_USER` posts of other users. The run stops early once no
//!    post is left without likes, or only the acting user's posts remain.
//!
//! ## Architecture
//!
//! - `generator`: random usernames, passwords, emails and post text
//! - `config`: settings lookup with defaults and the validated `RunConfig`
//! - `config_loader`: YAML settings files and CLI overrides
//! - `api`: the `SocialApi` trait and its blocking HTTP implementation
//! - `orchestrator`: the phase machine and the like selection policy
//! - `report`: run counters and JSON output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use socialbot::api::HttpApi;
//! use socialbot::config::RunConfig;
//! use socialbot::config_loader;
//! use socialbot::orchestrator::ActivityBot;
//! use std::path::Path;
//!
//! let settings = config_loader::load_settings(Path::new("bot_settings.yaml"))?;
//! let config = RunConfig::from_settings(&settings)?;
//! let api = HttpApi::new(&config)?;
//!
//! let mut bot = ActivityBot::new(&config, &api, StdRng::from_entropy());
//! let report = bot.run()?;
//! println!("{} likes", report.likes);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Settings Format
//!
//! ```yaml
//! SITE_ADDRESS: "http://127.0.0.1:8000"
//! LOGIN_PATH: "login/"
//! SIGNUP_PATH: "signup/"
//! POSTS_PATH: "posts/"
//! USERS_PATH: "users/"
//! NUMBER_OF_USERS: 3
//! MAX_POSTS_PER_USER: 5
//! MAX_LIKES_PER_USER: 3
//! ```
//!
//! ## Error Handling
//!
//! Library modules return typed errors (`ConfigError`, `ApiError`,
//! `BotError`); file loading and the binary use `color_eyre` for reporting
//! with context.

pub mod api;
pub mod config;
pub mod config_loader;
pub mod generator;
pub mod orchestrator;
pub mod report;

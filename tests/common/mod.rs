//! In-memory stand-in for the social-network backend.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use socialbot::api::{ApiError, LoginResponse, Post, PostId, SocialApi, SIGNUP_CREATED};
use socialbot::config::{RunConfig, DEFAULT_MAX_SIGNUP_ATTEMPTS};
use socialbot::generator::Credentials;

/// One recorded API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Signup(String),
    Login(String),
    ListPosts(String),
    CreatePost(String),
    ListUserPosts { caller: String, creator: String },
    ToggleLike { caller: String, post_id: PostId },
}

#[derive(Debug)]
struct StoredPost {
    id: PostId,
    title: String,
    body: String,
    creator: String,
    likers: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct State {
    /// email -> (username, password)
    accounts: HashMap<String, (String, String)>,
    /// token -> username
    sessions: HashMap<String, String>,
    posts: Vec<StoredPost>,
    calls: Vec<Call>,
}

/// Backend keyed by email like the real one: a second signup with the same
/// address is rejected with 400.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: RefCell<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and posts that exist before the bot starts
    pub fn seed_account(&self, email: &str, username: &str, titles: &[&str]) {
        let mut state = self.state.borrow_mut();
        state
            .accounts
            .insert(email.to_string(), (username.to_string(), "secret".to_string()));
        for title in titles {
            let id = state.posts.len() as PostId + 1;
            state.posts.push(StoredPost {
                id,
                title: title.to_string(),
                body: String::new(),
                creator: username.to_string(),
                likers: BTreeSet::new(),
            });
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| matches(c)).count()
    }

    /// (post creator, liker) for every like currently held
    pub fn likes(&self) -> Vec<(String, String)> {
        let state = self.state.borrow();
        let mut likes = Vec::new();
        for post in &state.posts {
            for liker in &post.likers {
                likes.push((post.creator.clone(), liker.clone()));
            }
        }
        likes
    }

    pub fn post_count(&self) -> usize {
        self.state.borrow().posts.len()
    }

    fn caller(&self, token: &str) -> Result<String, ApiError> {
        self.state
            .borrow()
            .sessions
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                url: "fake://".to_string(),
                status: 401,
            })
    }

    fn view(post: &StoredPost, caller: &str) -> Post {
        Post {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            creator: post.creator.clone(),
            likes_count: post.likers.len() as u64,
            is_user_like: post.likers.contains(caller),
        }
    }
}

impl SocialApi for FakeBackend {
    fn signup(&self, credentials: &Credentials) -> Result<u16, ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Signup(credentials.email.clone()));
        if state.accounts.contains_key(&credentials.email) {
            return Ok(400);
        }
        state.accounts.insert(
            credentials.email.clone(),
            (credentials.username.clone(), credentials.password.clone()),
        );
        Ok(SIGNUP_CREATED)
    }

    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Login(credentials.email.clone()));
        let (username, password) = state
            .accounts
            .get(&credentials.email)
            .cloned()
            .ok_or_else(|| ApiError::Status { url: "fake://login/".to_string(), status: 400 })?;
        if password != credentials.password {
            return Err(ApiError::Status { url: "fake://login/".to_string(), status: 400 });
        }
        let token = format!("token-{}", username);
        state.sessions.insert(token.clone(), username.clone());
        Ok(LoginResponse {
            username,
            email: credentials.email.clone(),
            token,
        })
    }

    fn list_posts(&self, token: &str) -> Result<Vec<Post>, ApiError> {
        let caller = self.caller(token)?;
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ListPosts(caller.clone()));
        Ok(state.posts.iter().map(|p| Self::view(p, &caller)).collect())
    }

    fn create_post(&self, token: &str, title: &str, body: &str) -> Result<(), ApiError> {
        let caller = self.caller(token)?;
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::CreatePost(caller.clone()));
        let id = state.posts.len() as PostId + 1;
        state.posts.push(StoredPost {
            id,
            title: title.to_string(),
            body: body.to_string(),
            creator: caller,
            likers: BTreeSet::new(),
        });
        Ok(())
    }

    fn list_user_posts(&self, token: &str, username: &str) -> Result<Vec<Post>, ApiError> {
        let caller = self.caller(token)?;
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ListUserPosts {
            caller: caller.clone(),
            creator: username.to_string(),
        });
        Ok(state
            .posts
            .iter()
            .filter(|p| p.creator == username)
            .map(|p| Self::view(p, &caller))
            .collect())
    }

    fn toggle_like(&self, token: &str, post_id: PostId) -> Result<u16, ApiError> {
        let caller = self.caller(token)?;
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ToggleLike {
            caller: caller.clone(),
            post_id,
        });
        let Some(post) = state.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(404);
        };
        if !post.likers.remove(&caller) {
            post.likers.insert(caller);
        }
        Ok(200)
    }
}

pub fn run_config(users: u32, max_posts: u32, max_likes: u32) -> RunConfig {
    RunConfig {
        site_address: "http://127.0.0.1:8000".to_string(),
        login_path: "login/".to_string(),
        signup_path: "signup/".to_string(),
        posts_path: "posts/".to_string(),
        users_path: "users/".to_string(),
        number_of_users: users,
        max_posts_per_user: max_posts,
        max_likes_per_user: max_likes,
        max_signup_attempts: DEFAULT_MAX_SIGNUP_ATTEMPTS,
        request_timeout: None,
    }
}

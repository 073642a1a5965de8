//! Activity orchestrator.
//!
//! Drives one bot run through its phases in order: configuration check,
//! signup, post creation and liking. Phases never go backwards; the liking
//! phase may end the run early when no productive like is left anywhere.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::api::{self, ApiError, Post, SocialApi, SIGNUP_CREATED};
use crate::config::{ConfigError, RunConfig};
use crate::generator::{self, Credentials};
use crate::report::{RunReport, StopReason};

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Every address in the email pool is taken after {attempts} signup attempts")]
    EmailPoolExhausted { attempts: u32 },

    #[error("No signup succeeded within {attempts} attempts")]
    SignupAttemptsExceeded { attempts: u32 },
}

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    ConfigLoad,
    Signup,
    PostCreation,
    Liking,
    Finished,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::ConfigLoad => "config load",
            RunPhase::Signup => "signup",
            RunPhase::PostCreation => "post creation",
            RunPhase::Liking => "liking",
            RunPhase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// A user the bot signed up and logged in during this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
    pub num_of_posts: u32,
}

/// Posts nobody has liked yet
pub fn unliked_posts(posts: &[Post]) -> Vec<&Post> {
    posts.iter().filter(|post| post.likes_count == 0).collect()
}

/// Distinct creators of `posts` other than `username`, in sorted order
pub fn candidate_creators(posts: &[Post], username: &str) -> Vec<String> {
    posts
        .iter()
        .map(|post| post.creator.as_str())
        .filter(|creator| *creator != username)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Posts the requesting user has not liked yet
pub fn posts_not_liked_by_user(posts: &[Post]) -> Vec<&Post> {
    posts.iter().filter(|post| !post.is_user_like).collect()
}

/// Bot that generates signup, posting and liking traffic
pub struct ActivityBot<'a, A: SocialApi, R: Rng> {
    config: &'a RunConfig,
    api: &'a A,
    rng: R,
    phase: RunPhase,
    users: Vec<SessionUser>,
    taken_emails: HashSet<String>,
    report: RunReport,
}

impl<'a, A: SocialApi, R: Rng> ActivityBot<'a, A, R> {
    pub fn new(config: &'a RunConfig, api: &'a A, rng: R) -> Self {
        Self {
            config,
            api,
            rng,
            phase: RunPhase::ConfigLoad,
            users: Vec::new(),
            taken_emails: HashSet::new(),
            report: RunReport::start(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn users(&self) -> &[SessionUser] {
        &self.users
    }

    /// Run every phase to completion and return the run report.
    pub fn run(&mut self) -> Result<RunReport, BotError> {
        self.config.validate()?;

        self.enter(RunPhase::Signup);
        self.signup_users()?;

        self.enter(RunPhase::PostCreation);
        self.create_users_posts()?;

        self.enter(RunPhase::Liking);
        let reason = self.like_user_posts()?;

        self.enter(RunPhase::Finished);
        self.report.finish(reason);
        info!("Bot run finished: {}", reason);
        Ok(self.report.clone())
    }

    fn enter(&mut self, phase: RunPhase) {
        debug_assert!(phase > self.phase, "phases only move forward");
        info!("Entering {} phase", phase);
        self.phase = phase;
    }

    fn signup_users(&mut self) -> Result<(), BotError> {
        info!("Registering {} users", self.config.number_of_users);

        for _ in 0..self.config.number_of_users {
            let credentials = self.signup_user()?;
            self.login_user(credentials)?;
        }
        Ok(())
    }

    /// Sign up one fresh identity, retrying on any status other than 201.
    ///
    /// Addresses already tried in this run are never drawn again, so a pool
    /// with every address taken fails after at most one request per address.
    fn signup_user(&mut self) -> Result<Credentials, BotError> {
        let budget = self.config.max_signup_attempts;

        for attempt in 1..=budget {
            let Some(credentials) =
                generator::generate_user_excluding(&mut self.rng, &self.taken_emails)
            else {
                return Err(BotError::EmailPoolExhausted {
                    attempts: self.report.signup_attempts,
                });
            };
            info!("Registering user with mail {} (attempt {})", credentials.email, attempt);
            self.report.signup_attempts += 1;

            let status = self.api.signup(&credentials)?;
            // Either way the address is no longer available to this run
            self.taken_emails.insert(credentials.email.clone());

            if status == SIGNUP_CREATED {
                info!("User with mail {} registered", credentials.email);
                self.report.signups += 1;
                return Ok(credentials);
            }

            warn!(
                "Signup with mail {} rejected with status {}, trying another identity",
                credentials.email, status
            );
        }

        Err(BotError::SignupAttemptsExceeded { attempts: budget })
    }

    fn login_user(&mut self, credentials: Credentials) -> Result<(), BotError> {
        info!("Logging in user with mail {}", credentials.email);
        let session = self.api.login(&credentials)?;
        self.report.logins += 1;

        self.users.push(SessionUser {
            username: session.username,
            email: session.email,
            password: credentials.password,
            token: session.token,
            num_of_posts: 0,
        });
        Ok(())
    }

    fn create_users_posts(&mut self) -> Result<(), BotError> {
        let max_posts = self.config.max_posts_per_user.max(1);

        for user in &mut self.users {
            user.num_of_posts = self.rng.gen_range(1..=max_posts);
            info!("Creating {} posts for user with mail {}", user.num_of_posts, user.email);

            for _ in 0..user.num_of_posts {
                let title = generator::random_letters(&mut self.rng, generator::TITLE_LEN);
                let body = generator::random_letters(&mut self.rng, generator::BODY_LEN);
                self.api.create_post(&user.token, &title, &body)?;
                self.report.record_post(&user.username);
                debug!("User {} created post {}", user.username, title);
            }
        }
        Ok(())
    }

    fn like_user_posts(&mut self) -> Result<StopReason, BotError> {
        // Heaviest posters like first; ties keep signup order
        self.users.sort_by(|a, b| b.num_of_posts.cmp(&a.num_of_posts));

        for index in 0..self.users.len() {
            let user = self.users[index].clone();

            for _ in 0..self.config.max_likes_per_user {
                if let Some(reason) = self.like_one_post(&user)? {
                    warn!("Stopping the bot: {}", reason);
                    return Ok(reason);
                }
            }
            info!("User with mail {} reached max likes", user.email);
        }

        info!("All users reached max likes");
        Ok(StopReason::Completed)
    }

    /// Perform one like for `user`. Returns a stop reason when no like is
    /// possible anywhere, which ends the whole run.
    fn like_one_post(&mut self, user: &SessionUser) -> Result<Option<StopReason>, BotError> {
        let posts = self.api.list_posts(&user.token)?;
        debug!("User with mail {} received {} posts", user.email, posts.len());

        let unliked = unliked_posts(&posts);
        debug!("There are {} posts with no likes", unliked.len());
        if unliked.is_empty() {
            return Ok(Some(StopReason::AllPostsLiked));
        }

        let mut creators = candidate_creators(&posts, &user.username);
        if creators.is_empty() {
            return Ok(Some(StopReason::OnlyOwnPostsUnliked));
        }

        loop {
            let Some(creator) = creators.choose(&mut self.rng).cloned() else {
                return Ok(Some(StopReason::NothingLeftToLike));
            };

            debug!("Requesting the posts of {}", creator);
            let creator_posts = self.api.list_user_posts(&user.token, &creator)?;
            let candidates = posts_not_liked_by_user(&creator_posts);

            match candidates.choose(&mut self.rng) {
                Some(post) => {
                    info!("User {} liking post {} by {}", user.username, post.title, post.creator);
                    let status = self.api.toggle_like(&user.token, post.id)?;
                    if api::is_success(status) {
                        debug!("Like on post {} answered with status {}", post.id, status);
                        self.report.record_like(&user.username);
                    } else {
                        // Still uses up one of the user's likes
                        warn!("Like on post {} rejected with status {}", post.id, status);
                        self.report.record_failed_like();
                    }
                    return Ok(None);
                }
                None => {
                    debug!("User {} already likes every post of {}", user.username, creator);
                    creators.retain(|c| c != &creator);
                }
            }
        }
    }
}

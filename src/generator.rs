//! Random data generation for synthetic users and posts.
//!
//! Every function takes the random source explicitly so that runs can be
//! reproduced from a seed and tests can inject a deterministic generator.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Addresses the backend's identity enrichment service can look up.
///
/// Accounts are keyed by email on the server, so this pool bounds how many
/// distinct users a single backend can ever hold.
pub const EMAIL_POOL: [&str; 10] = [
    "alex@clearbit.com",
    "harlow@clearbit.com",
    "eoghan@intercom.io",
    "brian@airbnb.com",
    "arash@dropbox.com",
    "peter@segment.com",
    "dom@tray.io",
    "john@stripe.com",
    "josh@domo.com",
    "crobbins@cisco.com",
];

/// Length of a post title in letters
pub const TITLE_LEN: usize = 10;
/// Length of a post body in letters
pub const BODY_LEN: usize = 20;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Signup payload for a freshly generated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Generate a complete random identity.
pub fn generate_user<R: Rng>(rng: &mut R) -> Credentials {
    Credentials {
        username: generate_username(rng),
        password: generate_password(rng),
        email: generate_email(rng),
    }
}

/// Generate an identity whose email is not in `taken`.
///
/// Returns `None` once every address of [`EMAIL_POOL`] is taken.
pub fn generate_user_excluding<R: Rng>(
    rng: &mut R,
    taken: &HashSet<String>,
) -> Option<Credentials> {
    let email = generate_email_excluding(rng, taken)?;
    Some(Credentials {
        username: generate_username(rng),
        password: generate_password(rng),
        email,
    })
}

/// Generate a username: 2 lowercase letters, 4 digits, 5 uppercase letters.
pub fn generate_username<R: Rng>(rng: &mut R) -> String {
    patterned_token(rng)
}

/// Generate a password with the same shape as a username.
pub fn generate_password<R: Rng>(rng: &mut R) -> String {
    patterned_token(rng)
}

/// Pick one address from [`EMAIL_POOL`].
pub fn generate_email<R: Rng>(rng: &mut R) -> String {
    // The pool is a non-empty constant
    EMAIL_POOL.choose(rng).copied().unwrap_or(EMAIL_POOL[0]).to_string()
}

/// Pick one address from [`EMAIL_POOL`] that is not in `taken`.
pub fn generate_email_excluding<R: Rng>(rng: &mut R, taken: &HashSet<String>) -> Option<String> {
    let available: Vec<&str> = EMAIL_POOL
        .iter()
        .copied()
        .filter(|email| !taken.contains(*email))
        .collect();
    available.choose(rng).map(|email| email.to_string())
}

/// Random ASCII letters of both cases, used for post titles and bodies.
pub fn random_letters<R: Rng>(rng: &mut R, len: usize) -> String {
    draw(rng, LETTERS, len)
}

fn patterned_token<R: Rng>(rng: &mut R) -> String {
    let mut token = String::with_capacity(11);
    token.push_str(&draw(rng, LOWERCASE, 2));
    token.push_str(&draw(rng, DIGITS, 4));
    token.push_str(&draw(rng, UPPERCASE, 5));
    token
}

fn draw<R: Rng>(rng: &mut R, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

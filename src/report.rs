//! Run report.
//!
//! Counters collected while the bot runs, written as JSON on request and
//! summarised in the log at the end of a run.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::Utc;
use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Why the liking phase, and so the run, ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every user used up their like budget
    Completed,
    /// No post with zero likes was left
    AllPostsLiked,
    /// The only creators left were the acting user
    OnlyOwnPostsUnliked,
    /// Every other creator's posts were already liked by the acting user
    NothingLeftToLike,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::Completed => "all users reached their like budget",
            StopReason::AllPostsLiked => "all posts are liked",
            StopReason::OnlyOwnPostsUnliked => "only the acting user's own posts are unliked",
            StopReason::NothingLeftToLike => "the acting user already likes every candidate post",
        };
        f.write_str(text)
    }
}

/// Summary of one bot run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    /// Signup requests sent, including rejected ones
    pub signup_attempts: u32,
    pub signups: u32,
    pub logins: u32,
    pub posts_created: u32,
    pub likes: u32,
    /// Like requests the backend answered with a non-2xx status
    #[serde(default)]
    pub failed_likes: u32,
    /// Posts created per username
    pub posts_by_user: BTreeMap<String, u32>,
    /// Likes given per username
    pub likes_by_user: BTreeMap<String, u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now().to_rfc3339(),
            finished_at: None,
            signup_attempts: 0,
            signups: 0,
            logins: 0,
            posts_created: 0,
            likes: 0,
            failed_likes: 0,
            posts_by_user: BTreeMap::new(),
            likes_by_user: BTreeMap::new(),
            stop_reason: None,
        }
    }

    pub fn record_post(&mut self, username: &str) {
        self.posts_created += 1;
        *self.posts_by_user.entry(username.to_string()).or_insert(0) += 1;
    }

    pub fn record_like(&mut self, username: &str) {
        self.likes += 1;
        *self.likes_by_user.entry(username.to_string()).or_insert(0) += 1;
    }

    pub fn record_failed_like(&mut self) {
        self.failed_likes += 1;
    }

    pub fn finish(&mut self, reason: StopReason) {
        self.stop_reason = Some(reason);
        self.finished_at = Some(Utc::now().to_rfc3339());
    }

    /// Human-readable summary, one line per entry
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Signed up {} users in {} attempts, {} logged in",
                self.signups, self.signup_attempts, self.logins
            ),
            format!("Created {} posts", self.posts_created),
            format!("Liked {} posts", self.likes),
        ];

        if self.failed_likes > 0 {
            lines.push(format!("{} like requests were rejected", self.failed_likes));
        }

        for (username, likes) in &self.likes_by_user {
            lines.push(format!("  {}: {} likes", username, likes));
        }

        if let Some(reason) = self.stop_reason {
            lines.push(format!("Stopped because {}", reason));
        }
        lines
    }
}

/// Write the report as pretty-printed JSON
pub fn write_json_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize run report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write run report to {}", output_path.display()))?;

    log::info!("Run report written to {}", output_path.display());
    Ok(())
}

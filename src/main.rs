use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use socialbot::api::HttpApi;
use socialbot::config::RunConfig;
use socialbot::config_loader::{self, CliOverrides};
use socialbot::orchestrator::ActivityBot;
use socialbot::report::write_json_report;

/// Activity bot that signs up users, posts and likes against a social-network API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML settings file (defaults to ./bot_settings.yaml if present)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override SITE_ADDRESS
    #[arg(long)]
    site_address: Option<String>,

    /// Override NUMBER_OF_USERS
    #[arg(short, long)]
    users: Option<u32>,

    /// Override MAX_POSTS_PER_USER
    #[arg(long)]
    max_posts: Option<u32>,

    /// Override MAX_LIKES_PER_USER
    #[arg(long)]
    max_likes: Option<u32>,

    /// Override any setting, e.g. --set POSTS_PATH=posts/
    #[arg(long = "set", value_name = "KEY=VALUE")]
    assignments: Vec<String>,

    /// Seed for a reproducible run (system entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSON run report to this path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            site_address: self.site_address.clone(),
            users: self.users,
            max_posts: self.max_posts,
            max_likes: self.max_likes,
            assignments: self.assignments.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    info!("Starting socialbot");

    let mut settings = config_loader::load_settings_or_default(args.settings.as_deref())?;
    config_loader::apply_cli_overrides(&mut settings, &args.overrides())?;

    let config = RunConfig::from_settings(&settings).wrap_err("Cannot start the bot run")?;
    info!(
        "Target {} with {} users, up to {} posts and {} likes each",
        config.site_address,
        config.number_of_users,
        config.max_posts_per_user,
        config.max_likes_per_user
    );

    let api = HttpApi::new(&config)?;
    let rng = match args.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let mut bot = ActivityBot::new(&config, &api, rng);
    let report = bot.run().wrap_err("Bot run aborted")?;

    for line in report.summary_lines() {
        info!("{}", line);
    }

    if let Some(path) = &args.report {
        write_json_report(&report, path)?;
    }

    Ok(())
}

use crate::config::{
    SettingsSource, MAX_LIKES_PER_USER, MAX_POSTS_PER_USER, NUMBER_OF_USERS, SITE_ADDRESS,
};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use log::{debug, info};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Settings file picked up from the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "bot_settings.yaml";

/// Load settings from a YAML file whose root is a mapping
pub fn load_settings(settings_path: &Path) -> Result<SettingsSource> {
    info!("Loading settings from: {:?}", settings_path);

    let content = fs::read_to_string(settings_path)
        .wrap_err_with(|| format!("Failed to read settings file '{}'", settings_path.display()))?;

    if content.trim().is_empty() {
        return Ok(SettingsSource::from_mapping(Default::default()));
    }

    let root: Value = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse settings file '{}'", settings_path.display()))?;

    match root {
        Value::Mapping(values) => {
            debug!("Loaded {} settings", values.len());
            Ok(SettingsSource::from_mapping(values))
        }
        Value::Null => Ok(SettingsSource::from_mapping(Default::default())),
        _ => bail!(
            "Settings file '{}' must contain a mapping of KEY: value pairs",
            settings_path.display()
        ),
    }
}

/// Load the explicitly requested settings file, or the default one if it
/// exists in the working directory. No file at all yields an absent source.
pub fn load_settings_or_default(settings_path: Option<&Path>) -> Result<SettingsSource> {
    match settings_path {
        Some(path) => load_settings(path),
        None => {
            let default_path = Path::new(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                load_settings(default_path)
            } else {
                info!("No settings file found, relying on defaults and CLI overrides");
                Ok(SettingsSource::absent())
            }
        }
    }
}

/// CLI arguments that can override settings file values
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub site_address: Option<String>,
    pub users: Option<u32>,
    pub max_posts: Option<u32>,
    pub max_likes: Option<u32>,
    /// Raw `KEY=VALUE` assignments
    pub assignments: Vec<String>,
}

/// Apply CLI overrides on top of the loaded settings
pub fn apply_cli_overrides(settings: &mut SettingsSource, overrides: &CliOverrides) -> Result<()> {
    for assignment in &overrides.assignments {
        let (name, value) = parse_assignment(assignment)?;
        info!("Overriding {} from the command line", name);
        settings.set(&name, value);
    }

    if let Some(site_address) = &overrides.site_address {
        settings.set(SITE_ADDRESS, Value::String(site_address.clone()));
    }

    let limits = [
        (NUMBER_OF_USERS, overrides.users),
        (MAX_POSTS_PER_USER, overrides.max_posts),
        (MAX_LIKES_PER_USER, overrides.max_likes),
    ];
    for (name, value) in limits {
        if let Some(value) = value {
            info!("Overriding {} with {}", name, value);
            settings.set(name, Value::Number(u64::from(value).into()));
        }
    }

    Ok(())
}

/// Split `KEY=VALUE`, reading the value as a YAML scalar so numbers stay numbers
fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let Some((name, raw)) = assignment.split_once('=') else {
        bail!("Expected KEY=VALUE, got '{}'", assignment);
    };

    let name = name.trim();
    if name.is_empty() {
        bail!("Missing key in '{}'", assignment);
    }

    let value = serde_yaml::from_str::<Value>(raw)
        .unwrap_or_else(|_| Value::String(raw.to_string()));

    Ok((name.to_uppercase(), value))
}

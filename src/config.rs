use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};

use crate::charts::DEFAULT_LABEL_FORMAT;
use crate::feedback::DEFAULT_FEEDBACK_DELAY;
use crate::pipeline::{PipelineSettings, DEFAULT_FILTER_DELAY};
use crate::posts::PostStore;
use crate::role::Role;

/// Central configuration loaded from environment variables.
///
/// Everything has a default, so an empty environment runs the dashboard
/// on the built-in sample posts. The .env file is loaded at startup via
/// dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Viewer role (CRISISWATCH_ROLE, default publicHealth)
    pub role: Role,
    /// JSON post file; the built-in sample is used when unset
    pub posts_path: Option<PathBuf>,
    /// Simulated delay before a recompute publishes
    pub filter_delay: Duration,
    /// Simulated feedback submission latency
    pub feedback_delay: Duration,
    /// chrono format for engagement chart labels
    pub label_format: String,
    /// Where `report` writes its files
    pub report_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: Role::default(),
            posts_path: None,
            filter_delay: DEFAULT_FILTER_DELAY,
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
            report_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let role = match env::var("CRISISWATCH_ROLE") {
            Ok(raw) => raw.parse::<Role>()?,
            Err(_) => defaults.role,
        };

        let label_format =
            env::var("CRISISWATCH_DATE_LABEL_FORMAT").unwrap_or(defaults.label_format);
        validate_label_format(&label_format)?;

        Ok(Self {
            role,
            posts_path: env::var("CRISISWATCH_POSTS_PATH").ok().map(PathBuf::from),
            filter_delay: duration_var("CRISISWATCH_FILTER_DELAY_MS")?
                .unwrap_or(defaults.filter_delay),
            feedback_delay: duration_var("CRISISWATCH_FEEDBACK_DELAY_MS")?
                .unwrap_or(defaults.feedback_delay),
            label_format,
            report_dir: env::var("CRISISWATCH_REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.report_dir),
        })
    }

    /// Settings for a dashboard session.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            filter_delay: self.filter_delay,
            label_format: self.label_format.clone(),
        }
    }

    /// Build the post store: the configured JSON file, or the built-in sample.
    pub fn load_store(&self) -> Result<PostStore> {
        match &self.posts_path {
            Some(path) => PostStore::load_json(path)
                .with_context(|| format!("Failed to load posts from {}", path.display())),
            None => Ok(PostStore::sample()),
        }
    }
}

/// Reject chrono format strings that would fail at render time.
fn validate_label_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("CRISISWATCH_DATE_LABEL_FORMAT is not a valid date format: '{format}'");
    }
    Ok(())
}

/// Read an optional millisecond duration from the environment.
fn duration_var(name: &str) -> Result<Option<Duration>> {
    match env::var(name) {
        Ok(raw) => {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{name} must be a number of milliseconds, got '{raw}'"))?;
            Ok(Some(Duration::from_millis(ms)))
        }
        Err(_) => Ok(None),
    }
}

//! Configuration for the release notifier.
//!
//! Configuration is read from a TOML file (`config.toml` by default) and
//! validated eagerly: a config that fails validation aborts the run before any
//! tool is processed.

pub mod source;

pub use source::{
    ChangelogSourceConfig, GithubFeedSourceConfig, HomebrewCaskSourceConfig, SourceConfig,
};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Highest color value a Discord embed accepts (`0xFFFFFF`).
pub const MAX_COLOR: u32 = 16_777_215;

/// Environment variable consulted for the webhook URL when a tool names none.
pub const DEFAULT_WEBHOOK_ENV: &str = "DISCORD_WEBHOOK";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub tools: Vec<ToolConfig>,
    #[serde(default)]
    pub common: CommonConfig,
}

/// Settings shared by every tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommonConfig {
    /// Interval the external scheduler runs the check at (default: 6)
    pub check_interval_hours: u32,

    /// Directory holding the per-tool version cache files (default: ./cache)
    pub cache_directory: PathBuf,

    /// When to record a new version after notifying (default: on_attempt)
    pub cache_policy: CachePolicy,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            check_interval_hours: 6,
            cache_directory: PathBuf::from("./cache"),
            cache_policy: CachePolicy::default(),
        }
    }
}

/// Whether a failed notification still advances the cached version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Record the version once delivery was attempted, whatever the outcome.
    /// A webhook outage then loses that notification instead of repeating it
    /// on every run.
    #[default]
    OnAttempt,
    /// Record the version only when no sink failed and at least one delivered.
    OnDelivery,
}

/// One monitored tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolConfig {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub sources: Vec<SourceConfig>,
    pub notification: NotificationConfig,
}

fn default_enabled() -> bool {
    true
}

impl ToolConfig {
    /// Sources in the order they should be tried.
    ///
    /// Lower priority values come first; equal priorities keep their
    /// declaration order.
    pub fn sources_by_priority(&self) -> Vec<&SourceConfig> {
        let mut sources: Vec<&SourceConfig> = self.sources.iter().collect();
        sources.sort_by_key(|source| source.priority());
        sources
    }
}

/// Discord notification settings for a tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    #[serde(default = "default_webhook_env")]
    pub webhook_env: String,
    pub color: u32,
}

pub fn default_webhook_env() -> String {
    DEFAULT_WEBHOOK_ENV.to_string()
}

impl Config {
    /// Load and validate the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration held in memory.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(ConfigError::InlineParse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine must never see.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tools.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one tool must be configured".into(),
            ));
        }

        if self.common.check_interval_hours < 1 {
            return Err(ConfigError::Invalid(
                "common.check_interval_hours must be at least 1".into(),
            ));
        }

        for tool in &self.tools {
            if tool.name.trim().is_empty() {
                return Err(ConfigError::Invalid("tool name must not be empty".into()));
            }

            if tool.sources.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{}: at least one source must be configured",
                    tool.name
                )));
            }

            if tool.notification.color > MAX_COLOR {
                return Err(ConfigError::Invalid(format!(
                    "{}: color {} is outside 0..={}",
                    tool.name, tool.notification.color, MAX_COLOR
                )));
            }

            if tool.notification.webhook_env.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{}: webhook_env must not be empty",
                    tool.name
                )));
            }

            for source in &tool.sources {
                source
                    .validate()
                    .map_err(|reason| ConfigError::Invalid(format!("{}: {}", tool.name, reason)))?;
            }
        }

        Ok(())
    }

    /// Every webhook environment variable referenced by an enabled tool.
    pub fn webhook_envs(&self) -> BTreeSet<String> {
        self.tools
            .iter()
            .filter(|tool| tool.enabled)
            .map(|tool| tool.notification.webhook_env.clone())
            .collect()
    }

    /// Write a commented starter configuration to `path`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> &'static str {
        r##"# devtools-release-notifier configuration
#
# Each [[tools]] entry lists one or more sources. Sources are tried in
# ascending `priority` order and the first one that yields a version wins.
#
# Source types:
# - github_releases: GitHub Releases Atom feed (atom_url)
# - github_commits:  GitHub Commits Atom feed (atom_url)
# - homebrew_cask:   Homebrew Cask JSON API (api_url)
# - changelog:       Raw CHANGELOG file (raw_url, version_pattern, content_url)
#
# version_pattern accepts the presets "simple" (## 1.2.3) and
# "keepachangelog" (## [1.2.3] - 2024-01-15), or any regular expression whose
# first capture group is the version and optional second group the date.

[common]
# How often the scheduler runs the check
check_interval_hours = 6

# Where the last notified version of each tool is kept
cache_directory = "./cache"

# on_attempt: record a new version even if the notification failed
# on_delivery: record it only once a notification went out
cache_policy = "on_attempt"

[[tools]]
name = "Zed Editor"
enabled = true

[tools.notification]
webhook_env = "DISCORD_WEBHOOK"
color = 5814783

[[tools.sources]]
type = "github_releases"
priority = 1
owner = "zed-industries"
repo = "zed"
atom_url = "https://github.com/zed-industries/zed/releases.atom"

[[tools.sources]]
type = "homebrew_cask"
priority = 2
api_url = "https://formulae.brew.sh/api/cask/zed.json"

[[tools]]
name = "Claude Code"

[tools.notification]
color = 14251782

[[tools.sources]]
type = "changelog"
priority = 1
raw_url = "https://raw.githubusercontent.com/anthropics/claude-code/main/CHANGELOG.md"
content_url = "https://github.com/anthropics/claude-code/blob/main/CHANGELOG.md"
version_pattern = "simple"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Configuration file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse config text: {0}")]
    InlineParse(toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

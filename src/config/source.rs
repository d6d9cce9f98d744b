use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::SourceKind;

/// One upstream endpoint queried for a tool, selected by its `type` key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    GithubReleases(GithubFeedSourceConfig),
    GithubCommits(GithubFeedSourceConfig),
    HomebrewCask(HomebrewCaskSourceConfig),
    Changelog(ChangelogSourceConfig),
}

/// GitHub Releases or Commits Atom feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubFeedSourceConfig {
    pub priority: u32,
    pub owner: String,
    pub repo: String,
    pub atom_url: String,
}

/// Homebrew Cask JSON API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HomebrewCaskSourceConfig {
    pub priority: u32,
    pub api_url: String,
    /// Informational; the cask API is the only endpoint queried.
    #[serde(default)]
    pub atom_url: Option<String>,
}

/// Raw CHANGELOG file scraped with a heading regex.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChangelogSourceConfig {
    pub priority: u32,
    pub raw_url: String,
    #[serde(default = "default_version_pattern")]
    pub version_pattern: String,
    /// Human-facing page for the changelog; defaults to `raw_url`.
    #[serde(default)]
    pub content_url: Option<String>,
}

fn default_version_pattern() -> String {
    "keepachangelog".to_string()
}

impl SourceConfig {
    pub fn priority(&self) -> u32 {
        match self {
            SourceConfig::GithubReleases(c) | SourceConfig::GithubCommits(c) => c.priority,
            SourceConfig::HomebrewCask(c) => c.priority,
            SourceConfig::Changelog(c) => c.priority,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceConfig::GithubReleases(_) => SourceKind::GithubReleases,
            SourceConfig::GithubCommits(_) => SourceKind::GithubCommits,
            SourceConfig::HomebrewCask(_) => SourceKind::HomebrewCask,
            SourceConfig::Changelog(_) => SourceKind::Changelog,
        }
    }

    /// The URL the adapter fetches.
    pub fn primary_url(&self) -> &str {
        match self {
            SourceConfig::GithubReleases(c) | SourceConfig::GithubCommits(c) => &c.atom_url,
            SourceConfig::HomebrewCask(c) => &c.api_url,
            SourceConfig::Changelog(c) => &c.raw_url,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.priority() < 1 {
            return Err(format!(
                "{} source priority must be at least 1, got {}",
                self.kind(),
                self.priority()
            ));
        }

        match self {
            SourceConfig::GithubReleases(c) | SourceConfig::GithubCommits(c) => {
                check_url("atom_url", &c.atom_url)
            }
            SourceConfig::HomebrewCask(c) => {
                check_url("api_url", &c.api_url)?;
                if let Some(atom_url) = &c.atom_url {
                    check_url("atom_url", atom_url)?;
                }
                Ok(())
            }
            SourceConfig::Changelog(c) => {
                check_url("raw_url", &c.raw_url)?;
                if let Some(content_url) = &c.content_url {
                    check_url("content_url", content_url)?;
                }
                if c.version_pattern.trim().is_empty() {
                    return Err("changelog version_pattern must not be empty".into());
                }
                Ok(())
            }
        }
    }
}

fn check_url(field: &str, value: &str) -> Result<(), String> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| format!("{} {:?} is not a valid URL: {}", field, value, e))
}

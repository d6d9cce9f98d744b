use std::fmt;

use chrono::{DateTime, Utc};

/// Upstream format a release record was normalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    GithubReleases,
    GithubCommits,
    HomebrewCask,
    Changelog,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::GithubReleases => "github_releases",
            SourceKind::GithubCommits => "github_commits",
            SourceKind::HomebrewCask => "homebrew_cask",
            SourceKind::Changelog => "changelog",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseRecord {
    pub version: String,
    pub content: String,
    pub url: String,
    pub published: DateTime<Utc>,
    pub source_kind: SourceKind,
    pub download_url: Option<String>,
}

impl ReleaseRecord {
    /// Build a record, refusing partial data.
    ///
    /// Returns `None` when either the version or the content is blank.
    pub fn new(
        source_kind: SourceKind,
        version: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
        published: DateTime<Utc>,
    ) -> Option<Self> {
        let version = version.into();
        let content = content.into();

        if version.trim().is_empty() || content.trim().is_empty() {
            return None;
        }

        Some(Self {
            version,
            content,
            url: url.into(),
            published,
            source_kind,
            download_url: None,
        })
    }

    pub fn with_download_url(mut self, download_url: impl Into<String>) -> Self {
        self.download_url = Some(download_url.into());
        self
    }
}

//! Upstream release sources.
//!
//! Every adapter normalizes its upstream payload into a [`ReleaseRecord`].
//! Missing data and upstream failures are logged and reported as `None`; they
//! never abort the run.
//!
//! ```text
//! SourceConfig → ReleaseSource → Fetcher → ReleaseRecord
//! ```

pub mod changelog;
pub mod github;
pub mod homebrew;

pub use changelog::ChangelogSource;
pub use github::GithubFeedSource;
pub use homebrew::HomebrewCaskSource;

use crate::config::SourceConfig;
use crate::domain::{ReleaseRecord, SourceKind};
use crate::fetcher::Fetcher;

/// The fixed set of source adapters.
#[derive(Debug, Clone)]
pub enum ReleaseSource {
    GithubFeed(GithubFeedSource),
    HomebrewCask(HomebrewCaskSource),
    Changelog(ChangelogSource),
}

impl ReleaseSource {
    pub fn from_config(config: &SourceConfig) -> Self {
        match config {
            SourceConfig::GithubReleases(c) => Self::GithubFeed(GithubFeedSource::releases(c)),
            SourceConfig::GithubCommits(c) => Self::GithubFeed(GithubFeedSource::commits(c)),
            SourceConfig::HomebrewCask(c) => Self::HomebrewCask(HomebrewCaskSource::new(c)),
            SourceConfig::Changelog(c) => Self::Changelog(ChangelogSource::new(c)),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::GithubFeed(source) => source.kind(),
            Self::HomebrewCask(_) => SourceKind::HomebrewCask,
            Self::Changelog(_) => SourceKind::Changelog,
        }
    }

    /// Fetch the latest release this source knows about.
    ///
    /// `None` covers both "no data" and upstream errors; the adapter has
    /// already logged which.
    pub async fn fetch(&self, fetcher: &(dyn Fetcher + Send + Sync)) -> Option<ReleaseRecord> {
        match self {
            Self::GithubFeed(source) => source.fetch(fetcher).await,
            Self::HomebrewCask(source) => source.fetch(fetcher).await,
            Self::Changelog(source) => source.fetch(fetcher).await,
        }
    }
}

use chrono::Utc;
use feed_rs::parser;
use html_escape::decode_html_entities;
use tracing::warn;

use crate::config::GithubFeedSourceConfig;
use crate::domain::{ReleaseRecord, SourceKind};
use crate::fetcher::Fetcher;

/// GitHub Releases or Commits Atom feed.
///
/// The first entry of the feed is taken as the latest release; entries are
/// not re-sorted by timestamp.
#[derive(Debug, Clone)]
pub struct GithubFeedSource {
    kind: SourceKind,
    atom_url: String,
}

impl GithubFeedSource {
    pub fn releases(config: &GithubFeedSourceConfig) -> Self {
        Self {
            kind: SourceKind::GithubReleases,
            atom_url: config.atom_url.clone(),
        }
    }

    pub fn commits(config: &GithubFeedSourceConfig) -> Self {
        Self {
            kind: SourceKind::GithubCommits,
            atom_url: config.atom_url.clone(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    fn label(&self) -> &'static str {
        match self.kind {
            SourceKind::GithubCommits => "GitHub Commits",
            _ => "GitHub Releases",
        }
    }

    pub async fn fetch(&self, fetcher: &(dyn Fetcher + Send + Sync)) -> Option<ReleaseRecord> {
        if self.atom_url.trim().is_empty() {
            warn!("{}: atom_url not configured", self.label());
            return None;
        }

        let body = match fetcher.fetch(&self.atom_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("{}: Failed to fetch {} - {}", self.label(), self.atom_url, e);
                return None;
            }
        };

        self.parse_latest(&body)
    }

    /// Normalize the first entry of an Atom document.
    pub fn parse_latest(&self, body: &[u8]) -> Option<ReleaseRecord> {
        let feed = match parser::parse(body) {
            Ok(feed) => feed,
            Err(e) => {
                warn!("{}: Failed to parse feed - {}", self.label(), e);
                return None;
            }
        };

        let Some(entry) = feed.entries.into_iter().next() else {
            warn!("{}: No entries found", self.label());
            return None;
        };

        let version = entry
            .title
            .map(|t| decode_html_entities(&t.content).to_string())
            .unwrap_or_default();

        // GitHub feeds put the notes in <content>; plain Atom uses <summary>.
        let content = entry
            .summary
            .map(|s| decode_html_entities(&s.content).to_string())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                entry
                    .content
                    .and_then(|c| c.body)
                    .map(|b| decode_html_entities(&b).to_string())
            })
            .unwrap_or_default();

        let url = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        let published = entry.published.or(entry.updated).unwrap_or_else(Utc::now);

        let record = ReleaseRecord::new(self.kind, version, content, url, published);
        if record.is_none() {
            warn!("{}: Latest entry has no title or summary", self.label());
        }
        record
    }
}

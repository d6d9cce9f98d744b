//! CHANGELOG file scraping.
//!
//! A changelog is split into sections by heading lines matching a version
//! pattern. The first capture group of the pattern is the version and an
//! optional second group is a `YYYY-MM-DD` release date. The newest section is
//! the first heading in the file; its notes are everything up to the next
//! heading matching the same pattern.

use chrono::{DateTime, NaiveDate, Utc};
use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::app::Result;
use crate::config::ChangelogSourceConfig;
use crate::domain::{ReleaseRecord, SourceKind};
use crate::fetcher::Fetcher;

/// `## 2.0.69`, as used by Claude Code.
pub const SIMPLE_PATTERN: &str = r"^## (\d+\.\d+(?:\.\d+)?(?:-[\w.]+)?)";

/// `## [1.0.0] - 2024-01-15`, as used by Keep a Changelog.
pub const KEEPACHANGELOG_PATTERN: &str = r"^## \[([^\]]+)\](?: - (\d{4}-\d{2}-\d{2}))?";

/// Map a preset name to its regex; anything else is taken as a regex itself.
pub fn pattern_source(version_pattern: &str) -> &str {
    match version_pattern {
        "simple" => SIMPLE_PATTERN,
        "keepachangelog" => KEEPACHANGELOG_PATTERN,
        custom => custom,
    }
}

/// Compile a version pattern with `^`/`$` matching at line boundaries.
pub fn compile_pattern(version_pattern: &str) -> Result<Regex> {
    let pattern = RegexBuilder::new(pattern_source(version_pattern))
        .multi_line(true)
        .build()?;
    Ok(pattern)
}

/// Parse a heading date, falling back to the current time.
pub fn parse_date(date: Option<&str>) -> DateTime<Utc> {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}

/// The newest section of a changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSection<'a> {
    pub version: &'a str,
    pub date: Option<&'a str>,
    pub content: &'a str,
}

/// Locate the first heading matching `pattern` and cut out its notes.
///
/// The notes start on the line after the heading and stop right before the
/// next line matching `pattern`, or at the end of `text`. Surrounding
/// whitespace is trimmed. Returns `None` when no heading matches or the
/// pattern has no version capture group.
pub fn extract_section<'a>(text: &'a str, pattern: &Regex) -> Option<ChangelogSection<'a>> {
    let captures = pattern.captures(text)?;
    let heading = captures.get(0)?;
    let version = captures.get(1)?.as_str();
    let date = captures.get(2).map(|m| m.as_str());

    let body_start = match text[heading.end()..].find('\n') {
        Some(offset) => heading.end() + offset + 1,
        None => heading.end(),
    };

    let remaining = &text[body_start..];
    let body = match pattern.find(remaining) {
        Some(next) => &remaining[..next.start()],
        None => remaining,
    };

    Some(ChangelogSection {
        version,
        date,
        content: body.trim(),
    })
}

#[derive(Debug, Clone)]
pub struct ChangelogSource {
    raw_url: String,
    version_pattern: String,
    content_url: Option<String>,
}

impl ChangelogSource {
    pub fn new(config: &ChangelogSourceConfig) -> Self {
        Self {
            raw_url: config.raw_url.clone(),
            version_pattern: config.version_pattern.clone(),
            content_url: config.content_url.clone(),
        }
    }

    pub async fn fetch(&self, fetcher: &(dyn Fetcher + Send + Sync)) -> Option<ReleaseRecord> {
        if self.raw_url.trim().is_empty() {
            warn!("Changelog: raw_url not configured");
            return None;
        }

        let body = match fetcher.fetch(&self.raw_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Changelog: HTTP error - {}", e);
                return None;
            }
        };

        self.parse(&String::from_utf8_lossy(&body))
    }

    /// Normalize the newest section of a changelog text.
    pub fn parse(&self, text: &str) -> Option<ReleaseRecord> {
        let pattern = match compile_pattern(&self.version_pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!("Changelog: {}", e);
                return None;
            }
        };

        let Some(section) = extract_section(text, &pattern) else {
            warn!("Changelog: No version found");
            return None;
        };

        let url = self
            .content_url
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.raw_url.clone());

        let record = ReleaseRecord::new(
            SourceKind::Changelog,
            section.version,
            section.content,
            url,
            parse_date(section.date),
        );
        if record.is_none() {
            warn!("Changelog: Section for {} is empty", section.version);
        }
        record
    }
}

use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::config::HomebrewCaskSourceConfig;
use crate::domain::{ReleaseRecord, SourceKind};
use crate::fetcher::Fetcher;

/// Fields read from a `formulae.brew.sh/api/cask/<token>.json` document.
#[derive(Debug, Deserialize)]
struct CaskPayload {
    token: Option<String>,
    version: Option<String>,
    homepage: Option<String>,
    url: Option<String>,
}

/// Homebrew Cask JSON API.
///
/// The API carries no release notes, so the content is a short install blurb
/// and the publication time is the fetch time.
#[derive(Debug, Clone)]
pub struct HomebrewCaskSource {
    api_url: String,
}

impl HomebrewCaskSource {
    pub fn new(config: &HomebrewCaskSourceConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
        }
    }

    pub async fn fetch(&self, fetcher: &(dyn Fetcher + Send + Sync)) -> Option<ReleaseRecord> {
        if self.api_url.trim().is_empty() {
            warn!("Homebrew Cask: api_url not configured");
            return None;
        }

        let body = match fetcher.fetch(&self.api_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Homebrew Cask: HTTP error - {}", e);
                return None;
            }
        };

        parse_cask(&body)
    }
}

/// Normalize a cask API document.
pub fn parse_cask(body: &[u8]) -> Option<ReleaseRecord> {
    let payload: CaskPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Homebrew Cask: Failed to parse response - {}", e);
            return None;
        }
    };

    let Some(version) = payload.version.filter(|v| !v.trim().is_empty()) else {
        warn!("Homebrew Cask: version not found in response");
        return None;
    };

    let download_url = payload.url.filter(|u| !u.is_empty());
    let token = payload.token.unwrap_or_else(|| "unknown".to_string());
    let content = install_notes(&version, download_url.as_deref(), &token);

    let record = ReleaseRecord::new(
        SourceKind::HomebrewCask,
        version,
        content,
        payload.homepage.unwrap_or_default(),
        Utc::now(),
    )?;

    Some(record.with_download_url(download_url.unwrap_or_default()))
}

fn install_notes(version: &str, download_url: Option<&str>, token: &str) -> String {
    let mut content = format!("Version: {}\n", version);
    if let Some(download_url) = download_url {
        content.push_str(&format!("Download: {}\n", download_url));
    }
    content.push_str(&format!("Install: `brew install --cask {}`", token));
    content
}

//! The release hand-off file.
//!
//! `check` writes the new releases of a run as a JSON array; `send` reads it
//! back, possibly after the content was translated out of band.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{NotifierError, Result};
use crate::config::{default_webhook_env, ToolConfig, MAX_COLOR};
use crate::domain::ReleaseRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseOutput {
    pub tool_name: String,
    pub version: String,
    pub content: String,
    pub url: String,
    pub color: u32,
    #[serde(default = "default_webhook_env")]
    pub webhook_env: String,
}

impl ReleaseOutput {
    pub fn new(tool: &ToolConfig, record: &ReleaseRecord) -> Self {
        Self {
            tool_name: tool.name.clone(),
            version: record.version.clone(),
            content: record.content.clone(),
            url: record.url.clone(),
            color: tool.notification.color,
            webhook_env: tool.notification.webhook_env.clone(),
        }
    }
}

/// Replacement content for one tool's release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedRelease {
    pub tool_name: String,
    pub translated_content: String,
}

/// Write `releases` as a pretty-printed JSON array.
pub fn write_releases(path: &Path, releases: &[ReleaseOutput]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(releases)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a releases file, rejecting colors Discord would refuse.
pub fn read_releases(path: &Path) -> Result<Vec<ReleaseOutput>> {
    let content = fs::read_to_string(path)?;
    let releases: Vec<ReleaseOutput> = serde_json::from_str(&content)?;

    if let Some(bad) = releases.iter().find(|r| r.color > MAX_COLOR) {
        return Err(NotifierError::Output(format!(
            "{}: color {} is outside 0..={}",
            bad.tool_name, bad.color, MAX_COLOR
        )));
    }

    Ok(releases)
}

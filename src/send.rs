//! Replays a releases file to Discord.
//!
//! Content can be swapped per tool with an externally produced translation.
//! A Markdown page is kept only for releases Discord accepted.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::app::{NotifierError, Result};
use crate::domain::{Delivery, Notification};
use crate::notify::{MarkdownWriter, Notifier};
use crate::output::{ReleaseOutput, TranslatedRelease};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendSummary {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SendSummary {
    pub fn total(&self) -> usize {
        self.success + self.failed + self.skipped
    }

    /// `0` when everything went out, `1` when nothing did, `2` on partial failure.
    pub fn exit_code(&self) -> i32 {
        if self.success == 0 && self.total() > 0 {
            1
        } else if self.failed > 0 {
            2
        } else {
            0
        }
    }
}

/// Parse a translated JSON array into `tool_name → translated_content`.
///
/// Malformed elements are skipped with a warning; anything but an array is
/// an error.
pub fn parse_translations(json: &str) -> Result<HashMap<String, String>> {
    let value: Value = serde_json::from_str(json)?;

    let Value::Array(items) = value else {
        return Err(NotifierError::Output(
            "translated data must be a JSON array".into(),
        ));
    };

    let mut translations = HashMap::new();
    for item in items {
        if !item.is_object() {
            warn!("Skipping non-object item in translated data: {}", item);
            continue;
        }

        match serde_json::from_value::<TranslatedRelease>(item.clone()) {
            Ok(translated) => {
                translations.insert(translated.tool_name, translated.translated_content);
            }
            Err(_) => warn!("Skipping item missing required fields: {}", item),
        }
    }

    Ok(translations)
}

/// Send every release through `webhook`, writing Markdown pages for the ones
/// delivered when `markdown` is set.
pub async fn send_releases(
    releases: &[ReleaseOutput],
    translations: &HashMap<String, String>,
    webhook: &dyn Notifier,
    markdown: Option<&MarkdownWriter>,
) -> SendSummary {
    let mut summary = SendSummary::default();

    for release in releases {
        let content = translations
            .get(&release.tool_name)
            .cloned()
            .unwrap_or_else(|| release.content.clone());

        let notification = Notification {
            tool_name: release.tool_name.clone(),
            version: release.version.clone(),
            content,
            url: release.url.clone(),
            color: release.color,
            webhook_env: release.webhook_env.clone(),
            timestamp: Utc::now(),
        };

        match webhook.notify(&notification).await {
            Delivery::Sent => {
                summary.success += 1;
                if let Some(writer) = markdown {
                    // A page that fails to write is logged by the writer and
                    // does not undo the Discord delivery.
                    let page = writer.notify(&notification).await;
                    debug!(
                        "{}: {} sink reported {:?}",
                        notification.tool_name,
                        writer.name(),
                        page
                    );
                }
            }
            Delivery::Failed => summary.failed += 1,
            Delivery::Skipped => summary.skipped += 1,
        }
    }

    let total = summary.total();
    info!("Success: {}/{}", summary.success, total);
    if summary.failed > 0 {
        warn!("Failed: {}/{}", summary.failed, total);
    }
    if summary.skipped > 0 {
        warn!("Skipped: {}/{}", summary.skipped, total);
    }

    summary
}

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::Result;
use crate::domain::{Delivery, Notification};
use crate::notify::Notifier;

/// Longest embed description sent; Discord's own limit is 4096.
pub const MAX_DESCRIPTION_CHARS: usize = 4000;

pub const FOOTER_TEXT: &str = "devtools-release-notifier";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
    /// RFC 3339, UTC.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

impl WebhookPayload {
    /// Single-embed release announcement.
    pub fn release(notification: &Notification) -> Self {
        let embed = Embed {
            title: format!("🚀 {} - {}", notification.tool_name, notification.version),
            description: truncate_chars(&notification.content, MAX_DESCRIPTION_CHARS),
            url: notification.url.clone(),
            color: notification.color,
            timestamp: notification
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            footer: Some(EmbedFooter {
                text: FOOTER_TEXT.to_string(),
            }),
        };

        Self {
            embeds: vec![embed],
        }
    }
}

/// Keep at most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

/// Webhook URLs keyed by the environment variable name configured per tool.
///
/// Built once at startup so sinks never read the process environment.
#[derive(Debug, Clone, Default)]
pub struct WebhookDirectory {
    urls: HashMap<String, String>,
}

impl WebhookDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, env_name: impl Into<String>, url: impl Into<String>) -> Self {
        self.urls.insert(env_name.into(), url.into());
        self
    }

    /// Snapshot the named variables from the process environment.
    ///
    /// Unset or blank variables are left out.
    pub fn from_env<I, S>(env_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls = env_names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                std::env::var(name)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
                    .map(|url| (name.to_string(), url))
            })
            .collect();

        Self { urls }
    }

    pub fn resolve(&self, env_name: &str) -> Option<&str> {
        self.urls.get(env_name).map(String::as_str)
    }
}

/// Posts release embeds to Discord webhooks.
pub struct DiscordNotifier {
    client: Client,
    webhooks: WebhookDirectory,
}

impl DiscordNotifier {
    pub fn new(client: Client, webhooks: WebhookDirectory) -> Self {
        Self { client, webhooks }
    }

    /// POST `payload` to `webhook_url`, failing on non-success statuses.
    pub async fn send(&self, webhook_url: &str, payload: &WebhookPayload) -> Result<()> {
        let body = serde_json::to_vec(payload)?;

        self.client
            .post(webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn notify(&self, notification: &Notification) -> Delivery {
        let Some(webhook_url) = self.webhooks.resolve(&notification.webhook_env) else {
            warn!(
                "{}: Webhook URL not found ({})",
                notification.tool_name, notification.webhook_env
            );
            return Delivery::Skipped;
        };

        let payload = WebhookPayload::release(notification);
        match self.send(webhook_url, &payload).await {
            Ok(()) => {
                info!("Discord notification sent for {}", notification.tool_name);
                Delivery::Sent
            }
            Err(e) => {
                warn!(
                    "Discord notification failed for {}: {}",
                    notification.tool_name, e
                );
                Delivery::Failed
            }
        }
    }
}

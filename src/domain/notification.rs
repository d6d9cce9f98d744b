use chrono::{DateTime, Utc};

use crate::config::ToolConfig;
use crate::domain::ReleaseRecord;

/// A release announcement handed to the notification sinks.
#[derive(Debug, Clone)]
pub struct Notification {
    pub tool_name: String,
    pub version: String,
    pub content: String,
    pub url: String,
    pub color: u32,
    pub webhook_env: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn for_release(tool: &ToolConfig, record: &ReleaseRecord) -> Self {
        Self {
            tool_name: tool.name.clone(),
            version: record.version.clone(),
            content: record.content.clone(),
            url: record.url.clone(),
            color: tool.notification.color,
            webhook_env: tool.notification.webhook_env.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of handing a notification to one sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Failed,
    /// The sink had no destination for this notification.
    Skipped,
}

impl Delivery {
    /// Combine the outcomes of several sinks: any failure wins, then any send.
    pub fn combine(outcomes: &[Delivery]) -> Option<Delivery> {
        if outcomes.is_empty() {
            return None;
        }
        if outcomes.contains(&Delivery::Failed) {
            Some(Delivery::Failed)
        } else if outcomes.contains(&Delivery::Sent) {
            Some(Delivery::Sent)
        } else {
            Some(Delivery::Skipped)
        }
    }
}

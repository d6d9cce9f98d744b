//! Notification sinks.
//!
//! - [`DiscordNotifier`]: posts an embed to the tool's Discord webhook
//! - [`MarkdownWriter`]: writes a dated documentation page per release

pub mod discord;
pub mod markdown;

pub use discord::{DiscordNotifier, WebhookDirectory, WebhookPayload};
pub use markdown::MarkdownWriter;

use async_trait::async_trait;

use crate::domain::{Delivery, Notification};

/// A destination for release announcements.
///
/// Sinks report failures through [`Delivery`] and never abort the run.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn notify(&self, notification: &Notification) -> Delivery;
}

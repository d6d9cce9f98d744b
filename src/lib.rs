//! # devtools-release-notifier
//!
//! Watches developer tools for new releases and announces them on Discord.
//!
//! ## Architecture
//!
//! Each run is a sequential batch:
//!
//! ```text
//! Config → Sources (priority order) → Version cache → Sinks → Release output
//! ```
//!
//! - [`sources`]: GitHub Atom feeds, the Homebrew Cask API and CHANGELOG files
//! - [`engine`]: priority fallback and change detection
//! - [`store`]: per-tool JSON version cache
//! - [`notify`]: Discord webhook and Markdown page sinks
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a sample config.toml
//! devtools-release-notifier init
//!
//! # Check all tools and keep the new releases for later
//! DISCORD_WEBHOOK=https://discord.com/api/webhooks/... \
//!     devtools-release-notifier check --output releases.json
//!
//! # Send a (translated) releases file
//! devtools-release-notifier send releases.json "$TRANSLATED" --markdown-dir docs/releases
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the
/// configuration, HTTP client, version cache and Discord sink.
pub mod app;

/// Command-line interface using clap.
///
/// - `check [--output FILE] [--no-notify] [--markdown-dir DIR]`
/// - `send <releases> [translated] [--markdown-dir DIR]`
/// - `validate`
/// - `init`
pub mod cli;

/// TOML configuration: tools, their sources and notification settings.
pub mod config;

/// Core domain models.
///
/// - [`ReleaseRecord`](domain::ReleaseRecord): normalized release from any source
/// - [`CachedVersion`](domain::CachedVersion): last notified version of a tool
/// - [`Notification`](domain::Notification): what the sinks receive
pub mod domain;

/// Release resolution: priority fallback, cache comparison, notification.
pub mod engine;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait every source fetches through
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Notification sinks behind the [`Notifier`](notify::Notifier) trait.
pub mod notify;

/// The JSON hand-off file of new releases.
pub mod output;

/// Replaying a releases file to Discord.
pub mod send;

/// Upstream release sources.
pub mod sources;

/// Version cache.
///
/// - [`VersionStore`](store::VersionStore): Trait defining cache operations
/// - [`JsonFileStore`](store::JsonFileStore): one JSON file per tool
pub mod store;

use std::path::Path;
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::engine::Resolver;
use crate::fetcher::http_fetcher::{build_client, HttpFetcher};
use crate::fetcher::Fetcher;
use crate::notify::{DiscordNotifier, MarkdownWriter, WebhookDirectory};
use crate::store::JsonFileStore;

pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub store: Arc<JsonFileStore>,
    pub discord: Arc<DiscordNotifier>,
}

impl AppContext {
    /// Load and validate the configuration at `path`, then wire the
    /// components around it.
    pub fn load(path: &Path) -> Result<Self> {
        Self::new(Config::load(path)?)
    }

    pub fn new(config: Config) -> Result<Self> {
        let webhooks = WebhookDirectory::from_env(config.webhook_envs());
        Self::with_webhooks(config, webhooks)
    }

    pub fn with_webhooks(config: Config, webhooks: WebhookDirectory) -> Result<Self> {
        let client = build_client()?;
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::with_client(client.clone()));
        let store = Arc::new(JsonFileStore::new(&config.common.cache_directory)?);
        let discord = Arc::new(DiscordNotifier::new(client, webhooks));

        Ok(Self {
            config,
            fetcher,
            store,
            discord,
        })
    }

    /// A resolver notifying Discord, plus Markdown pages under
    /// `markdown_dir` when given.
    pub fn resolver(&self, markdown_dir: Option<&Path>, notify: bool) -> Resolver {
        let mut resolver = Resolver::new(self.fetcher.clone(), self.store.clone())
            .with_notifier(self.discord.clone())
            .with_cache_policy(self.config.common.cache_policy);

        if let Some(dir) = markdown_dir {
            resolver = resolver.with_notifier(Arc::new(MarkdownWriter::new(dir)));
        }

        if !notify {
            resolver = resolver.without_notifications();
        }

        resolver
    }
}

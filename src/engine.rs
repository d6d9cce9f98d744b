//! Release resolution and change detection.
//!
//! ```text
//! ToolConfig → sources by priority → first ReleaseRecord → cache compare → sinks → cache save
//! ```
//!
//! Tools are processed one at a time and each source is awaited before the
//! next one is tried. Nothing here aborts the run: unreachable sources,
//! unresolvable tools, failed deliveries and cache write errors are all
//! logged and reported through [`ToolOutcome`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{CachePolicy, Config, ToolConfig};
use crate::domain::{Delivery, Notification, ReleaseRecord};
use crate::fetcher::Fetcher;
use crate::notify::Notifier;
use crate::output::ReleaseOutput;
use crate::sources::ReleaseSource;
use crate::store::VersionStore;

/// What happened to one tool during a run.
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    Disabled,
    /// No source produced a release.
    Unresolved,
    UpToDate {
        version: String,
    },
    NewRelease {
        record: ReleaseRecord,
        /// Combined sink outcome; `None` when nothing was asked to deliver.
        delivery: Option<Delivery>,
    },
}

#[derive(Debug, Clone)]
pub struct ToolReport {
    pub tool_name: String,
    pub outcome: ToolOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &ToolOutcome) {
        match outcome {
            ToolOutcome::Disabled => self.skipped += 1,
            ToolOutcome::Unresolved => self.failed += 1,
            ToolOutcome::UpToDate { .. } => self.succeeded += 1,
            ToolOutcome::NewRelease { delivery, .. } => match delivery {
                None | Some(Delivery::Sent) => self.succeeded += 1,
                Some(Delivery::Failed) => self.failed += 1,
                Some(Delivery::Skipped) => self.skipped += 1,
            },
        }
    }

    /// `0` when nothing failed, `1` when every processed tool failed, `2` when
    /// some did.
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 {
            0
        } else if self.succeeded == 0 {
            1
        } else {
            2
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub tools: Vec<ToolReport>,
    /// New releases in tool declaration order.
    pub releases: Vec<ReleaseOutput>,
    pub summary: RunSummary,
}

/// Resolves each tool's latest release and announces the ones not yet seen.
pub struct Resolver {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    store: Arc<dyn VersionStore + Send + Sync>,
    notifiers: Vec<Arc<dyn Notifier>>,
    cache_policy: CachePolicy,
    notify: bool,
}

impl Resolver {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        store: Arc<dyn VersionStore + Send + Sync>,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifiers: Vec::new(),
            cache_policy: CachePolicy::default(),
            notify: true,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Disable the sinks for this run; new versions are still recorded.
    pub fn without_notifications(mut self) -> Self {
        self.notify = false;
        self
    }

    /// Try the tool's sources in priority order and return the first record.
    pub async fn resolve(&self, tool: &ToolConfig) -> Option<ReleaseRecord> {
        for config in tool.sources_by_priority() {
            let source = ReleaseSource::from_config(config);
            debug!(
                "{}: Trying {} (priority {})",
                tool.name,
                source.kind(),
                config.priority()
            );

            if let Some(record) = source.fetch(self.fetcher.as_ref()).await {
                info!(
                    "{}: Got version {} from {}",
                    tool.name,
                    record.version,
                    source.kind()
                );
                return Some(record);
            }
        }

        None
    }

    pub async fn process_tool(&self, tool: &ToolConfig) -> ToolOutcome {
        if !tool.enabled {
            info!("{}: Disabled, skipping", tool.name);
            return ToolOutcome::Disabled;
        }

        let Some(record) = self.resolve(tool).await else {
            warn!("{}: No version information available", tool.name);
            return ToolOutcome::Unresolved;
        };

        if let Some(cached) = self.store.load(&tool.name) {
            if cached.version == record.version {
                info!("{}: Already up to date ({})", tool.name, record.version);
                return ToolOutcome::UpToDate {
                    version: record.version,
                };
            }
        }

        info!("{}: New version {}", tool.name, record.version);

        let delivery = if self.notify {
            self.deliver(&Notification::for_release(tool, &record)).await
        } else {
            None
        };

        if self.should_record(delivery) {
            if let Err(e) = self.store.save(&tool.name, &record.version) {
                warn!("{}: Failed to save cache - {}", tool.name, e);
            }
        } else {
            info!(
                "{}: Delivery incomplete, keeping cached version",
                tool.name
            );
        }

        ToolOutcome::NewRelease { record, delivery }
    }

    /// Process every tool in declaration order.
    pub async fn run(&self, config: &Config) -> RunReport {
        let mut report = RunReport::default();

        for tool in &config.tools {
            let outcome = self.process_tool(tool).await;

            if let ToolOutcome::NewRelease { record, .. } = &outcome {
                report.releases.push(ReleaseOutput::new(tool, record));
            }

            report.summary.record(&outcome);
            report.tools.push(ToolReport {
                tool_name: tool.name.clone(),
                outcome,
            });
        }

        report
    }

    async fn deliver(&self, notification: &Notification) -> Option<Delivery> {
        let mut outcomes = Vec::with_capacity(self.notifiers.len());
        for notifier in &self.notifiers {
            let delivery = notifier.notify(notification).await;
            debug!(
                "{}: {} sink reported {:?}",
                notification.tool_name,
                notifier.name(),
                delivery
            );
            outcomes.push(delivery);
        }

        Delivery::combine(&outcomes)
    }

    fn should_record(&self, delivery: Option<Delivery>) -> bool {
        match self.cache_policy {
            CachePolicy::OnAttempt => true,
            CachePolicy::OnDelivery => {
                !matches!(delivery, Some(Delivery::Failed) | Some(Delivery::Skipped))
            }
        }
    }
}

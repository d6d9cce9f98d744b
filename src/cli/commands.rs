use std::path::Path;

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::engine::{RunSummary, ToolOutcome};
use crate::fetcher::http_fetcher::build_client;
use crate::notify::{DiscordNotifier, MarkdownWriter, WebhookDirectory};
use crate::output::{read_releases, write_releases};
use crate::send::{parse_translations, send_releases, SendSummary};

/// Check every tool, notify about new releases and optionally write them out.
pub async fn check(
    config_path: &Path,
    output: Option<&Path>,
    no_notify: bool,
    markdown_dir: Option<&Path>,
) -> Result<RunSummary> {
    let ctx = AppContext::load(config_path)?;
    let resolver = ctx.resolver(markdown_dir, !no_notify);

    println!("Checking {} tools...", ctx.config.tools.len());
    let report = resolver.run(&ctx.config).await;

    for tool in &report.tools {
        match &tool.outcome {
            ToolOutcome::Disabled => println!("  - {} (disabled)", tool.tool_name),
            ToolOutcome::Unresolved => {
                println!("  ! {}: no version information available", tool.tool_name)
            }
            ToolOutcome::UpToDate { version } => {
                println!("  = {} {} (up to date)", tool.tool_name, version)
            }
            ToolOutcome::NewRelease { record, .. } => {
                println!("  + {} {} (new)", tool.tool_name, record.version)
            }
        }
    }

    if let Some(path) = output {
        if !report.releases.is_empty() {
            write_releases(path, &report.releases)?;
            println!(
                "Wrote {} new releases to {}",
                report.releases.len(),
                path.display()
            );
        }
    }

    let summary = report.summary;
    println!(
        "Check complete: {} succeeded, {} failed, {} skipped",
        summary.succeeded, summary.failed, summary.skipped
    );

    Ok(summary)
}

/// Deliver a releases file to Discord.
///
/// Webhook URLs are read from the environment variables the releases name.
pub async fn send(
    releases_path: &Path,
    translated: &str,
    markdown_dir: Option<&Path>,
) -> Result<SendSummary> {
    let releases = read_releases(releases_path)?;
    let translations = parse_translations(translated)?;

    let webhooks = WebhookDirectory::from_env(releases.iter().map(|r| r.webhook_env.as_str()));
    let discord = DiscordNotifier::new(build_client()?, webhooks);
    let markdown = markdown_dir.map(MarkdownWriter::new);

    let summary = send_releases(&releases, &translations, &discord, markdown.as_ref()).await;

    println!(
        "Notification summary: {}/{} sent, {} failed, {} skipped",
        summary.success,
        summary.total(),
        summary.failed,
        summary.skipped
    );

    Ok(summary)
}

pub fn validate(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("Configuration OK: {}", config_path.display());
    for tool in &config.tools {
        let state = if tool.enabled { "" } else { " (disabled)" };
        println!("  {}{}", tool.name, state);
        for source in tool.sources_by_priority() {
            println!(
                "    {}. {} {}",
                source.priority(),
                source.kind(),
                source.primary_url()
            );
        }
    }

    Ok(())
}

pub fn init(config_path: &Path) -> Result<()> {
    Config::create_default_config(config_path)?;
    println!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::app::NotifierError;
    use crate::config::ConfigError;

    #[test]
    fn test_init_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init(&path).unwrap();
        validate(&path).unwrap();
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "keep me").unwrap();

        let err = init(&path).unwrap_err();
        assert!(matches!(
            err,
            NotifierError::Config(ConfigError::AlreadyExists(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_validate_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, NotifierError::Config(ConfigError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_check_unreachable_source_fails() {
        let server = wiremock::MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            format!(
                r#"
[common]
cache_directory = "{}"

[[tools]]
name = "Test Tool"

[tools.notification]
color = 5814783

[[tools.sources]]
type = "homebrew_cask"
priority = 1
api_url = "{}/none.json"
"#,
                dir.path().join("cache").display(),
                server.uri()
            ),
        )
        .unwrap();

        let summary = check(&path, None, true, None).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_send_rejects_non_array_translation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("releases.json");
        fs::write(&path, "[]").unwrap();

        assert!(send(&path, r#"{"tool_name": "x"}"#, None).await.is_err());
    }

    #[tokio::test]
    async fn test_send_missing_releases_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = send(&dir.path().join("missing.json"), "[]", None).await;
        assert!(matches!(result, Err(NotifierError::Io(_))));
    }

    #[tokio::test]
    async fn test_send_empty_releases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("releases.json");
        fs::write(&path, "[]").unwrap();

        let summary = send(&path, "[]", None).await.unwrap();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.exit_code(), 0);
    }
}

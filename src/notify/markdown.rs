use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::app::Result;
use crate::domain::{Delivery, Notification};
use crate::notify::Notifier;

/// Writes one documentation page per tool per day:
/// `{dir}/{tool-slug}/{YYYY-MM-DD}.md`.
///
/// A second release on the same day replaces the page.
pub struct MarkdownWriter {
    dir: PathBuf,
}

impl MarkdownWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, notification: &Notification) -> PathBuf {
        self.dir
            .join(slugify(&notification.tool_name))
            .join(format!("{}.md", notification.timestamp.format("%Y-%m-%d")))
    }

    pub fn write(&self, notification: &Notification) -> Result<PathBuf> {
        let path = self.path_for(notification);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, render(notification))?;
        Ok(path)
    }
}

/// Lowercase the name and join words with hyphens.
pub fn slugify(tool_name: &str) -> String {
    tool_name.to_lowercase().replace(' ', "-")
}

/// Keep frontmatter strings well-formed by swapping `"` for `'`.
pub fn escape_frontmatter(value: &str) -> String {
    value.replace('"', "'")
}

pub fn render(notification: &Notification) -> String {
    let date = notification.timestamp.format("%Y-%m-%d");
    let title = escape_frontmatter(&format!(
        "{} - {}",
        notification.tool_name, notification.version
    ));

    let mut page = format!(
        "---\ntitle: \"{}\"\ndate: \"{}\"\nversion: \"{}\"\nurl: \"{}\"\n---\n\n",
        title,
        date,
        escape_frontmatter(&notification.version),
        escape_frontmatter(&notification.url),
    );

    page.push_str(&format!(
        "# {} {}\n\n**リリース日**: {}\n\n{}\n",
        notification.tool_name,
        notification.version,
        notification.timestamp.format("%Y年%m月%d日"),
        notification.content.trim(),
    ));

    if !notification.url.is_empty() {
        page.push_str(&format!("\n[リリースページ]({})\n", notification.url));
    }

    page
}

#[async_trait]
impl Notifier for MarkdownWriter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    async fn notify(&self, notification: &Notification) -> Delivery {
        match self.write(notification) {
            Ok(path) => {
                info!("Saved Markdown log to {}", path.display());
                Delivery::Sent
            }
            Err(e) => {
                warn!(
                    "Failed to save Markdown log for {}: {}",
                    notification.tool_name, e
                );
                Delivery::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn notification(version: &str, content: &str, hour: u32) -> Notification {
        Notification {
            tool_name: "Zed Editor".into(),
            version: version.into(),
            content: content.into(),
            url: format!("https://github.com/zed-industries/zed/releases/tag/{}", version),
            color: 5814783,
            webhook_env: "DISCORD_WEBHOOK".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 15, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Zed Editor"), "zed-editor");
        assert_eq!(slugify("Dia Browser"), "dia-browser");
        assert_eq!(slugify("VIM"), "vim");
        assert_eq!(slugify("Multi Word Tool Name"), "multi-word-tool-name");
    }

    #[test]
    fn test_escape_frontmatter() {
        assert_eq!(escape_frontmatter("v1.0.0"), "v1.0.0");
        assert_eq!(
            escape_frontmatter(r#"Revert "Add feature""#),
            "Revert 'Add feature'"
        );
        assert_eq!(escape_frontmatter(r#""foo" and "bar""#), "'foo' and 'bar'");
        assert_eq!(escape_frontmatter(""), "");
    }

    #[test]
    fn test_write_page() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MarkdownWriter::new(dir.path().join("releases"));

        let path = writer
            .write(&notification("v0.100.0", "## Highlights\n- Change 1", 12))
            .unwrap();

        assert_eq!(
            path,
            dir.path().join("releases").join("zed-editor").join("2025-01-15.md")
        );

        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.contains("title: \"Zed Editor - v0.100.0\""));
        assert!(content.contains("date: \"2025-01-15\""));
        assert!(content.contains("version: \"v0.100.0\""));
        assert!(content.contains(
            "url: \"https://github.com/zed-industries/zed/releases/tag/v0.100.0\""
        ));
        assert!(content.contains("2025年01月15日"));
        assert!(content.contains("## Highlights\n- Change 1"));
    }

    #[test]
    fn test_same_day_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MarkdownWriter::new(dir.path());

        writer
            .write(&notification("v0.100.0", "First version", 12))
            .unwrap();
        let path = writer
            .write(&notification("v0.101.0", "Second version", 18))
            .unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("v0.101.0"));
        assert!(content.contains("Second version"));
        assert!(!content.contains("v0.100.0"));
        assert!(!content.contains("First version"));

        let pages = fs::read_dir(dir.path().join("zed-editor")).unwrap().count();
        assert_eq!(pages, 1);
    }

    #[test]
    fn test_quotes_in_version_escaped() {
        let version = r#"nightly: Revert "Add save_file" (#44949)"#;
        let page = render(&notification(version, "content", 10));

        assert!(page.contains(r#"version: "nightly: Revert 'Add save_file' (#44949)""#));
        assert!(page.contains(
            r#"title: "Zed Editor - nightly: Revert 'Add save_file' (#44949)""#
        ));
        assert!(!page.contains(r#"title: "Zed Editor - nightly: Revert "Add"#));
    }

    #[tokio::test]
    async fn test_notify_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let writer = MarkdownWriter::new(&blocker);
        let delivery = writer.notify(&notification("v1", "content", 9)).await;

        assert_eq!(delivery, Delivery::Failed);
    }
}

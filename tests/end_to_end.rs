use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use devtools_release_notifier::config::Config;
use devtools_release_notifier::domain::{Delivery, Notification};
use devtools_release_notifier::engine::Resolver;
use devtools_release_notifier::fetcher::http_fetcher::HttpFetcher;
use devtools_release_notifier::notify::Notifier;
use devtools_release_notifier::output::{read_releases, write_releases};
use devtools_release_notifier::store::{JsonFileStore, VersionStore};

const CASK: &str = r#"{"token":"test","version":"1.0.0","homepage":"https://example.com","url":"https://example.com/d.dmg"}"#;

#[derive(Default)]
struct CountingNotifier {
    calls: AtomicUsize,
}

#[async_trait]
impl Notifier for CountingNotifier {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn notify(&self, _notification: &Notification) -> Delivery {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Delivery::Sent
    }
}

fn config(api_url: &str, cache_dir: &std::path::Path) -> Config {
    let content = format!(
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
api_url = "{}"
"#,
        cache_dir.display().to_string().replace('\\', "/"),
        api_url
    );
    Config::from_toml_str(&content).unwrap()
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cask/test.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CASK))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    let config = config(
        &format!("{}/api/cask/test.json", server.uri()),
        &cache_dir,
    );

    let store = Arc::new(JsonFileStore::new(&config.common.cache_directory).unwrap());
    let notifier = Arc::new(CountingNotifier::default());
    let resolver = Resolver::new(Arc::new(HttpFetcher::new().unwrap()), store.clone())
        .with_notifier(notifier.clone());

    // First run: no cache, so the release is new.
    let report = resolver.run(&config).await;

    assert_eq!(report.releases.len(), 1);
    let release = &report.releases[0];
    assert_eq!(release.tool_name, "Test Tool");
    assert_eq!(release.version, "1.0.0");
    assert_eq!(release.url, "https://example.com");
    assert!(release.content.contains("Download: https://example.com/d.dmg"));
    assert!(release.content.contains("brew install --cask test"));
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);

    let cache_file = cache_dir.join("test_tool_version.json");
    let cached: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&cache_file).unwrap()).unwrap();
    assert_eq!(cached["version"], "1.0.0");
    assert!(cached["timestamp"].is_string());

    let output = dir.path().join("releases.json");
    write_releases(&output, &report.releases).unwrap();
    assert_eq!(read_releases(&output).unwrap(), report.releases);

    // Second run: same version upstream, nothing to announce.
    let before = fs::read(&cache_file).unwrap();
    let report = resolver.run(&config).await;

    assert!(report.releases.is_empty());
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fs::read(&cache_file).unwrap(), before);
    assert_eq!(store.load("Test Tool").unwrap().version, "1.0.0");
}

#[tokio::test]
async fn test_unreachable_source_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/releases.atom"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cask/test.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CASK))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let content = format!(
        r#"
[common]
cache_directory = "{cache}"

[[tools]]
name = "Test Tool"

[tools.notification]
color = 1

[[tools.sources]]
type = "homebrew_cask"
priority = 2
api_url = "{uri}/api/cask/test.json"

[[tools.sources]]
type = "github_releases"
priority = 1
owner = "test"
repo = "test"
atom_url = "{uri}/releases.atom"
"#,
        cache = dir.path().display().to_string().replace('\\', "/"),
        uri = server.uri()
    );
    let config = Config::from_toml_str(&content).unwrap();

    let store = Arc::new(JsonFileStore::new(dir.path()).unwrap());
    let resolver = Resolver::new(Arc::new(HttpFetcher::new().unwrap()), store);

    let record = resolver.resolve(&config.tools[0]).await.unwrap();
    assert_eq!(record.version, "1.0.0");

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(paths, vec!["/releases.atom", "/api/cask/test.json"]);
}

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::app::Result;
use crate::domain::CachedVersion;
use crate::store::{cache_key, VersionStore};

/// One pretty-printed JSON file per tool: `{dir}/{key}_version.json`.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open the store, creating `dir` if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, tool_name: &str) -> PathBuf {
        self.dir.join(format!("{}_version.json", cache_key(tool_name)))
    }
}

impl VersionStore for JsonFileStore {
    fn load(&self, tool_name: &str) -> Option<CachedVersion> {
        let path = self.path_for(tool_name);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read cache for {}: {}", tool_name, e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(cached) => Some(cached),
            Err(e) => {
                warn!("Failed to parse cache for {}: {}", tool_name, e);
                None
            }
        }
    }

    fn save(&self, tool_name: &str, version: &str) -> Result<()> {
        let cached = CachedVersion::new(version);
        let json = serde_json::to_string_pretty(&cached)?;
        fs::write(self.path_for(tool_name), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(store.load("Zed Editor").is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        store.save("Zed Editor", "v0.100.0").unwrap();
        let cached = store.load("Zed Editor").unwrap();

        assert_eq!(cached.version, "v0.100.0");
        assert!(dir.path().join("zed_editor_version.json").exists());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        store.save("Zed Editor", "v1").unwrap();
        store.save("Zed Editor", "v2").unwrap();

        assert_eq!(store.load("Zed Editor").unwrap().version, "v2");
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        fs::write(store.path_for("Zed Editor"), "{ not json").unwrap();

        assert!(store.load("Zed Editor").is_none());
    }

    #[test]
    fn test_load_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        fs::write(store.path_for("Zed Editor"), r#"{"timestamp": "2025-01-15T12:00:00Z"}"#)
            .unwrap();

        assert!(store.load("Zed Editor").is_none());
    }

    #[test]
    fn test_load_offset_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        fs::write(
            store.path_for("Zed Editor"),
            r#"{"version": "v0.99.0", "timestamp": "2025-01-15T12:00:00.123456+00:00"}"#,
        )
        .unwrap();

        assert_eq!(store.load("Zed Editor").unwrap().version, "v0.99.0");
    }

    #[test]
    fn test_new_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("cache");

        JsonFileStore::new(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_save_failure_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        fs::create_dir(store.path_for("Zed Editor")).unwrap();

        assert!(store.save("Zed Editor", "v1").is_err());
    }
}

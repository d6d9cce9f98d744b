pub mod json_file;

use crate::app::Result;
use crate::domain::CachedVersion;

pub use json_file::JsonFileStore;

/// Persistence for the last notified version of each tool.
pub trait VersionStore {
    /// Read the cached version of a tool.
    ///
    /// Missing, unreadable or malformed entries all read as `None`.
    fn load(&self, tool_name: &str) -> Option<CachedVersion>;

    /// Record `version` as the tool's latest, stamped with the current time.
    fn save(&self, tool_name: &str, version: &str) -> Result<()>;
}

/// Filesystem-safe key for a tool: lowercased, spaces become underscores.
pub fn cache_key(tool_name: &str) -> String {
    tool_name.to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("Zed Editor"), "zed_editor");
        assert_eq!(cache_key("Claude Code"), "claude_code");
        assert_eq!(cache_key("VIM"), "vim");
        assert_eq!(cache_key("Multi Word Tool Name"), "multi_word_tool_name");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last version a tool was notified about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedVersion {
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl CachedVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            timestamp: Utc::now(),
        }
    }
}
